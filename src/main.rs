use clap::{Args, Parser, Subcommand};
use log::{Level, info};
use qtree_rs::{DecodeOptions, Encoding, TrailingTokens, decode, format_preorder, read_header};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Input image file
    input: PathBuf,

    /// Read the input as a compressed quad-tree file
    #[arg(short, long)]
    compressed: bool,
}

impl InputArgs {
    fn encoding(&self) -> Encoding {
        if self.compressed {
            Encoding::Compressed
        } else {
            Encoding::Uncompressed
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an image, printing the quad-tree of compressed input
    Decode {
        #[command(flatten)]
        input: InputArgs,

        /// Write the decoded image to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reject compressed leaf values outside 0-255
        #[arg(long)]
        strict: bool,

        /// Reject input left over after the quad-tree
        #[arg(long)]
        reject_trailing: bool,
    },

    /// Display the pixel count and size of an image file
    Info {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the value of a single pixel
    Probe {
        #[command(flatten)]
        input: InputArgs,

        /// Column of the pixel
        x: usize,

        /// Row of the pixel
        y: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            input,
            output,
            strict,
            reject_trailing,
        } => decode_command(&input, output, strict, reject_trailing),
        Commands::Info { input } => info_command(&input),
        Commands::Probe { input, x, y } => probe_command(&input, x, y),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn setup_logger(verbose: u8) {
    let log_level = match verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    };

    // a logger that is already set is not worth failing over
    if simple_logger::init_with_level(log_level).is_ok() {
        info!("Log level: {log_level}");
    }
}

fn decode_command(
    input: &InputArgs,
    output: Option<PathBuf>,
    strict: bool,
    reject_trailing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = DecodeOptions {
        strict_leaves: strict,
        trailing_tokens: if reject_trailing {
            TrailingTokens::Reject
        } else {
            TrailingTokens::Ignore
        },
        ..Default::default()
    };

    let decoded = decode(&input.input, input.encoding(), options)?;

    if let Some(preorder) = decoded.preorder() {
        println!("Uncompressing: {}", input.input.display());
        println!("QTree: {}", format_preorder(preorder));
    }
    println!("Decoded image: {0}x{0}", decoded.side());

    if let Some(output_path) = output {
        decoded.raster.save_png(&output_path)?;
        println!("Image saved to: {}", output_path.display());
    }

    Ok(())
}

fn info_command(input: &InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(&input.input)?;
    let (count, side) = read_header(&data, input.encoding())?;

    println!("File: {}", input.input.display());
    println!("Encoding: {:?}", input.encoding());
    println!("Pixels: {count}");
    println!("Dimensions: {side}x{side}");
    if side * side != count {
        println!("Warning: pixel count is not a square");
    }

    Ok(())
}

fn probe_command(input: &InputArgs, x: usize, y: usize) -> Result<(), Box<dyn std::error::Error>> {
    let decoded = decode(&input.input, input.encoding(), DecodeOptions::default())?;

    let value = match &decoded.tree {
        Some(tree) => tree
            .root
            .leaf_at(x, y, tree.side())
            .or_else(|| decoded.raster.get(x, y)),
        None => decoded.raster.get(x, y),
    };
    match value {
        Some(value) => println!("({x}, {y}): {value}"),
        None => {
            return Err(format!(
                "({x}, {y}) is outside the {0}x{0} image",
                decoded.side()
            )
            .into());
        }
    }

    Ok(())
}
