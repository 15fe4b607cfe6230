use clap::Parser;
use qtree_rs::{DecodeOptions, Encoding, decode, decode_compressed};
use std::{
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tempfile::TempDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Benchmark quad-tree and flat image decoding")]
struct Args {
    /// Image side lengths to generate, powers of two
    #[arg(short, long, value_delimiter = ',', default_value = "64,256,1024")]
    sizes: Vec<usize>,

    /// Side length of the uniform blocks in generated quad-trees
    #[arg(short, long, default_value = "4")]
    block: usize,

    /// Number of iterations per image
    #[arg(short, long, default_value = "20")]
    iterations: usize,

    /// Frequency of progress updates
    #[arg(short, long, default_value = "5")]
    freq: usize,
}

// A decoding strategy to be benchmarked; returns the number of decoded pixels
trait BenchmarkDecoder {
    fn name(&self) -> &str;
    fn decode(&self, path: &Path) -> Result<usize, Box<dyn std::error::Error>>;
}

struct FlatDecoder;

impl BenchmarkDecoder for FlatDecoder {
    fn name(&self) -> &str {
        "Flat"
    }

    fn decode(&self, path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
        let decoded = decode(path, Encoding::Uncompressed, DecodeOptions::default())?;
        Ok(decoded.raster.as_slice().len())
    }
}

struct QuadTreeDecoder;

impl BenchmarkDecoder for QuadTreeDecoder {
    fn name(&self) -> &str {
        "QuadTree"
    }

    fn decode(&self, path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
        let decoded = decode(path, Encoding::Compressed, DecodeOptions::default())?;
        Ok(decoded.raster.as_slice().len())
    }
}

// Parses the tree without rendering it
struct ParseOnlyDecoder;

impl BenchmarkDecoder for ParseOnlyDecoder {
    fn name(&self) -> &str {
        "Parse"
    }

    fn decode(&self, path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
        let reader = BufReader::new(File::open(path)?);
        let tree = decode_compressed(reader, &DecodeOptions::default())?;
        Ok(tree.declared_pixels)
    }
}

#[derive(Debug)]
struct BenchmarkResults {
    decoder_name: String,
    num_images_tested: usize,
    avg_time_per_image_ms: f64,
    total_time_s: f64,
    avg_file_size_kb: f64,
    pixels_per_s: f64,
}

impl std::fmt::Display for BenchmarkResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "| {:<9} | {:>6} | {:>8.3} | {:>8.3} | {:>10.2} | {:>12.0} |",
            self.decoder_name,
            self.num_images_tested,
            self.avg_time_per_image_ms,
            self.total_time_s,
            self.avg_file_size_kb,
            self.pixels_per_s
        )
    }
}

struct GeneratedImages {
    #[allow(dead_code)]
    temp_dir: TempDir,
    flat_files: Vec<PathBuf>,
    tree_files: Vec<PathBuf>,
}

fn gray_at(x: usize, y: usize, side: usize) -> usize {
    (x + y) * 255 / (2 * side.max(2) - 2)
}

// Splits down to `block`-sized regions, each leaf holding the gradient value
// of its upper-left corner.
fn write_tree(out: &mut String, x: usize, y: usize, size: usize, block: usize, side: usize) {
    if size <= block {
        out.push_str(&gray_at(x, y, side).to_string());
        out.push('\n');
        return;
    }
    out.push_str("-1\n");
    let half = size / 2;
    write_tree(out, x, y, half, block, side);
    write_tree(out, x + half, y, half, block, side);
    write_tree(out, x, y + half, half, block, side);
    write_tree(out, x + half, y + half, half, block, side);
}

fn generate_images(sizes: &[usize], block: usize) -> Result<GeneratedImages, Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let mut flat_files = Vec::new();
    let mut tree_files = Vec::new();

    for &side in sizes {
        if !side.is_power_of_two() {
            eprintln!("Skipping size {}: not a power of two", side);
            continue;
        }

        let mut flat = String::with_capacity(side * side * 4);
        for y in 0..side {
            for x in 0..side {
                flat.push_str(&gray_at(x, y, side).to_string());
                flat.push('\n');
            }
        }
        let flat_path = temp_dir.path().join(format!("flat_{}.txt", side));
        fs::write(&flat_path, flat)?;
        flat_files.push(flat_path);

        let mut tree = format!("{}\n", side * side);
        write_tree(&mut tree, 0, 0, side, block.max(1), side);
        let tree_path = temp_dir.path().join(format!("tree_{}.qt", side));
        fs::write(&tree_path, tree)?;
        tree_files.push(tree_path);
    }

    Ok(GeneratedImages {
        temp_dir,
        flat_files,
        tree_files,
    })
}

fn benchmark_decode<D: BenchmarkDecoder>(
    decoder: &D,
    files: &[PathBuf],
    iterations: usize,
    freq: usize,
) -> Result<BenchmarkResults, Box<dyn std::error::Error>> {
    println!("Running {} Decode Benchmark...", decoder.name());

    let mut total_decoding_time = Duration::new(0, 0);
    let mut total_pixels: usize = 0;
    let mut total_file_bytes: u64 = 0;

    for path in files {
        total_file_bytes += fs::metadata(path)?.len();
    }

    for iter in 0..iterations {
        if iter % freq.max(1) == 0 {
            println!("Processing batch {}/{}", iter + 1, iterations);
        }
        for path in files {
            let start_time = Instant::now();
            let pixels = decoder.decode(path)?;
            total_decoding_time += start_time.elapsed();
            total_pixels += pixels;
        }
    }

    let total_operations = files.len() * iterations;
    let total_time_s = total_decoding_time.as_secs_f64();

    Ok(BenchmarkResults {
        decoder_name: decoder.name().to_string(),
        num_images_tested: files.len(),
        avg_time_per_image_ms: if total_operations > 0 {
            total_time_s * 1000.0 / (total_operations as f64)
        } else {
            0.0
        },
        total_time_s,
        avg_file_size_kb: if files.is_empty() {
            0.0
        } else {
            (total_file_bytes as f64) / (files.len() as f64) / 1024.0
        },
        pixels_per_s: if total_time_s > 0.0 {
            (total_pixels as f64) / total_time_s
        } else {
            0.0
        },
    })
}

fn print_benchmark_table_header(title: &str) {
    println!("\n{}", title);
    println!("|-----------+--------+----------+----------+------------+--------------|");
    println!("| Decoder   | Images | Avg Time | Total    | File Size  | Speed        |");
    println!("|           |        | (ms)     | Time (s) | (KB)       | (pixels/s)   |");
    println!("|-----------+--------+----------+----------+------------+--------------|");
}

fn print_benchmark_table_footer() {
    println!("|-----------+--------+----------+----------+------------+--------------|");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!(
        "Starting decode benchmark ({} iterations per image)...",
        args.iterations
    );

    let images = generate_images(&args.sizes, args.block)?;

    let mut results = Vec::new();
    if let Ok(r) = benchmark_decode(&FlatDecoder, &images.flat_files, args.iterations, args.freq) {
        results.push(r);
    }
    if let Ok(r) = benchmark_decode(&QuadTreeDecoder, &images.tree_files, args.iterations, args.freq) {
        results.push(r);
    }
    if let Ok(r) = benchmark_decode(&ParseOnlyDecoder, &images.tree_files, args.iterations, args.freq) {
        results.push(r);
    }

    print_benchmark_table_header("DECODING BENCHMARK RESULTS");
    for result in &results {
        println!("{}", result);
    }
    print_benchmark_table_footer();

    println!("\nBenchmarks finished.");
    Ok(())
}
