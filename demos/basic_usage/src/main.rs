use qtree_rs::{DecodeOptions, Encoding, Error, decode, decode_from_memory, format_preorder};
use std::path::Path;

fn main() -> Result<(), Error> {
    // --- Compressed Example ---
    println!("Decoding in-memory quad-tree...");
    // 4x4 image: upper-left quadrant split into single pixels, the rest uniform
    let compressed = b"16\n-1\n-1\n0\n85\n170\n255\n64\n128\n192\n";

    let decoded = decode_from_memory(compressed, Encoding::Compressed, DecodeOptions::default())?;
    println!("Image decoded successfully: {0}x{0}", decoded.side());
    if let Some(preorder) = decoded.preorder() {
        println!("QTree: {}", format_preorder(preorder));
    }
    for row in decoded.raster.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{:>3}", v)).collect();
        println!("  {}", line.join(" "));
    }

    // --- Uncompressed Example ---
    println!("\n--- Uncompressed Example ---");
    let input_path_str = "image.txt";
    let input_path = Path::new(input_path_str);

    if !input_path.exists() {
        eprintln!("Skipping: input file not found at {}", input_path.display());
        return Ok(());
    }

    match decode(input_path, Encoding::Uncompressed, DecodeOptions::default()) {
        Ok(decoded) => {
            println!(
                "Image '{}' decoded successfully: {1}x{1}",
                input_path.display(),
                decoded.side()
            );
            let output_path = Path::new("./output/image.png");
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Error::IoError(e.to_string()))?;
            }
            decoded.raster.save_png(output_path)?;
            println!("Image saved to '{}'", output_path.display());
        }
        Err(e) => {
            eprintln!("Error decoding image '{}': {}", input_path.display(), e);
            return Err(e);
        }
    }

    Ok(())
}
