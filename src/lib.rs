//! # qtree-rs
//!
//! Decoder for square grayscale images stored as text, either as a flat list of
//! pixel values or as a preorder-encoded quad-tree.
//!
//! ## Formats
//!
//! Both formats hold one integer per line.
//!
//! - **Uncompressed**: every line is a pixel value in 0-255. The number of lines
//!   must be a perfect square `N * N`; line `k` is the pixel at column `k % N`,
//!   row `k / N`.
//! - **Compressed**: the first line is the total pixel count `N * N`. The rest is
//!   a quad-tree in preorder: `-1` starts an internal node followed by its
//!   upper-left, upper-right, lower-left and lower-right subtrees, any other value
//!   is a leaf that paints its whole region.
//!
//! ## Features
//!
//! - Decode from files, readers or memory.
//! - Access the parsed quad-tree and the token sequence read while parsing it.
//! - Export a raster as a grayscale PNG.
//! - Limits on image size and tree depth, plus an opt-in strict check of leaf values.
//!
//! ## Examples
//!
//! ### Decoding a compressed image from a file
//!
//! ```no_run
//! use qtree_rs::{decode, format_preorder, DecodeOptions, Encoding, Error};
//!
//! fn main() -> Result<(), Error> {
//!     let decoded = decode("image.qt", Encoding::Compressed, DecodeOptions::default())?;
//!
//!     println!("Image decoded: {0}x{0}", decoded.side());
//!     if let Some(preorder) = decoded.preorder() {
//!         println!("QTree: {}", format_preorder(preorder));
//!     }
//!
//!     decoded.raster.save_png("image.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ### Working with the tree directly
//!
//! ```no_run
//! use qtree_rs::{decode_compressed, DecodeOptions, Error};
//!
//! fn main() -> Result<(), Error> {
//!     let data = b"16\n-1\n1\n2\n3\n4\n";
//!     let tree = decode_compressed(&data[..], &DecodeOptions::default())?;
//!
//!     println!("{} leaves, depth {}", tree.root.leaf_count(), tree.root.depth());
//!     let raster = tree.to_raster();
//!     assert_eq!(raster.get(3, 3), Some(4));
//!     Ok(())
//! }
//! ```

mod types;
pub use types::*;

mod tokens;

mod parse;
pub use parse::parse_quadtree;

mod validate;
pub use validate::{ValidatedPixels, square_side, validate_pixels};

mod raster;
pub use raster::pixels_to_raster;

mod render;
pub use render::{render, render_tree};

mod decode;
pub use decode::*;

mod export;
pub use export::format_preorder;
