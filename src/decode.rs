use crate::{
    DecodeOptions, DecodedImage, Encoding, Error, QuadTree, Raster,
    parse::{parse_quadtree, pixel_count},
    raster::pixels_to_raster,
    tokens::TokenReader,
    validate::validate_pixels,
};
use log::debug;
use std::{
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Decodes an uncompressed image into its raster.
pub fn decode_uncompressed(reader: impl BufRead, options: &DecodeOptions) -> Result<Raster, Error> {
    let validated = validate_pixels(reader, options)?;
    pixels_to_raster(&validated)
}

/// Parses a compressed image into its quad-tree. Call [`QuadTree::to_raster`]
/// for the pixels.
pub fn decode_compressed(reader: impl BufRead, options: &DecodeOptions) -> Result<QuadTree, Error> {
    parse_quadtree(reader, options)
}

pub fn decode_from_memory(
    data: &[u8],
    encoding: Encoding,
    options: DecodeOptions,
) -> Result<DecodedImage, Error> {
    decode_buffered(data, encoding, &options)
}

pub fn decode(
    path: impl AsRef<Path>,
    encoding: Encoding,
    options: DecodeOptions,
) -> Result<DecodedImage, Error> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    debug!("Decoding {} as {:?}", path.display(), encoding);
    decode_buffered(BufReader::new(file), encoding, &options)
}

pub fn decode_from_reader(
    reader: impl Read,
    encoding: Encoding,
    options: DecodeOptions,
) -> Result<DecodedImage, Error> {
    decode_buffered(BufReader::new(reader), encoding, &options)
}

fn decode_buffered(
    reader: impl BufRead,
    encoding: Encoding,
    options: &DecodeOptions,
) -> Result<DecodedImage, Error> {
    match encoding {
        Encoding::Uncompressed => Ok(DecodedImage {
            raster: decode_uncompressed(reader, options)?,
            tree: None,
        }),
        Encoding::Compressed => {
            let tree = decode_compressed(reader, options)?;
            Ok(DecodedImage {
                raster: tree.to_raster(),
                tree: Some(tree),
            })
        }
    }
}

/// Reads just enough of `data` to report `(pixel_count, side)`.
///
/// For compressed data this is the header line alone. Uncompressed data has no
/// header, so every line counts as one pixel, blank lines included, the same
/// way decoding counts them. Values are not checked and the count is not
/// required to be a square.
pub fn read_header(data: &[u8], encoding: Encoding) -> Result<(usize, usize), Error> {
    let count = match encoding {
        Encoding::Compressed => {
            let mut tokens = TokenReader::new(data);
            pixel_count(tokens.expect_token()?)?
        }
        Encoding::Uncompressed => {
            // a final line terminator does not start another line
            let pieces = data.split(|&b| b == b'\n').count();
            pieces - usize::from(data.is_empty() || data.ends_with(b"\n"))
        }
    };
    Ok((count, count.isqrt()))
}
