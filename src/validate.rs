use std::io::BufRead;

use log::debug;

use crate::tokens::TokenReader;
use crate::{DecodeOptions, Error, MAX_PIXEL};

/// Pixel values of an uncompressed image that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPixels {
    /// Values in the order they were read.
    pub pixels: Vec<i32>,
    /// Side length of the square image.
    pub side: usize,
}

/// Reads an uncompressed image, one pixel value per line.
///
/// Stops at the first line that is not an integer in 0-255. Once all lines are
/// read the pixel count must be a non-zero perfect square.
pub fn validate_pixels<R: BufRead>(
    reader: R,
    options: &DecodeOptions,
) -> Result<ValidatedPixels, Error> {
    let mut tokens = TokenReader::new(reader);
    let mut pixels = Vec::new();

    while let Some(value) = tokens.next_token()? {
        if !(0..=i64::from(MAX_PIXEL)).contains(&value) {
            return Err(Error::PixelRange {
                line: tokens.line(),
                value,
            });
        }
        options.check_pixels(pixels.len() + 1)?;
        pixels.push(value as i32);
    }

    let side = square_side(pixels.len())?;
    debug!("Read {} pixels, image is {side}x{side}", pixels.len());
    Ok(ValidatedPixels { pixels, side })
}

/// Side length of a square image holding `count` pixels.
pub fn square_side(count: usize) -> Result<usize, Error> {
    if count == 0 {
        return Err(Error::EmptyImage);
    }
    let side = count.isqrt();
    if side * side != count {
        return Err(Error::NonSquareImage { count });
    }
    Ok(side)
}
