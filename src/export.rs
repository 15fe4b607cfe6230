use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::{Error, MAX_PIXEL, Raster};

impl Raster {
    /// Converts the raster into an RGB image with each channel set to the cell value.
    ///
    /// Fails on the first cell outside 0-255, which only permissive compressed
    /// leaves can produce. The error reports line 0 since the value no longer
    /// has a source line.
    pub fn to_rgb_image(&self) -> Result<RgbImage, Error> {
        let side = u32::try_from(self.side()).map_err(|_| Error::TooManyPixels {
            limit: u32::MAX as usize,
            found: self.side(),
        })?;
        let mut img = RgbImage::new(side, side);

        for (y, row) in self.rows().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if !(0..=MAX_PIXEL).contains(&value) {
                    return Err(Error::PixelRange {
                        line: 0,
                        value: i64::from(value),
                    });
                }
                let v = value as u8;
                img.put_pixel(x as u32, y as u32, Rgb([v, v, v]));
            }
        }
        Ok(img)
    }

    /// Writes the raster as a grayscale PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.to_rgb_image()?
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| Error::IoError(e.to_string()))
    }
}

/// Formats a preorder token sequence as space separated values.
pub fn format_preorder(preorder: &[i32]) -> String {
    preorder
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_preorder() {
        assert_eq!(format_preorder(&[-1, 1, 2, 3, 4]), "-1 1 2 3 4");
        assert_eq!(format_preorder(&[]), "");
    }

    #[test]
    fn test_gray_mapping() {
        let mut raster = Raster::new(2, 0);
        raster.set(1, 0, 200);
        let img = raster.to_rgb_image().unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0), &Rgb([200, 200, 200]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_out_of_range_cell() {
        let raster = Raster::new(1, 300);
        assert_eq!(
            raster.to_rgb_image().unwrap_err(),
            Error::PixelRange { line: 0, value: 300 }
        );
    }
}
