use crate::validate::ValidatedPixels;
use crate::{Error, Raster};

/// Lays validated pixels out on a `side` x `side` raster.
///
/// The outer index `i` walks rows and the inner index `j` walks columns, so
/// the k-th value lands at `(x = j, y = i)` with `k = i * side + j`.
pub fn pixels_to_raster(validated: &ValidatedPixels) -> Result<Raster, Error> {
    let side = validated.side;
    if validated.pixels.len() != side * side {
        return Err(Error::NonSquareImage {
            count: validated.pixels.len(),
        });
    }

    let mut raster = Raster::new(side, 0);
    let mut values = validated.pixels.iter();
    for i in 0..side {
        for j in 0..side {
            if let Some(&value) = values.next() {
                raster.set(j, i, value);
            }
        }
    }
    Ok(raster)
}
