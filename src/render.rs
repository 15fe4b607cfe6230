use log::{debug, trace, warn};

use crate::{Node, Quadrant, QuadTree, Raster};

impl QuadTree {
    /// Renders the tree onto a fresh `side` x `side` raster.
    pub fn to_raster(&self) -> Raster {
        render_tree(&self.root, self.side())
    }
}

/// Renders `root` onto a `side` x `side` raster.
///
/// Cells not covered by any leaf, which only happens when halving hits an odd
/// size, stay 0.
pub fn render_tree(root: &Node, side: usize) -> Raster {
    let mut raster = Raster::new(side, 0);
    debug!("Rendering quad-tree onto a {side}x{side} raster");
    render(root, 0, 0, side, &mut raster);
    raster
}

/// Fills the region at `(x, y)` of side `size` from `node`, recursing into the
/// four quadrants of internal nodes.
pub fn render(node: &Node, x: usize, y: usize, size: usize, raster: &mut Raster) {
    match node {
        Node::Leaf(value) => {
            trace!("Leaf {value} at ({x}, {y}) size {size}");
            raster.fill_region(x, y, size, *value);
        }
        Node::Internal(children) => {
            if size % 2 == 1 {
                warn!("Splitting odd region of size {size} at ({x}, {y})");
            }
            let half = size / 2;
            for quadrant in Quadrant::ALL {
                let (dx, dy) = quadrant.offset(half);
                render(&children[quadrant as usize], x + dx, y + dy, half, raster);
            }
        }
    }
}
