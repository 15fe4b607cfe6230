use std::ops::Index;

/// Token value that introduces an internal node in the compressed format.
pub const QUAD_SPLIT: i32 = -1;

/// Largest value a grayscale pixel can carry.
pub const MAX_PIXEL: i32 = 255;

/// Represents errors that can occur while decoding an image.
///
/// Line numbers are 1-based and count every line of the input, including the
/// header line of a compressed file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A token expected to be an integer is not.
    #[error("Line {line}: non-integer value `{token}`")]
    MalformedToken { line: usize, token: String },
    /// An uncompressed pixel value is outside the range 0-255.
    #[error("Line {line}: integer value {value} is outside the range 0-255")]
    PixelRange { line: usize, value: i64 },
    /// The number of uncompressed pixels is not a perfect square.
    #[error("Image size is not a square ({count} pixels)")]
    NonSquareImage { count: usize },
    /// The compressed stream ended while a node was still expected.
    #[error("Line {line}: input ended before the quad-tree was complete")]
    TruncatedInput { line: usize },
    /// An uncompressed file held no pixels at all.
    #[error("Image contains no pixels")]
    EmptyImage,
    /// The declared pixel count of a compressed file is not positive.
    #[error("Invalid declared pixel count {value}")]
    InvalidPixelCount { value: i64 },
    /// The image is larger than `DecodeOptions::max_pixels` allows.
    #[error("Too many pixels, expected at most {limit} but found {found}")]
    TooManyPixels { limit: usize, found: usize },
    /// Internal nodes are nested deeper than `DecodeOptions::max_depth` allows.
    #[error("Quad-tree deeper than {limit} levels")]
    TreeTooDeep { limit: usize },
    /// A compressed leaf value is outside the range 0-255 (strict leaves only).
    #[error("Line {line}: leaf value {value} is outside the range 0-255")]
    LeafRange { line: usize, value: i32 },
    /// Tokens follow a complete quad-tree and `TrailingTokens::Reject` is set.
    #[error("Line {line}: unexpected input after the quad-tree")]
    TrailingInput { line: usize },
    /// The specified file could not be found.
    #[error("File not found")]
    FileNotFound,
    /// An I/O error occurred while reading the input.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound,
            _ => Error::IoError(value.to_string()),
        }
    }
}

/// The two textual encodings an image file can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// One pixel value per line, no header.
    Uncompressed,
    /// A pixel count header followed by a preorder quad-tree.
    Compressed,
}

/// What to do with tokens left over after a complete quad-tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingTokens {
    /// Log a warning and drop them.
    #[default]
    Ignore,
    /// Fail with [`Error::TrailingInput`].
    Reject,
}

/// Options for controlling the decoding process.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Reject compressed leaf values outside 0-255 instead of keeping them as-is.
    /// Defaults to `false`.
    pub strict_leaves: bool,
    /// Upper bound on the number of pixels of the output raster.
    /// Defaults to `1 << 28`.
    pub max_pixels: usize,
    /// Upper bound on how deeply internal nodes may nest.
    /// Defaults to `64`.
    pub max_depth: usize,
    /// Handling of tokens after a complete quad-tree. Defaults to `Ignore`.
    pub trailing_tokens: TrailingTokens,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            strict_leaves: false,
            max_pixels: 1 << 28,
            max_depth: 64,
            trailing_tokens: TrailingTokens::Ignore,
        }
    }
}

impl DecodeOptions {
    pub(crate) fn check_pixels(&self, found: usize) -> Result<(), Error> {
        if found > self.max_pixels {
            return Err(Error::TooManyPixels {
                limit: self.max_pixels,
                found,
            });
        }
        Ok(())
    }
}

/// One of the four sub-squares an internal node splits its region into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl Quadrant {
    /// All quadrants in serialization order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperLeft,
        Quadrant::UpperRight,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Offset `(dx, dy)` of this quadrant inside a region split at `half`.
    pub fn offset(self, half: usize) -> (usize, usize) {
        match self {
            Quadrant::UpperLeft => (0, 0),
            Quadrant::UpperRight => (half, 0),
            Quadrant::LowerLeft => (0, half),
            Quadrant::LowerRight => (half, half),
        }
    }

    /// Quadrant of a region split at `half` that contains the relative point `(dx, dy)`.
    pub fn containing(dx: usize, dy: usize, half: usize) -> Quadrant {
        match (dx >= half, dy >= half) {
            (false, false) => Quadrant::UpperLeft,
            (true, false) => Quadrant::UpperRight,
            (false, true) => Quadrant::LowerLeft,
            (true, true) => Quadrant::LowerRight,
        }
    }
}

/// A quad-tree node.
///
/// Leaves carry the value of their whole region. Internal nodes own exactly four
/// children, indexed by [`Quadrant`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(i32),
    Internal(Box<[Node; 4]>),
}

impl Node {
    pub fn internal(upper_left: Node, upper_right: Node, lower_left: Node, lower_right: Node) -> Node {
        Node::Internal(Box::new([upper_left, upper_right, lower_left, lower_right]))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Child in the given quadrant, `None` for leaves.
    pub fn child(&self, quadrant: Quadrant) -> Option<&Node> {
        match self {
            Node::Leaf(_) => None,
            Node::Internal(children) => Some(&children[quadrant as usize]),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal(children) => children.iter().map(Node::leaf_count).sum(),
        }
    }

    /// Number of internal levels above the deepest leaf. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(children) => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
        }
    }

    /// Serializes the tree back into its preorder token sequence.
    pub fn preorder(&self) -> Vec<i32> {
        let mut out = Vec::new();
        self.write_preorder(&mut out);
        out
    }

    fn write_preorder(&self, out: &mut Vec<i32>) {
        match self {
            Node::Leaf(value) => out.push(*value),
            Node::Internal(children) => {
                out.push(QUAD_SPLIT);
                for child in children.iter() {
                    child.write_preorder(out);
                }
            }
        }
    }

    /// Value of the leaf covering `(x, y)` in a square region of side `size`
    /// rooted at this node, found by descending the quadrant path.
    ///
    /// Returns `None` when the point lies outside the region or when the path
    /// runs into a region of size zero.
    pub fn leaf_at(&self, x: usize, y: usize, size: usize) -> Option<i32> {
        if x >= size || y >= size {
            return None;
        }
        let mut node = self;
        let (mut dx, mut dy, mut size) = (x, y, size);
        loop {
            match node {
                Node::Leaf(value) => return Some(*value),
                Node::Internal(children) => {
                    let half = size / 2;
                    let quadrant = Quadrant::containing(dx, dy, half);
                    let (ox, oy) = quadrant.offset(half);
                    // odd sizes leave an uncovered strip past 2 * half
                    if dx - ox >= half || dy - oy >= half {
                        return None;
                    }
                    dx -= ox;
                    dy -= oy;
                    size = half;
                    node = &children[quadrant as usize];
                }
            }
        }
    }
}

/// A square grid of grayscale pixels addressed by `(x = column, y = row)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    side: usize,
    cells: Vec<i32>,
}

impl Raster {
    /// Creates a `side` x `side` raster with every cell set to `fill`.
    pub fn new(side: usize, fill: i32) -> Self {
        Raster {
            side,
            cells: vec![fill; side * side],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        if x < self.side && y < self.side {
            Some(self.cells[y * self.side + x])
        } else {
            None
        }
    }

    /// Sets a single cell. Panics when `(x, y)` is outside the raster.
    pub fn set(&mut self, x: usize, y: usize, value: i32) {
        assert!(x < self.side && y < self.side, "({x}, {y}) outside {0}x{0} raster", self.side);
        self.cells[y * self.side + x] = value;
    }

    /// Sets every cell of the square spanning columns `[x, x + size)` and rows
    /// `[y, y + size)`, clipped to the raster.
    pub fn fill_region(&mut self, x: usize, y: usize, size: usize, value: i32) {
        if x >= self.side || y >= self.side {
            return;
        }
        let x_end = (x + size).min(self.side);
        let y_end = (y + size).min(self.side);
        for row in y..y_end {
            let start = row * self.side;
            self.cells[start + x..start + x_end].fill(value);
        }
    }

    /// Rows from top to bottom, each ordered by column.
    pub fn rows(&self) -> impl Iterator<Item = &[i32]> {
        // chunks panics on zero, an empty raster simply has no rows
        self.cells.chunks(self.side.max(1))
    }

    /// Cells in row order.
    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }
}

impl Index<(usize, usize)> for Raster {
    type Output = i32;

    fn index(&self, (x, y): (usize, usize)) -> &i32 {
        assert!(x < self.side && y < self.side, "({x}, {y}) outside {0}x{0} raster", self.side);
        &self.cells[y * self.side + x]
    }
}

/// A parsed compressed image: the declared size plus the tree and the token
/// sequence recorded while reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuadTree {
    /// Total pixel count from the header line.
    pub declared_pixels: usize,
    pub root: Node,
    /// Tokens in the order they were read, one per node.
    pub preorder: Vec<i32>,
}

impl QuadTree {
    /// Side length of the raster this tree renders into.
    pub fn side(&self) -> usize {
        self.declared_pixels.isqrt()
    }
}

/// A decoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub raster: Raster,
    /// The parsed tree, present for compressed input only.
    pub tree: Option<QuadTree>,
}

impl DecodedImage {
    pub fn side(&self) -> usize {
        self.raster.side()
    }

    pub fn preorder(&self) -> Option<&[i32]> {
        self.tree.as_ref().map(|tree| tree.preorder.as_slice())
    }
}
