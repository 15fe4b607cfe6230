use std::io::BufRead;

use log::{debug, trace, warn};

use crate::tokens::{TokenReader, to_i32};
use crate::{DecodeOptions, Error, MAX_PIXEL, Node, QUAD_SPLIT, QuadTree, TrailingTokens};

/// Parses a compressed image: a pixel count header line followed by the
/// preorder quad-tree, one token per line.
///
/// The returned preorder sequence holds every tree token in the order it was
/// read.
pub fn parse_quadtree<R: BufRead>(reader: R, options: &DecodeOptions) -> Result<QuadTree, Error> {
    let mut tokens = TokenReader::new(reader);

    let declared_pixels = read_pixel_count(&mut tokens, options)?;
    debug!("Declared pixel count: {declared_pixels}");

    let mut preorder = Vec::new();
    let tag = tokens.expect_token()?;
    let root = parse_node(tag, &mut tokens, &mut preorder, 0, options)?;
    debug!(
        "Parsed quad-tree: {} nodes, {} leaves, depth {}",
        preorder.len(),
        root.leaf_count(),
        root.depth()
    );

    if tokens.has_more_content()? {
        match options.trailing_tokens {
            TrailingTokens::Ignore => {
                warn!("Ignoring input after the quad-tree, starting at line {}", tokens.line())
            }
            TrailingTokens::Reject => return Err(Error::TrailingInput { line: tokens.line() }),
        }
    }

    Ok(QuadTree {
        declared_pixels,
        root,
        preorder,
    })
}

fn read_pixel_count<R: BufRead>(
    tokens: &mut TokenReader<R>,
    options: &DecodeOptions,
) -> Result<usize, Error> {
    let declared = pixel_count(tokens.expect_token()?)?;
    options.check_pixels(declared)?;

    let side = declared.isqrt();
    if side * side != declared {
        warn!("Declared pixel count {declared} is not a square, using a {side}x{side} raster");
    }
    Ok(declared)
}

/// Interprets a header token, which must be a positive pixel count.
pub(crate) fn pixel_count(value: i64) -> Result<usize, Error> {
    usize::try_from(value)
        .ok()
        .filter(|&count| count >= 1)
        .ok_or(Error::InvalidPixelCount { value })
}

/// Builds the node introduced by `tag`, reading its children from `tokens`.
fn parse_node<R: BufRead>(
    tag: i64,
    tokens: &mut TokenReader<R>,
    preorder: &mut Vec<i32>,
    depth: usize,
    options: &DecodeOptions,
) -> Result<Node, Error> {
    let line = tokens.line();
    let tag = to_i32(tag, line)?;
    preorder.push(tag);

    if tag == QUAD_SPLIT {
        if depth >= options.max_depth {
            return Err(Error::TreeTooDeep {
                limit: options.max_depth,
            });
        }
        trace!("Line {line}: internal node at depth {depth}");
        let upper_left = parse_child(tokens, preorder, depth + 1, options)?;
        let upper_right = parse_child(tokens, preorder, depth + 1, options)?;
        let lower_left = parse_child(tokens, preorder, depth + 1, options)?;
        let lower_right = parse_child(tokens, preorder, depth + 1, options)?;
        return Ok(Node::internal(upper_left, upper_right, lower_left, lower_right));
    }

    if options.strict_leaves && !(0..=MAX_PIXEL).contains(&tag) {
        return Err(Error::LeafRange { line, value: tag });
    }
    Ok(Node::Leaf(tag))
}

fn parse_child<R: BufRead>(
    tokens: &mut TokenReader<R>,
    preorder: &mut Vec<i32>,
    depth: usize,
    options: &DecodeOptions,
) -> Result<Node, Error> {
    let tag = tokens.expect_token()?;
    parse_node(tag, tokens, preorder, depth, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<QuadTree, Error> {
        parse_quadtree(input.as_bytes(), &DecodeOptions::default())
    }

    #[test]
    fn test_parse_single_split() {
        let tree = parse("16\n-1\n1\n2\n3\n4\n").unwrap();
        assert_eq!(tree.declared_pixels, 16);
        assert_eq!(tree.side(), 4);
        assert_eq!(tree.preorder, vec![-1, 1, 2, 3, 4]);
        assert_eq!(
            tree.root,
            Node::internal(Node::Leaf(1), Node::Leaf(2), Node::Leaf(3), Node::Leaf(4))
        );
    }

    #[test]
    fn test_parse_single_leaf_image() {
        let tree = parse("64\n200").unwrap();
        assert_eq!(tree.root, Node::Leaf(200));
        assert_eq!(tree.preorder, vec![200]);
    }

    #[test]
    fn test_preorder_matches_input_tokens() {
        let tokens = [-1, 0, -1, 10, 20, 30, 40, 255, -1, 1, 2, -1, 5, 6, 7, 8, 4];
        let input: String = std::iter::once("64".to_string())
            .chain(tokens.iter().map(|t| t.to_string()))
            .collect::<Vec<_>>()
            .join("\n");
        let tree = parse(&input).unwrap();
        assert_eq!(tree.preorder, tokens);
        assert_eq!(tree.root.preorder(), tokens);
    }

    #[test]
    fn test_truncated_children() {
        assert_eq!(parse("16\n-1\n1\n2\n"), Err(Error::TruncatedInput { line: 5 }));
        assert_eq!(parse("16\n"), Err(Error::TruncatedInput { line: 2 }));
        assert_eq!(parse(""), Err(Error::TruncatedInput { line: 1 }));
    }

    #[test]
    fn test_malformed_token() {
        assert_eq!(
            parse("16\n-1\n1\nx\n3\n4\n"),
            Err(Error::MalformedToken {
                line: 4,
                token: "x".to_string()
            })
        );
        assert!(matches!(parse("\n-1\n"), Err(Error::MalformedToken { line: 1, .. })));
    }

    #[test]
    fn test_invalid_pixel_count() {
        assert_eq!(parse("0\n5\n"), Err(Error::InvalidPixelCount { value: 0 }));
        assert_eq!(parse("-4\n5\n"), Err(Error::InvalidPixelCount { value: -4 }));
        let options = DecodeOptions {
            max_pixels: 8,
            ..Default::default()
        };
        assert_eq!(
            parse_quadtree("16\n5\n".as_bytes(), &options),
            Err(Error::TooManyPixels { limit: 8, found: 16 })
        );
    }

    #[test]
    fn test_leaf_values_kept_unless_strict() {
        let tree = parse("4\n-1\n300\n-7\n0\n1\n").unwrap();
        assert_eq!(tree.preorder, vec![-1, 300, -7, 0, 1]);

        let strict = DecodeOptions {
            strict_leaves: true,
            ..Default::default()
        };
        assert_eq!(
            parse_quadtree("4\n-1\n300\n-7\n0\n1\n".as_bytes(), &strict),
            Err(Error::LeafRange { line: 3, value: 300 })
        );
    }

    #[test]
    fn test_depth_limit() {
        let options = DecodeOptions {
            max_depth: 2,
            ..Default::default()
        };
        let nested = "64\n-1\n-1\n-1\n1\n1\n1\n1\n";
        assert_eq!(
            parse_quadtree(nested.as_bytes(), &options),
            Err(Error::TreeTooDeep { limit: 2 })
        );
    }

    #[test]
    fn test_trailing_tokens() {
        let input = "4\n7\n8\n";
        assert_eq!(parse(input).unwrap().root, Node::Leaf(7));
        assert_eq!(parse("4\n7\n\n\n").unwrap().preorder, vec![7]);

        let reject = DecodeOptions {
            trailing_tokens: TrailingTokens::Reject,
            ..Default::default()
        };
        assert_eq!(
            parse_quadtree(input.as_bytes(), &reject),
            Err(Error::TrailingInput { line: 3 })
        );
    }
}
