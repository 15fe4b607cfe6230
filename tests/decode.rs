use qtree_rs::{
    DecodeOptions, Encoding, Error, decode, decode_from_memory, decode_from_reader, format_preorder,
    read_header,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

const TEST_DATA_DIR: &str = "tests/data";

fn get_test_file_path(name: &str) -> String {
    format!("{}/{}", TEST_DATA_DIR, name)
}

#[test]
fn test_decode_uncompressed_scenario() {
    let decoded = decode(
        get_test_file_path("scenario_a.txt"),
        Encoding::Uncompressed,
        DecodeOptions::default(),
    )
    .expect("Failed to decode scenario_a.txt");

    assert_eq!(decoded.side(), 2);
    assert_eq!(decoded.raster.get(0, 0), Some(10));
    assert_eq!(decoded.raster.get(1, 0), Some(20));
    assert_eq!(decoded.raster.get(0, 1), Some(30));
    assert_eq!(decoded.raster.get(1, 1), Some(40));
    assert!(decoded.preorder().is_none());
}

#[test]
fn test_decode_compressed_scenario() {
    let decoded = decode(
        get_test_file_path("scenario_b.qt"),
        Encoding::Compressed,
        DecodeOptions::default(),
    )
    .expect("Failed to decode scenario_b.qt");

    assert_eq!(decoded.side(), 4);
    for y in 0..4 {
        for x in 0..4 {
            let expected = match (x < 2, y < 2) {
                (true, true) => 1,
                (false, true) => 2,
                (true, false) => 3,
                (false, false) => 4,
            };
            assert_eq!(decoded.raster[(x, y)], expected, "pixel ({}, {})", x, y);
        }
    }
    assert_eq!(decoded.preorder(), Some(&[-1, 1, 2, 3, 4][..]));
    assert_eq!(format_preorder(decoded.preorder().unwrap()), "-1 1 2 3 4");
}

#[test]
fn test_decode_compressed_nested() {
    let decoded = decode(
        get_test_file_path("gradient.qt"),
        Encoding::Compressed,
        DecodeOptions::default(),
    )
    .expect("Failed to decode gradient.qt");

    let rows: Vec<&[i32]> = decoded.raster.rows().collect();
    assert_eq!(rows[0], &[0, 85, 64, 64]);
    assert_eq!(rows[1], &[170, 255, 64, 64]);
    assert_eq!(rows[2], &[128, 128, 192, 192]);
    assert_eq!(rows[3], &[128, 128, 192, 192]);

    let tree = decoded.tree.as_ref().unwrap();
    assert_eq!(tree.root.leaf_count(), 7);
    assert_eq!(tree.root.preorder(), tree.preorder);
}

#[test]
fn test_preorder_equals_file_tokens() {
    let file_path = get_test_file_path("gradient.qt");
    let text = fs::read_to_string(&file_path).unwrap_or_else(|_| panic!("Failed to read {}", file_path));
    let tokens: Vec<i32> = text.lines().skip(1).map(|l| l.parse().unwrap()).collect();

    let decoded = decode(&file_path, Encoding::Compressed, DecodeOptions::default()).unwrap();
    assert_eq!(decoded.preorder(), Some(tokens.as_slice()));
}

#[test]
fn test_decode_truncated_compressed() {
    let result = decode(
        get_test_file_path("truncated.qt"),
        Encoding::Compressed,
        DecodeOptions::default(),
    );
    assert_eq!(result, Err(Error::TruncatedInput { line: 5 }));
}

#[test]
fn test_decode_invalid_uncompressed_files() {
    let cases = [
        ("nonsquare.txt", Error::NonSquareImage { count: 5 }),
        (
            "bad_token.txt",
            Error::MalformedToken {
                line: 2,
                token: "abc".to_string(),
            },
        ),
        ("range.txt", Error::PixelRange { line: 3, value: 256 }),
    ];

    for (file_name, expected) in cases {
        let result = decode(
            get_test_file_path(file_name),
            Encoding::Uncompressed,
            DecodeOptions::default(),
        );
        assert_eq!(result, Err(expected), "unexpected result for {}", file_name);
    }
}

#[test]
fn test_decode_negative_uncompressed_pixel() {
    let result = decode_from_memory(b"-1\n", Encoding::Uncompressed, DecodeOptions::default());
    assert_eq!(result, Err(Error::PixelRange { line: 1, value: -1 }));
}

#[test]
fn test_decode_from_reader_matches_path() {
    for (file_name, encoding) in [
        ("scenario_a.txt", Encoding::Uncompressed),
        ("scenario_b.qt", Encoding::Compressed),
    ] {
        let file_path = get_test_file_path(file_name);
        let file = File::open(&file_path).unwrap_or_else(|_| panic!("Failed to open {}", file_path));
        let from_reader = decode_from_reader(BufReader::new(file), encoding, DecodeOptions::default())
            .expect("Failed to decode via reader");
        let from_path = decode(&file_path, encoding, DecodeOptions::default()).unwrap();
        assert_eq!(from_reader, from_path);
    }
}

#[test]
fn test_decode_is_repeatable() {
    let file_path = get_test_file_path("gradient.qt");
    let first = decode(&file_path, Encoding::Compressed, DecodeOptions::default()).unwrap();
    let second = decode(&file_path, Encoding::Compressed, DecodeOptions::default()).unwrap();
    assert_eq!(first.raster, second.raster);
}

#[test]
fn test_decode_non_existent_file() {
    let path = Path::new("tests/data/non_existent_file.qt");
    let result = decode(path, Encoding::Compressed, DecodeOptions::default());
    assert_eq!(result, Err(Error::FileNotFound));
}

#[test]
fn test_decode_unopenable_path_keeps_io_error() {
    // a regular file cannot be used as a directory
    let path = Path::new("tests/data/scenario_a.txt/nested.txt");
    let result = decode(path, Encoding::Uncompressed, DecodeOptions::default());
    assert!(
        matches!(result, Err(Error::IoError(_))),
        "expected an I/O error, got {:?}",
        result
    );
}

#[test]
fn test_read_header_from_files() {
    let data = fs::read(get_test_file_path("scenario_b.qt")).unwrap();
    assert_eq!(read_header(&data, Encoding::Compressed), Ok((16, 4)));

    let data = fs::read(get_test_file_path("nonsquare.txt")).unwrap();
    assert_eq!(read_header(&data, Encoding::Uncompressed), Ok((5, 2)));
}

#[test]
fn test_save_png() {
    let decoded = decode(
        get_test_file_path("gradient.qt"),
        Encoding::Compressed,
        DecodeOptions::default(),
    )
    .unwrap();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("gradient.png");
    decoded.raster.save_png(&output).expect("Failed to save PNG");

    let metadata = fs::metadata(&output).expect("Failed to get metadata for output file.");
    assert!(metadata.len() > 0, "Output file is empty.");
}
