//! Single-image pipeline tests.
//!
//! Tests verify:
//! - Tile files, names, and sizes for PNG and JPEG sources
//! - Truncation-drop geometry and the opt-in cover mode
//! - Format errors leave no output behind
//! - Manifests are byte-identical across runs

use std::fs;

use image::ColorType;

use image_slicer::{
    clear_output_dir, manifest_path, read_manifest, GridSpec, RemainderMode, SliceError,
    SliceJob, SliceOptions, SliceSummary, SliceWorker, TileCodec, TileNaming, TileOrigin,
};

use super::test_utils::{is_valid_jpeg, is_valid_png, Workspace};

fn grid(rows: u32, cols: u32) -> GridSpec {
    GridSpec::new(rows, cols).unwrap()
}

fn slice(
    ws: &Workspace,
    name: &str,
    grid: GridSpec,
    options: SliceOptions,
) -> Result<SliceSummary, SliceError> {
    let job = SliceJob::new(ws.input_dir().join(name), ws.output_dir(), grid);
    SliceWorker::new(job, options).run()
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_png_grid_files_and_origins() {
    let ws = Workspace::new();
    ws.add_png("map.png", 90, 60);

    let summary = slice(&ws, "map.png", grid(2, 3), SliceOptions::default()).unwrap();

    assert_eq!(
        ws.output_files(),
        vec![
            "map-11.png",
            "map-12.png",
            "map-13.png",
            "map-21.png",
            "map-22.png",
            "map-23.png",
            "map.json"
        ]
    );

    let expected: Vec<TileOrigin> = [(0, 0), (30, 0), (60, 0), (0, 30), (30, 30), (60, 30)]
        .into_iter()
        .map(|(x, y)| TileOrigin { x, y })
        .collect();
    assert_eq!(summary.origins, expected);
    assert_eq!(read_manifest(&summary.manifest_path).unwrap(), expected);

    for path in &summary.tile_paths {
        let bytes = fs::read(path).unwrap();
        assert!(is_valid_png(&bytes));
        let tile = image::load_from_memory(&bytes).unwrap();
        assert_eq!((tile.width(), tile.height()), (30, 30));
    }
}

#[test]
fn test_tile_pixels_match_source_region() {
    let ws = Workspace::new();
    ws.add_png("g.png", 40, 40);

    slice(&ws, "g.png", grid(2, 2), SliceOptions::default()).unwrap();

    let tile = image::open(ws.output_dir().join("g-21.png")).unwrap().to_rgb8();
    // Tile (row 1, col 0) starts at (0, 20)
    assert_eq!(tile.get_pixel(0, 0).0, [0, 20, 0]);
    assert_eq!(tile.get_pixel(19, 19).0, [19, 39, 0]);
}

#[test]
fn test_truncation_drops_remainder() {
    let ws = Workspace::new();
    ws.add_png("odd.png", 103, 10);

    let summary = slice(&ws, "odd.png", grid(1, 4), SliceOptions::default()).unwrap();

    let row_width: u32 = summary
        .tile_paths
        .iter()
        .map(|p| image::open(p).unwrap().width())
        .sum();
    assert_eq!(row_width, 4 * (103 / 4));
    assert!(row_width < 103);
}

#[test]
fn test_cover_mode_spans_image() {
    let ws = Workspace::new();
    ws.add_png("odd.png", 103, 10);

    let options = SliceOptions {
        remainder: RemainderMode::Cover,
        ..SliceOptions::default()
    };
    let summary = slice(&ws, "odd.png", grid(1, 4), options).unwrap();

    let widths: Vec<u32> = summary
        .tile_paths
        .iter()
        .map(|p| image::open(p).unwrap().width())
        .collect();
    assert_eq!(widths, vec![25, 25, 25, 28]);
}

#[test]
fn test_single_tile_spans_whole_image() {
    let ws = Workspace::new();
    ws.add_png("one.png", 37, 21);

    let summary = slice(&ws, "one.png", grid(1, 1), SliceOptions::default()).unwrap();

    assert_eq!(summary.origins, vec![TileOrigin { x: 0, y: 0 }]);
    let tile = image::open(ws.output_dir().join("one-11.png")).unwrap();
    assert_eq!((tile.width(), tile.height()), (37, 21));
}

#[test]
fn test_grid_larger_than_image_fails() {
    let ws = Workspace::new();
    ws.add_png("small.png", 4, 4);

    let err = slice(&ws, "small.png", grid(8, 1), SliceOptions::default()).unwrap_err();

    assert_eq!(err.kind(), "tile-write");
    assert!(ws.output_files().is_empty());
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn test_jpeg_source_produces_jpeg_tiles() {
    let ws = Workspace::new();
    ws.add_jpeg("shot.jpeg", 64, 48);

    let summary = slice(&ws, "shot.jpeg", grid(2, 2), SliceOptions::default()).unwrap();

    assert_eq!(ws.output_files_for("shot-").len(), 4);
    for path in &summary.tile_paths {
        assert_eq!(path.extension().unwrap(), "jpeg");
        let bytes = fs::read(path).unwrap();
        assert!(is_valid_jpeg(&bytes));
    }
}

#[test]
fn test_jpeg_quality_affects_size() {
    let ws = Workspace::new();
    ws.add_jpeg("q.jpg", 128, 128);

    let high = slice(&ws, "q.jpg", grid(1, 1), SliceOptions::default()).unwrap();
    let high_len = fs::metadata(&high.tile_paths[0]).unwrap().len();

    let options = SliceOptions {
        codec: TileCodec::with_jpeg_quality(10),
        ..SliceOptions::default()
    };
    let low = slice(&ws, "q.jpg", grid(1, 1), options).unwrap();
    let low_len = fs::metadata(&low.tile_paths[0]).unwrap().len();

    assert!(low_len < high_len);
}

#[test]
fn test_rgba_png_keeps_alpha() {
    let ws = Workspace::new();
    ws.add_rgba_png("alpha.png", 16, 16);

    slice(&ws, "alpha.png", grid(2, 2), SliceOptions::default()).unwrap();

    let tile = image::open(ws.output_dir().join("alpha-22.png")).unwrap();
    assert_eq!(tile.color(), ColorType::Rgba8);
    assert_eq!(tile.to_rgba8().get_pixel(0, 0).0, [8, 8, 200, 128]);
}

#[test]
fn test_unsupported_extension_creates_nothing() {
    let ws = Workspace::new();
    ws.add_raw("anim.gif", b"GIF89a\x01\x00\x01\x00");

    let err = slice(&ws, "anim.gif", grid(2, 2), SliceOptions::default()).unwrap_err();

    assert!(matches!(err, SliceError::Format { .. }));
    assert!(ws.output_files().is_empty());
}

#[test]
fn test_extension_decides_decoder() {
    // PNG content with a .jpg extension is decoded as JPEG and fails
    let ws = Workspace::new();
    ws.add_png("liar.png", 8, 8);
    fs::rename(ws.input_dir().join("liar.png"), ws.input_dir().join("liar.jpg")).unwrap();

    let err = slice(&ws, "liar.jpg", grid(1, 1), SliceOptions::default()).unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[test]
fn test_missing_extension() {
    let ws = Workspace::new();
    ws.add_raw("README", b"hello");

    let err = slice(&ws, "README", grid(1, 1), SliceOptions::default()).unwrap_err();
    assert_eq!(err.kind(), "format");
}

// =============================================================================
// Naming
// =============================================================================

#[test]
fn test_concatenated_names_collide_at_double_digits() {
    let ws = Workspace::new();
    ws.add_png("big.png", 22, 22);

    let summary = slice(&ws, "big.png", grid(11, 11), SliceOptions::default()).unwrap();

    assert_eq!(summary.tile_count(), 121);
    // Colliding names overwrite each other
    let tiles = ws.output_files_for("big-").len();
    assert!(tiles < 121, "expected collisions, got {tiles} distinct files");
}

#[test]
fn test_padded_names_are_unique() {
    let ws = Workspace::new();
    ws.add_png("big.png", 22, 22);

    let options = SliceOptions {
        naming: TileNaming::Padded,
        ..SliceOptions::default()
    };
    slice(&ws, "big.png", grid(11, 11), options).unwrap();

    let tiles = ws.output_files_for("big-");
    assert_eq!(tiles.len(), 121);
    assert!(tiles.contains(&"big-01-11.png".to_string()));
    assert!(tiles.contains(&"big-11-01.png".to_string()));
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_manifest_is_byte_identical_across_runs() {
    let ws = Workspace::new();
    ws.add_png("same.png", 77, 53);
    let manifest = manifest_path(ws.output_dir(), "same");

    slice(&ws, "same.png", grid(3, 4), SliceOptions::default()).unwrap();
    let first = fs::read(&manifest).unwrap();
    let first_tile = fs::read(ws.output_dir().join("same-23.png")).unwrap();

    clear_output_dir(ws.output_dir()).unwrap();
    assert!(ws.output_files().is_empty());

    slice(&ws, "same.png", grid(3, 4), SliceOptions::default()).unwrap();
    let second = fs::read(&manifest).unwrap();
    let second_tile = fs::read(ws.output_dir().join("same-23.png")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_tile, second_tile);
}
