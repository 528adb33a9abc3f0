use super::*;

fn white() -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    }
}

#[test]
fn garbage_font_bytes_are_a_rasterization_error() {
    let err = TextLayoutEngine::new(b"not a font").err().unwrap();
    assert!(matches!(err, ReelError::RasterizationFailed(_)));
}

#[test]
fn missing_font_file_is_a_rasterization_error() {
    let err = FontSet::from_paths(
        Path::new("target/no-such-bold.ttf"),
        Path::new("target/no-such-regular.ttf"),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::RasterizationFailed(_)));
}

#[test]
fn debug_hides_font_bytes() {
    let fonts = FontSet::from_bytes(vec![1, 2, 3], vec![4]);
    let s = format!("{fonts:?}");
    assert!(s.contains("bold_bytes: 3"));
    assert!(s.contains("regular_bytes: 1"));
}

#[test]
fn layout_line_stays_on_one_line() {
    let Some((bold, _)) = FontSet::discover_paths() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let bytes = std::fs::read(bold).unwrap();
    let mut engine = TextLayoutEngine::new(&bytes).unwrap();
    assert!(!engine.family_name().trim().is_empty());

    let layout = engine
        .layout_line(
            "Action (10–30s): Here’s how it works and why it is blowing up around everything",
            70.0,
            white(),
        )
        .unwrap();
    assert_eq!(layout.lines().count(), 1);
    assert!(layout.width() > 1080.0);
    assert!(first_baseline(&layout) > 0.0);
}

#[test]
fn layout_rejects_non_positive_size() {
    let Some((_, regular)) = FontSet::discover_paths() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let bytes = std::fs::read(regular).unwrap();
    let mut engine = TextLayoutEngine::new(&bytes).unwrap();
    assert!(engine.layout_line("x", 0.0, white()).is_err());
    assert!(engine.layout_line("x", f32::NAN, white()).is_err());
}
