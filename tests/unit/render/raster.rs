use super::*;
use crate::foundation::core::Rgba8;
use crate::render::surface::encode_png_rgba8;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Background(Rgba8),
    Text {
        text: String,
        style: TextStyle,
        center_x: f32,
        baseline_y: f32,
    },
    Encode,
}

struct RecordingSurface {
    canvas: Canvas,
    calls: Vec<Call>,
}

impl RecordingSurface {
    fn new() -> Self {
        Self {
            canvas: SHORTS_CANVAS,
            calls: Vec::new(),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn fill_background(&mut self, color: Rgba8) -> ReelResult<()> {
        self.calls.push(Call::Background(color));
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        style: TextStyle,
        center_x: f32,
        baseline_y: f32,
    ) -> ReelResult<()> {
        self.calls.push(Call::Text {
            text: text.to_owned(),
            style,
            center_x,
            baseline_y,
        });
        Ok(())
    }

    fn encode_png(&mut self) -> ReelResult<Vec<u8>> {
        self.calls.push(Call::Encode);
        encode_png_rgba8(&[1, 2, 3, 255], 1, 1)
    }
}

struct BrokenSurface;

impl DrawSurface for BrokenSurface {
    fn canvas(&self) -> Canvas {
        SHORTS_CANVAS
    }

    fn fill_background(&mut self, _color: Rgba8) -> ReelResult<()> {
        Err(ReelError::rasterization("surface lost"))
    }

    fn draw_text(&mut self, _: &str, _: TextStyle, _: f32, _: f32) -> ReelResult<()> {
        unreachable!("background fails first")
    }

    fn encode_png(&mut self) -> ReelResult<Vec<u8>> {
        unreachable!("background fails first")
    }
}

#[test]
fn layout_follows_the_shorts_template() {
    let mut r = FrameRasterizer::new(RecordingSurface::new());
    let img = r.render("Hook: X", "Foo").unwrap();
    assert_eq!((img.width, img.height), (1080, 1920));

    let calls = &r.surface().calls;
    assert_eq!(
        calls,
        &vec![
            Call::Background(Rgba8::opaque(0x0f, 0x0f, 0x0f)),
            Call::Text {
                text: "Hook: X".to_owned(),
                style: TextStyle {
                    face: FontFace::Bold,
                    size_px: 70.0,
                    color: Rgba8::opaque(255, 255, 255),
                },
                center_x: 540.0,
                baseline_y: 960.0,
            },
            Call::Text {
                text: "Foo".to_owned(),
                style: TextStyle {
                    face: FontFace::Regular,
                    size_px: 50.0,
                    color: Rgba8::opaque(255, 255, 255),
                },
                center_x: 540.0,
                baseline_y: 1720.0,
            },
            Call::Encode,
        ]
    );
}

#[test]
fn render_frame_tags_index_and_text() {
    let mut r = FrameRasterizer::new(RecordingSurface::new());
    let frame = r.render_frame(FrameIndex(3), "CTA: W", "Foo").unwrap();
    assert_eq!(frame.index, FrameIndex(3));
    assert_eq!(frame.line, "CTA: W");
    assert_eq!(frame.caption, "Foo");
    assert_eq!(frame.image.decode_rgba().unwrap(), vec![1, 2, 3, 255]);
}

#[test]
fn surface_failure_propagates() {
    let mut r = FrameRasterizer::new(BrokenSurface);
    let err = r.render("x", "y").unwrap_err();
    assert!(matches!(err, ReelError::RasterizationFailed(_)));
}

#[test]
fn fingerprint_tracks_bytes() {
    let a = RasterImage {
        width: 1,
        height: 1,
        png: vec![1, 2, 3],
    };
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.png.push(4);
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn cpu_frames_are_deterministic_and_distinct() {
    let Some((bold, regular)) = FontSet::discover_paths() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let fonts = FontSet::from_paths(&bold, &regular).unwrap();
    let mut r = FrameRasterizer::cpu(&fonts).unwrap();

    let a = r.render("Hook: X", "Foo").unwrap();
    let b = r.render("Tease: Y", "Foo").unwrap();
    let a2 = r.render("Hook: X", "Foo").unwrap();

    assert_eq!((a.width, a.height), (1080, 1920));
    assert_eq!(a.fingerprint(), a2.fingerprint());
    assert_ne!(a.fingerprint(), b.fingerprint());

    let px = a.decode_rgba().unwrap();
    assert_eq!(px.len(), 1080 * 1920 * 4);
    // Top-left corner is pure background.
    assert_eq!(&px[..4], &[0x0f, 0x0f, 0x0f, 255]);
}
