use super::*;

fn system_fonts() -> Option<FontSet> {
    let (bold, regular) = FontSet::discover_paths()?;
    FontSet::from_paths(&bold, &regular).ok()
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8()
}

#[test]
fn png_encoding_is_lossless() {
    let rgba: Vec<u8> = (0..4 * 4 * 4).map(|i| (i * 7 % 256) as u8).collect();
    let png = encode_png_rgba8(&rgba, 4, 4).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(decode(&png).into_raw(), rgba);
}

#[test]
fn zero_sized_surface_is_rejected() {
    let fonts = FontSet::from_bytes(Vec::new(), Vec::new());
    let err = CpuSurface::new(
        Canvas {
            width: 0,
            height: 10,
        },
        &fonts,
    )
    .err()
    .unwrap();
    assert!(matches!(err, ReelError::RasterizationFailed(_)));
}

#[test]
fn oversized_surface_is_rejected() {
    let fonts = FontSet::from_bytes(Vec::new(), Vec::new());
    let err = CpuSurface::new(
        Canvas {
            width: 70_000,
            height: 10,
        },
        &fonts,
    )
    .err()
    .unwrap();
    assert!(err.to_string().contains("exceeds u16"));
}

#[test]
fn background_only_frame_is_uniform() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let canvas = Canvas {
        width: 32,
        height: 48,
    };
    let mut surface = CpuSurface::new(canvas, &fonts).unwrap();
    surface.fill_background(Rgba8::opaque(15, 15, 15)).unwrap();
    let img = decode(&surface.encode_png().unwrap());
    assert_eq!(img.dimensions(), (32, 48));
    assert!(img.pixels().all(|p| p.0 == [15, 15, 15, 255]));
}

#[test]
fn centered_text_lands_around_the_anchor() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let canvas = Canvas {
        width: 400,
        height: 200,
    };
    let mut surface = CpuSurface::new(canvas, &fonts).unwrap();
    surface.fill_background(Rgba8::opaque(0, 0, 0)).unwrap();
    surface
        .draw_text(
            "HHHH",
            TextStyle {
                face: FontFace::Bold,
                size_px: 40.0,
                color: Rgba8::opaque(255, 255, 255),
            },
            200.0,
            100.0,
        )
        .unwrap();
    let img = decode(&surface.encode_png().unwrap());

    let lit: Vec<(u32, u32)> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 128)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!lit.is_empty());

    let min_x = lit.iter().map(|p| p.0).min().unwrap();
    let max_x = lit.iter().map(|p| p.0).max().unwrap();
    let max_y = lit.iter().map(|p| p.1).max().unwrap();
    let mid = (min_x + max_x) / 2;
    assert!((190..=210).contains(&mid), "ink centered at {mid}");
    // Capital H sits on the baseline.
    assert!((96..=102).contains(&max_y), "ink bottom at {max_y}");
}

#[test]
fn surface_is_reusable_across_frames() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font available; skipping");
        return;
    };
    let canvas = Canvas {
        width: 64,
        height: 64,
    };
    let style = TextStyle {
        face: FontFace::Regular,
        size_px: 20.0,
        color: Rgba8::opaque(255, 255, 255),
    };
    let mut surface = CpuSurface::new(canvas, &fonts).unwrap();

    surface.fill_background(Rgba8::opaque(15, 15, 15)).unwrap();
    surface.draw_text("ab", style, 32.0, 32.0).unwrap();
    let first = surface.encode_png().unwrap();

    surface.fill_background(Rgba8::opaque(15, 15, 15)).unwrap();
    let blank = decode(&surface.encode_png().unwrap());
    assert!(blank.pixels().all(|p| p.0 == [15, 15, 15, 255]));

    surface.fill_background(Rgba8::opaque(15, 15, 15)).unwrap();
    surface.draw_text("ab", style, 32.0, 32.0).unwrap();
    assert_eq!(surface.encode_png().unwrap(), first);
}
