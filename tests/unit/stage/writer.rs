use super::*;
use crate::render::raster::RasterImage;
use crate::stage::area::MemWorkArea;

fn frame(i: u32) -> Frame {
    Frame {
        index: FrameIndex(i),
        image: RasterImage {
            width: 1,
            height: 1,
            png: vec![i as u8; 3],
        },
        line: format!("line {i}"),
        caption: "Foo".to_owned(),
    }
}

#[test]
fn stages_every_frame_and_the_manifest() {
    let frames: Vec<Frame> = (0..4).map(frame).collect();
    let mut area = MemWorkArea::new();
    let manifest = stage(&frames, &mut area).unwrap();

    assert_eq!(
        area.names(),
        vec![
            "concat.txt",
            "frame0.png",
            "frame1.png",
            "frame2.png",
            "frame3.png"
        ]
    );
    for i in 0..4u32 {
        assert_eq!(
            area.read(&frame_slot_name(FrameIndex(i))).unwrap(),
            vec![i as u8; 3]
        );
    }
    let text = String::from_utf8(area.read(MANIFEST_NAME).unwrap()).unwrap();
    assert_eq!(text, manifest.to_text());
    assert_eq!(manifest.frame_count(), 4);
    assert_eq!(manifest.duration_count(), 3);
}

#[test]
fn manifest_order_follows_index_past_ten() {
    let frames: Vec<Frame> = (0..12).map(frame).collect();
    let mut area = MemWorkArea::new();
    let manifest = stage(&frames, &mut area).unwrap();
    let order: Vec<&str> = manifest
        .entries()
        .iter()
        .map(|e| e.frame_name.as_str())
        .collect();
    assert_eq!(order[1], "frame1.png");
    assert_eq!(order[2], "frame2.png");
    assert_eq!(order[10], "frame10.png");
    assert_eq!(order[11], "frame11.png");
}

#[test]
fn empty_input_fails_before_any_write() {
    let mut area = MemWorkArea::new();
    assert!(matches!(stage(&[], &mut area), Err(ReelError::EmptyScript)));
    assert!(area.is_empty());
}

#[test]
fn non_dense_indices_fail_before_any_write() {
    let frames = vec![frame(0), frame(2)];
    let mut area = MemWorkArea::new();
    assert!(matches!(
        stage(&frames, &mut area),
        Err(ReelError::Validation(_))
    ));
    assert!(area.is_empty());
}

#[test]
fn restaging_overwrites_previous_slots() {
    let mut area = MemWorkArea::new();
    stage(&(0..3).map(frame).collect::<Vec<_>>(), &mut area).unwrap();

    let mut second: Vec<Frame> = (0..2).map(frame).collect();
    second[0].image.png = vec![9, 9];
    let manifest = stage(&second, &mut area).unwrap();

    assert_eq!(area.read("frame0.png").unwrap(), vec![9, 9]);
    let text = String::from_utf8(area.read(MANIFEST_NAME).unwrap()).unwrap();
    assert_eq!(text, manifest.to_text());
    assert!(!text.contains("frame2.png"));
}
