use super::*;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("frame{i}.png")).collect()
}

#[test]
fn four_frames_render_exact_text() {
    let m = Manifest::for_frames(&names(4)).unwrap();
    assert_eq!(
        m.to_text(),
        "file 'frame0.png'\nduration 5\n\
         file 'frame1.png'\nduration 5\n\
         file 'frame2.png'\nduration 5\n\
         file 'frame3.png'"
    );
    assert_eq!(m.nominal_duration_secs(), 15);
}

#[test]
fn file_and_duration_counts_hold_for_any_length() {
    for n in 1..=12 {
        let m = Manifest::for_frames(&names(n)).unwrap();
        let text = m.to_text();
        let files = text.lines().filter(|l| l.starts_with("file ")).count();
        let durations = text.lines().filter(|l| l.starts_with("duration ")).count();
        assert_eq!(files, n);
        assert_eq!(durations, n - 1);
        assert!(text.lines().last().unwrap().starts_with("file "));
        assert_eq!(m.frame_count(), n);
        assert_eq!(m.duration_count(), n - 1);
    }
}

#[test]
fn single_frame_manifest_has_no_duration() {
    let m = Manifest::for_frames(&["frame0.png"]).unwrap();
    assert_eq!(m.to_text(), "file 'frame0.png'");
    assert_eq!(m.nominal_duration_secs(), 0);
}

#[test]
fn empty_frame_list_is_empty_script() {
    let empty: [&str; 0] = [];
    assert!(matches!(
        Manifest::for_frames(&empty),
        Err(ReelError::EmptyScript)
    ));
}

#[test]
fn unquotable_names_are_rejected() {
    assert!(Manifest::for_frames(&["it's.png"]).is_err());
}

#[test]
fn parse_reads_back_rendered_text() {
    let m = Manifest::for_frames(&names(3)).unwrap();
    assert_eq!(Manifest::parse(&m.to_text()).unwrap(), m);
}

#[test]
fn parse_rejects_broken_shapes() {
    assert!(Manifest::parse("").is_err());
    assert!(Manifest::parse("duration 5").is_err());
    assert!(Manifest::parse("file 'a.png'\nduration 5").is_err());
    assert!(Manifest::parse("file 'a.png'\nfile 'b.png'").is_err());
    assert!(Manifest::parse("file a.png").is_err());
    assert!(Manifest::parse("file 'a.png'\nduration x\nfile 'b.png'").is_err());
    assert!(Manifest::parse("inpoint 3").is_err());
}
