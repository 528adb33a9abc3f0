use super::*;

#[test]
fn blank_lines_never_become_script_lines() {
    let text = "\n  \nHook: X\n\t\nTease: Y\n\n   Action: Z  \nCTA: W\n\n";
    let lines = script_lines(text);
    let got: Vec<&str> = lines.iter().map(ScriptLine::as_str).collect();
    assert_eq!(got, vec!["Hook: X", "Tease: Y", "Action: Z", "CTA: W"]);
}

#[test]
fn line_count_is_independent_of_blank_positions() {
    let variants = [
        "a\nb\nc",
        "\n\na\nb\nc",
        "a\n\n\nb\n \nc\n",
        "  \r\na\r\n\r\nb\r\nc\r\n",
    ];
    for v in variants {
        assert_eq!(script_lines(v).len(), 3, "input {v:?}");
    }
}

#[test]
fn whitespace_only_script_is_empty() {
    assert!(script_lines("   \n\t\n\r\n").is_empty());
    assert!(script_lines("").is_empty());
}

#[test]
fn script_line_new_trims_and_rejects_blank() {
    assert_eq!(ScriptLine::new("  hi  ").unwrap().as_str(), "hi");
    assert!(matches!(
        ScriptLine::new(" \t "),
        Err(ReelError::Validation(_))
    ));
}

#[test]
fn shorts_template_has_four_beats_mentioning_topic() {
    let lines = ShortsTemplate.lines("Foo Bar");
    assert_eq!(lines.len(), 4);
    assert!(lines[0].as_str().starts_with("Hook"));
    assert!(lines[1].as_str().starts_with("Tease"));
    assert!(lines[2].as_str().starts_with("Action"));
    assert!(lines[3].as_str().starts_with("CTA"));
    assert!(lines[..3].iter().all(|l| l.as_str().contains("Foo Bar")));
}

#[test]
fn long_outline_has_six_timestamped_lines() {
    let lines = LongOutlineTemplate.lines("Foo");
    assert_eq!(lines.len(), 6);
    assert!(lines[0].as_str().starts_with("0:00"));
    assert!(lines[5].as_str().starts_with("9:00"));
}
