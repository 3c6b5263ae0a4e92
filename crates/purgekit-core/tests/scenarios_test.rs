//! End-to-end runs through the public processing API.

use purgekit_core::{RelocationConfig, RunningTotals, StreamProcessor};
use std::io::Cursor;

fn run(input: &str, config: RelocationConfig) -> (Vec<String>, RunningTotals) {
    let processor = StreamProcessor::new(config).expect("valid config");
    let mut output = Vec::new();
    let totals = processor
        .process(Cursor::new(input), &mut output)
        .expect("processing succeeds");
    let text = String::from_utf8(output).expect("utf-8 output");
    (text.lines().map(|l| l.to_string()).collect(), totals)
}

fn config(threshold: f64) -> RelocationConfig {
    RelocationConfig {
        threshold,
        ..Default::default()
    }
}

/// 100 x 5 mm extrusion lines followed by a tool change.
fn long_single_tool_input() -> String {
    let mut input = String::from("; generated by SuperSlicer 2.5\n");
    for i in 0..100 {
        input.push_str(&format!("G1 X{} Y{} E5.0\n", i, i));
    }
    input.push_str("T1\n");
    input
}

#[test]
fn test_tool_change_relocated_at_trailing_threshold_boundary() {
    // 500 mm precede T1; with a 50 mm threshold the relocation point is
    // the 10th extrusion line counted back from the tool change.
    let (lines, totals) = run(&long_single_tool_input(), config(50.0));

    assert_eq!(totals.tool_changes, 1);
    assert_eq!(totals.relocated, 1);
    assert_eq!(totals.purge_fallbacks, 0);

    // Input line 92 is `G1 X90 Y90 E5.0`; the relocated T1 follows it.
    let point = lines
        .iter()
        .position(|l| l.as_str() == "G1 X90 Y90 E5.0")
        .expect("relocation point present");
    assert_eq!(lines[point + 1], "T1");

    // The original tool-change line is now a comment naming both spots.
    let rewritten = lines
        .iter()
        .find(|l| l.starts_with("; T1 moved after line 92"))
        .expect("original line rewritten");
    assert!(rewritten.contains("was line 102"));
}

#[test]
fn test_unreachable_threshold_falls_back_to_purge() {
    let mut cfg = config(10000.0);
    cfg.purge_code = Some("G1 E{threshold} F200 ; purge".to_string());

    let (lines, totals) = run(&long_single_tool_input(), cfg);

    assert_eq!(totals.relocated, 0);
    assert_eq!(totals.purge_fallbacks, 1);

    // T1 keeps its position; the substituted purge text follows it.
    let tc = lines.iter().position(|l| l.as_str() == "T1").expect("T1 in place");
    assert_eq!(lines[tc + 1], "G1 E10000 F200 ; purge");
}

#[test]
fn test_small_following_segment_skips_tool_change() {
    let input = "\
G1 X0 Y0 E10.0
G1 X1 Y1 E10.0
T0
G1 X2 Y2 E10.0
T1
G1 X3 Y3 E2.0
";
    let mut cfg = config(1.0);
    cfg.skip_threshold = 5.0;

    let (lines, totals) = run(input, cfg);

    assert_eq!(totals.tool_changes, 2);
    assert_eq!(totals.skipped, 1);

    // T1 survives as a commented-out line, with no purge or relocation
    // text anywhere near it.
    let commented = lines
        .iter()
        .find(|l| l.starts_with("; T1 ; skipped"))
        .expect("skipped tool change commented out");
    assert!(commented.contains("under 5 mm"));
    assert!(!lines.iter().any(|l| l.contains("PURGE CODE MISSING")));
    assert_eq!(lines.iter().filter(|l| l.as_str() == "T1").count(), 0);
}

#[test]
fn test_retraction_does_not_count_as_deposition() {
    // Only the X/Y-bearing line contributes; with a 1 mm threshold the
    // retraction alone would wrongly satisfy it if it counted.
    let input = "\
G1 X10 Y5 E0.5
G1 E-2.0
T1
";
    let (lines, totals) = run(input, config(0.4));

    assert_eq!(totals.relocated, 1);
    let point = lines
        .iter()
        .position(|l| l.as_str() == "G1 X10 Y5 E0.5")
        .expect("extrusion line present");
    assert_eq!(lines[point + 1], "T1");
}

#[test]
fn test_summary_block_trails_the_output() {
    let (lines, totals) = run(&long_single_tool_input(), config(50.0));
    assert_eq!(totals.relocated + totals.purge_fallbacks, 1);

    let tail: Vec<&String> = lines.iter().rev().take(5).collect();
    assert!(tail.iter().all(|l| l.starts_with(';')));
    assert!(lines
        .iter()
        .any(|l| l.contains("tool change relocation summary")));
    assert!(lines.iter().any(|l| l.contains("relocated:       1")));
}

#[test]
fn test_stream_without_tool_changes_passes_through() {
    let input = "G28\nG1 X0 Y0 E1.0\nM104 S0\n";
    let (lines, totals) = run(input, config(50.0));

    assert_eq!(totals.tool_changes, 0);
    assert_eq!(lines[0], "G28");
    assert_eq!(lines[1], "G1 X0 Y0 E1.0");
    assert_eq!(lines[2], "M104 S0");
    assert!(lines[3].contains("summary"));
}
