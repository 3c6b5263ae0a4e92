//! Backward relocation engine and forward skip evaluator.
//!
//! The backward engine walks a closed segment from its tool-change tail
//! toward its head, looking for the latest earlier position with enough
//! extrusion planned between it and the original tool change. The forward
//! evaluator peeks into the following segment to decide whether a tool
//! change is worth performing at all.

use crate::classifier::{LineClass, LineClassifier};
use crate::config::RelocationConfig;
use crate::processor::RunningTotals;
use crate::segment::Segment;
use tracing::{debug, trace};

/// Early-exit margin for the forward skip scan: once the upcoming
/// segment's extrusion exceeds `skip_threshold * SKIP_SCAN_MARGIN` the
/// tool change is clearly not skippable and scanning stops. Tunable,
/// preserved from observed behavior.
pub const SKIP_SCAN_MARGIN: f64 = 1.2;

/// Substitution slot for the threshold value in the purge template.
pub const THRESHOLD_SLOT: &str = "{threshold}";

/// Running sum of extrusion amounts over one scan.
#[derive(Debug, Default)]
pub struct ExtrusionTally {
    total: f64,
}

impl ExtrusionTally {
    /// Create a tally at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to zero at a scan boundary.
    pub fn reset(&mut self) {
        self.total = 0.0;
    }

    /// Add one extrusion amount in mm.
    pub fn add(&mut self, amount: f64) {
        self.total += amount;
    }

    /// Accumulated mm so far.
    pub fn total(&self) -> f64 {
        self.total
    }
}

/// How a single non-skipped tool change was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum RelocationOutcome {
    /// The tool change was moved earlier in the stream.
    Relocated {
        /// Line number of the original tool-change line.
        from_line: u64,
        /// Line number of the relocation point the block now follows.
        to_line: u64,
    },
    /// No relocation point satisfied the threshold; purge text was
    /// spliced in after the original tool change instead.
    PurgeFallback,
}

/// Split a configured raw G-code block into its lines.
fn block_lines(block: &str) -> Vec<String> {
    block.lines().map(|l| l.to_string()).collect()
}

/// Relocate the tool change closing `segment`, or splice in purge text.
///
/// The segment's last line must be a tool-change instruction. Walks
/// backward from the second-to-last line: comments are ignored, extrusion
/// amounts accumulate, and the first position at which the accumulated
/// amount reaches the threshold becomes the relocation point. Hitting an
/// earlier tool change or the head of the segment stops the scan
/// unsuccessfully, since a tool change must never move across the
/// previous segment boundary.
pub fn relocate_tool_change(
    segment: &mut Segment,
    classifier: &LineClassifier,
    config: &RelocationConfig,
    totals: &mut RunningTotals,
) -> RelocationOutcome {
    debug_assert!(
        segment
            .last()
            .map(|l| matches!(classifier.classify(&l.text), LineClass::ToolChange { .. }))
            .unwrap_or(false),
        "segment must end with a tool change"
    );

    let tail = segment.len() - 1;
    let original = segment.get(tail).cloned().expect("non-empty segment");

    let mut tally = ExtrusionTally::new();
    let mut relocation_point: Option<usize> = None;

    for index in (0..tail).rev() {
        let line = segment.get(index).expect("index within segment");
        match classifier.classify(&line.text) {
            LineClass::Comment | LineClass::FeatureMarker { .. } => continue,
            LineClass::Extrusion { amount } => {
                tally.add(amount);
                trace!(
                    "backward scan at line {}: {:.3} mm accumulated",
                    line.number,
                    tally.total()
                );
                if tally.total() >= config.threshold {
                    relocation_point = Some(index);
                    break;
                }
            }
            LineClass::ToolChange { .. } => {
                // Previous segment boundary: never relocate across it.
                break;
            }
            LineClass::Other => continue,
        }
    }

    match relocation_point {
        Some(index) => {
            let to_line = segment.get(index).expect("relocation point").number;

            let mut block = Vec::new();
            if let Some(pre) = &config.pre_tool_change_code {
                block.extend(block_lines(pre));
            }
            block.push(original.text.clone());
            if let Some(post) = &config.post_tool_change_code {
                block.extend(block_lines(post));
            }
            segment.insert_after(index, block);

            segment.rewrite_last(format!(
                "; {} moved after line {} ({:.2} mm of extrusion follows, was line {})",
                original.text.trim(),
                to_line,
                tally.total(),
                original.number
            ));

            totals.relocated += 1;
            debug!(
                "relocated tool change from line {} to after line {}",
                original.number, to_line
            );
            RelocationOutcome::Relocated {
                from_line: original.number,
                to_line,
            }
        }
        None => {
            let purge = match &config.purge_code {
                Some(template) => template.replace(THRESHOLD_SLOT, &config.threshold.to_string()),
                None => format!(
                    "; PURGE CODE MISSING: configure purge_code to clear at least {} mm here",
                    config.threshold
                ),
            };
            segment.insert_after(tail, block_lines(&purge));

            totals.purge_fallbacks += 1;
            debug!(
                "no relocation point for tool change at line {} ({:.3} mm available, {} mm required)",
                original.number,
                tally.total(),
                config.threshold
            );
            RelocationOutcome::PurgeFallback
        }
    }
}

/// Result of feeding one peeked line to the skip evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    /// Keep feeding lookahead lines.
    Continue,
    /// The verdict is already decided; stop peeking.
    Stop,
}

/// Incremental forward scan over the segment following a tool change.
///
/// The caller feeds peeked lines in order and stops when told to; the
/// verdict is whether the upcoming tool's own extrusion is too small to
/// justify changing tools at all.
#[derive(Debug)]
pub struct SkipEvaluator<'a> {
    classifier: &'a LineClassifier,
    skip_threshold: f64,
    tally: ExtrusionTally,
}

impl<'a> SkipEvaluator<'a> {
    /// Start a forward scan for one candidate tool change.
    pub fn new(classifier: &'a LineClassifier, skip_threshold: f64) -> Self {
        Self {
            classifier,
            skip_threshold,
            tally: ExtrusionTally::new(),
        }
    }

    /// Observe the next lookahead line.
    pub fn observe(&mut self, text: &str) -> ScanControl {
        match self.classifier.classify(text) {
            LineClass::Extrusion { amount } => {
                self.tally.add(amount);
                if self.tally.total() > self.skip_threshold * SKIP_SCAN_MARGIN {
                    // Clearly over; no need to scan further.
                    ScanControl::Stop
                } else {
                    ScanControl::Continue
                }
            }
            // The next tool change closes the segment under evaluation.
            LineClass::ToolChange { .. } => ScanControl::Stop,
            _ => ScanControl::Continue,
        }
    }

    /// True iff the scanned extrusion stayed strictly below the skip
    /// threshold. Strict comparison preserved from observed behavior.
    pub fn verdict(&self) -> bool {
        self.tally.total() < self.skip_threshold
    }
}
