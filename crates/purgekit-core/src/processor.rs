//! Single-pass stream processor: line source -> segments -> line sink.
//!
//! Lines are buffered into the current segment until a tool change closes
//! it. The segment is then resolved (skipped, relocated, or purge
//! annotated), flushed to the sink in original order, and dropped, so
//! memory stays bounded by the longest span between tool changes.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::classifier::{LineClass, LineClassifier};
use crate::config::RelocationConfig;
use crate::error::ProcessResult;
use crate::relocate::{relocate_tool_change, ScanControl, SkipEvaluator};
use crate::segment::{Line, Segment};

/// Process-wide counters, reported once at end of stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunningTotals {
    /// Tool-change lines seen in the input.
    pub tool_changes: u64,
    /// Tool changes commented out because the next segment barely uses
    /// the new tool.
    pub skipped: u64,
    /// Tool changes successfully moved earlier in the stream.
    pub relocated: u64,
    /// Tool changes left in place with purge text spliced in.
    pub purge_fallbacks: u64,
}

impl RunningTotals {
    /// The trailing comment block appended to the output stream.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "; ---- tool change relocation summary ----".to_string(),
            format!("; tool changes:    {}", self.tool_changes),
            format!("; skipped:         {}", self.skipped),
            format!("; relocated:       {}", self.relocated),
            format!("; purge fallbacks: {}", self.purge_fallbacks),
        ]
    }
}

/// Pull the next line, preferring lines re-queued by the forward scan.
fn next_line<B: BufRead>(
    pending: &mut VecDeque<Line>,
    source: &mut io::Lines<B>,
    read_count: &mut u64,
) -> io::Result<Option<Line>> {
    if let Some(line) = pending.pop_front() {
        return Ok(Some(line));
    }
    match source.next() {
        Some(text) => {
            *read_count += 1;
            Ok(Some(Line::new(*read_count, text?)))
        }
        None => Ok(None),
    }
}

/// One-pass tool-change relocation over a line source and sink.
#[derive(Debug)]
pub struct StreamProcessor {
    config: RelocationConfig,
    classifier: LineClassifier,
}

impl StreamProcessor {
    /// Create a processor from a validated configuration.
    pub fn new(config: RelocationConfig) -> ProcessResult<Self> {
        config.validate()?;
        let classifier = LineClassifier::new(&config.patterns);
        Ok(Self { config, classifier })
    }

    /// Run the full pass, returning the final counters.
    ///
    /// The sink receives every segment in original order followed by the
    /// summary comment block. A sink write error aborts the run; whatever
    /// was already written stays written.
    pub fn process<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> ProcessResult<RunningTotals> {
        let mut source = reader.lines();
        let mut pending: VecDeque<Line> = VecDeque::new();
        let mut read_count: u64 = 0;

        let mut segment = Segment::new();
        let mut totals = RunningTotals::default();
        let mut prior_tool_change = false;
        let mut slicer_logged = false;

        while let Some(line) = next_line(&mut pending, &mut source, &mut read_count)? {
            if !slicer_logged {
                if let Some(name) = self.classifier.slicer_name(&line.text) {
                    info!("input generated by {}", name);
                    slicer_logged = true;
                }
            }

            match self.classifier.classify(&line.text) {
                LineClass::ToolChange { tool } => {
                    totals.tool_changes += 1;
                    segment.append(line);

                    let skip = if self.config.skip_enabled() && prior_tool_change {
                        self.peek_for_skip(&mut pending, &mut source, &mut read_count)?
                    } else {
                        false
                    };
                    prior_tool_change = true;

                    if skip {
                        totals.skipped += 1;
                        let original = segment
                            .last()
                            .map(|l| (l.text.trim().to_string(), l.number))
                            .expect("tool change just appended");
                        debug!("skipping tool change {} at line {}", tool, original.1);
                        segment.rewrite_last(format!(
                            "; {} ; skipped: next segment extrudes under {} mm",
                            original.0, self.config.skip_threshold
                        ));
                    } else {
                        relocate_tool_change(
                            &mut segment,
                            &self.classifier,
                            &self.config,
                            &mut totals,
                        );
                    }

                    flush_segment(&mut segment, &mut writer)?;
                }
                LineClass::FeatureMarker { name } => {
                    debug!("feature marker '{}' at line {}", name, line.number);
                    segment.append(line);
                }
                _ => segment.append(line),
            }
        }

        // Content after the last tool change passes through untouched.
        flush_segment(&mut segment, &mut writer)?;

        for text in totals.summary_lines() {
            writeln!(writer, "{}", text)?;
        }
        writer.flush()?;

        info!(
            "processed {} tool changes: {} skipped, {} relocated, {} purge fallbacks",
            totals.tool_changes, totals.skipped, totals.relocated, totals.purge_fallbacks
        );
        Ok(totals)
    }

    /// Peek into the not-yet-read following segment to decide whether the
    /// just-detected tool change is worth performing. Every peeked line
    /// is re-queued so the main loop processes it normally afterwards.
    fn peek_for_skip<B: BufRead>(
        &self,
        pending: &mut VecDeque<Line>,
        source: &mut io::Lines<B>,
        read_count: &mut u64,
    ) -> io::Result<bool> {
        let mut evaluator = SkipEvaluator::new(&self.classifier, self.config.skip_threshold);
        let mut peeked = Vec::new();

        while let Some(line) = next_line(pending, source, read_count)? {
            let control = evaluator.observe(&line.text);
            peeked.push(line);
            if control == ScanControl::Stop {
                break;
            }
        }

        for line in peeked.into_iter().rev() {
            pending.push_front(line);
        }
        Ok(evaluator.verdict())
    }
}

/// Emit a drained segment verbatim, in order.
fn flush_segment<W: Write>(segment: &mut Segment, writer: &mut W) -> io::Result<()> {
    for line in segment.drain() {
        writeln!(writer, "{}", line.text)?;
    }
    Ok(())
}

/// Convenience wrapper: process `input` into `output` on disk.
pub fn process_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: RelocationConfig,
) -> ProcessResult<RunningTotals> {
    let processor = StreamProcessor::new(config)?;
    let reader = BufReader::new(File::open(input.as_ref())?);
    let writer = BufWriter::new(File::create(output.as_ref())?);
    processor.process(reader, writer)
}
