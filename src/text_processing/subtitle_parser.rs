//! Subtitle cue parsing (C1). Turns the bytes of an SRT-style subtitle file
//! into an ordered sequence of `Segment`s. Never reorders or deduplicates
//! what it reads; malformed blocks are skipped with a warning rather than
//! aborting the whole file.

use crate::error::PipelineError;
use crate::models::Segment;

/// Parse a subtitle file's raw text into segments.
///
/// Blocks are separated by one or more blank lines. A well-formed block has
/// at least 3 non-empty lines: an integer id, a `start --> end` timing line,
/// and one or more text lines (joined with a single space). Blocks with
/// fewer than 3 non-empty lines are skipped with a `tracing::warn!`.
pub fn parse_subtitle_file(contents: &str) -> Result<Vec<Segment>, PipelineError> {
    let mut segments = Vec::new();

    for (block_index, block) in split_blocks(contents).enumerate() {
        let lines: Vec<&str> = block.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        if lines.len() < 3 {
            tracing::warn!(block = block_index, "skipping malformed subtitle block (fewer than 3 lines)");
            continue;
        }

        let id: u32 = match lines[0].parse() {
            Ok(id) => id,
            Err(_) => {
                tracing::warn!(block = block_index, line = lines[0], "skipping block with non-integer id");
                continue;
            }
        };

        let (start_time, end_time, start_ms, end_ms) = match parse_timing_line(lines[1]) {
            Some(timing) => timing,
            None => {
                tracing::warn!(block = block_index, line = lines[1], "skipping block with unparseable timing line");
                continue;
            }
        };

        let text = lines[2..].join(" ");
        segments.push(Segment::new(id, start_time, end_time, start_ms, end_ms, text));
    }

    Ok(segments)
}

/// Split on runs of one or more blank lines.
fn split_blocks(contents: &str) -> impl Iterator<Item = &str> {
    contents.split("\n\n").flat_map(|chunk| {
        // A run of 2+ consecutive newlines can still leave an empty chunk
        // between them; filter those out without losing real blocks.
        if chunk.trim().is_empty() {
            None
        } else {
            Some(chunk)
        }
    })
}

/// Parse a `HH:MM:SS,mmm --> HH:MM:SS,mmm` line into (start, end, start_ms, end_ms).
fn parse_timing_line(line: &str) -> Option<(String, String, u64, u64)> {
    let mut parts = line.splitn(2, "-->");
    let start = parts.next()?.trim();
    let end = parts.next()?.trim();

    let start_ms = timestamp_to_ms(start)?;
    let end_ms = timestamp_to_ms(end)?;

    Some((start.to_string(), end.to_string(), start_ms, end_ms))
}

/// Convert `HH:MM:SS,mmm` to milliseconds since file start.
fn timestamp_to_ms(timestamp: &str) -> Option<u64> {
    let (time_part, ms_part) = timestamp.split_once(',')?;
    let mut fields = time_part.split(':');
    let hours: u64 = fields.next()?.trim().parse().ok()?;
    let minutes: u64 = fields.next()?.trim().parse().ok()?;
    let seconds: u64 = fields.next()?.trim().parse().ok()?;
    let millis: u64 = ms_part.trim().parse().ok()?;

    Some(((hours * 3600 + minutes * 60 + seconds) * 1000) + millis)
}
