use serde::{Deserialize, Serialize};

/// One subtitle cue, immutable once produced by the subtitle parser.
///
/// Invariant: `start_ms <= end_ms`. Within a single parsed file, ids are
/// unique and non-decreasing by `start_ms` — the parser never reorders or
/// deduplicates what it reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: u32,
    pub start_time: String,
    pub end_time: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_sec: f64,
    pub text: String,
    pub text_length: usize,
}

impl Segment {
    pub fn new(id: u32, start_time: String, end_time: String, start_ms: u64, end_ms: u64, text: String) -> Self {
        let duration_sec = (end_ms.saturating_sub(start_ms)) as f64 / 1000.0;
        let text_length = text.chars().count();
        Self {
            id,
            start_time,
            end_time,
            start_ms,
            end_ms,
            duration_sec,
            text,
            text_length,
        }
    }
}

/// Concatenation of one or more contiguous segments up to a sentence
/// terminator or silence gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub text: String,
    pub segment_ids: Vec<u32>,
    pub start_time: String,
    pub end_time: String,
}

/// Ordered group of sentences bounded by a maximum sentence count and topic
/// continuity, produced by the text reconstructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub paragraph_id: u32,
    pub sentences: Vec<Sentence>,
    pub full_text: String,
    pub start_time: String,
    pub end_time: String,
    pub segment_ids: Vec<u32>,
}

impl Paragraph {
    /// Flattened, in-order union of the contained sentences' segment ids.
    pub fn flatten_segment_ids(sentences: &[Sentence]) -> Vec<u32> {
        sentences.iter().flat_map(|s| s.segment_ids.iter().copied()).collect()
    }
}

/// Which cleaning phases ran over a paragraph, so downstream stages and
/// diagnostics can tell what was applied without re-deriving it from text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningFlags {
    pub width_normalized: bool,
    pub dictionary_corrected: bool,
    pub markers_stripped: bool,
    pub fillers_removed: bool,
    pub punctuation_standardized: bool,
    pub whitespace_collapsed: bool,
}

/// One applied dictionary correction, original text to its replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub original: String,
    pub fixed: String,
}

/// A paragraph after `ContentCleaner` has run, carrying both the original
/// and cleaned text so corrections remain auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedParagraph {
    pub paragraph_id: u32,
    pub original_text: String,
    pub cleaned_text: String,
    pub corrections: Vec<Correction>,
    pub flags: CleaningFlags,
    pub start_time: String,
    pub end_time: String,
    pub segment_ids: Vec<u32>,
}
