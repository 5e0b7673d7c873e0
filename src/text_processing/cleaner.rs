//! Text cleaning (C3). Applies, in order, full-width/half-width
//! normalisation, dictionary-driven error correction, non-verbal marker
//! removal, optional filler-word removal, punctuation standardisation, and
//! whitespace collapsing. The original text is always preserved alongside
//! the cleaned text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{CleanedParagraph, CleaningFlags, Correction, Paragraph};

lazy_static! {
    /// Bracketed non-verbal markers: (拍手), （笑い）, [BGM], etc.
    static ref NON_VERBAL_MARKER_REGEX: Regex =
        Regex::new(r"[\(（][^\)）]{0,20}[\)）]").unwrap();

    static ref BANG_RUN_REGEX: Regex = Regex::new(r"!{2,}").unwrap();
    static ref QUESTION_RUN_REGEX: Regex = Regex::new(r"\?{2,}").unwrap();
    static ref TOUTEN_RUN_REGEX: Regex = Regex::new(r"、{2,}").unwrap();
    static ref ELLIPSIS_REGEX: Regex = Regex::new(r"\.{3,}|…{2,}").unwrap();
    static ref PRE_TERMINATOR_WHITESPACE_REGEX: Regex =
        Regex::new(r"[ \t]+([。！？、])").unwrap();
    static ref WHITESPACE_RUN_REGEX: Regex = Regex::new(r"[ \t]{2,}").unwrap();
}

/// Known original→fix pairs. A real deployment would load a larger,
/// transcript-specific dictionary; this fixed set covers the common
/// transcription artefacts the pipeline is expected to correct.
const ERROR_DICTIONARY: &[(&str, &str)] = &[
    ("こんにちわ", "こんにちは"),
    ("ゆうこと", "ということ"),
    ("っていう", "という"),
    ("なんだけど", "なのですが"),
];

/// Common Japanese filler words stripped when filler removal is enabled.
const FILLER_WORDS: &[&str] = &["えーと", "あのー", "まあ", "えっと", "なんか"];

/// Clean a single paragraph. `remove_fillers` mirrors the pipeline
/// configuration flag, off by default.
pub fn clean_paragraph(paragraph: &Paragraph, remove_fillers: bool) -> CleanedParagraph {
    let original_text = paragraph.full_text.clone();
    let mut text = original_text.clone();
    let mut flags = CleaningFlags::default();

    let widened = normalize_width(&text);
    if widened != text {
        flags.width_normalized = true;
    }
    text = widened;

    let mut corrections = Vec::new();
    text = apply_dictionary(&text, &mut corrections);
    flags.dictionary_corrected = !corrections.is_empty();

    let stripped = NON_VERBAL_MARKER_REGEX.replace_all(&text, "").to_string();
    if stripped != text {
        flags.markers_stripped = true;
    }
    text = stripped;

    if remove_fillers {
        let without_fillers = remove_filler_words(&text);
        if without_fillers != text {
            flags.fillers_removed = true;
        }
        text = without_fillers;
    }

    let standardized = standardize_punctuation(&text);
    if standardized != text {
        flags.punctuation_standardized = true;
    }
    text = standardized;

    let collapsed = collapse_whitespace(&text);
    if collapsed != text {
        flags.whitespace_collapsed = true;
    }
    text = collapsed;

    CleanedParagraph {
        paragraph_id: paragraph.paragraph_id,
        original_text,
        cleaned_text: text,
        corrections,
        flags,
        start_time: paragraph.start_time.clone(),
        end_time: paragraph.end_time.clone(),
        segment_ids: paragraph.segment_ids.clone(),
    }
}

pub fn clean_paragraphs(paragraphs: &[Paragraph], remove_fillers: bool) -> Vec<CleanedParagraph> {
    paragraphs.iter().map(|p| clean_paragraph(p, remove_fillers)).collect()
}

/// Full-width letters/digits → half-width, ideographic space → regular space.
fn normalize_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            'ａ'..='ｚ' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            'Ａ'..='Ｚ' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '０'..='９' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            other => other,
        })
        .collect()
}

fn apply_dictionary(text: &str, corrections: &mut Vec<Correction>) -> String {
    let mut result = text.to_string();
    for (original, fixed) in ERROR_DICTIONARY {
        if result.contains(original) {
            result = result.replace(original, fixed);
            corrections.push(Correction { original: original.to_string(), fixed: fixed.to_string() });
        }
    }
    result
}

fn remove_filler_words(text: &str) -> String {
    let mut result = text.to_string();
    for filler in FILLER_WORDS {
        result = result.replace(filler, "");
    }
    result
}

/// Collapse runs of `!`, `?`, `、`, and multi-dot ellipsis; strip whitespace
/// immediately before a terminator.
fn standardize_punctuation(text: &str) -> String {
    let text = BANG_RUN_REGEX.replace_all(text, "!");
    let text = QUESTION_RUN_REGEX.replace_all(&text, "?");
    let text = TOUTEN_RUN_REGEX.replace_all(&text, "、");
    let text = ELLIPSIS_REGEX.replace_all(&text, "…");
    let text = PRE_TERMINATOR_WHITESPACE_REGEX.replace_all(&text, "$1");
    text.to_string()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN_REGEX.replace_all(text.trim(), " ").to_string()
}
