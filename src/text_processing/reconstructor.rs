//! Sentence and paragraph reassembly across fragmented subtitle cues (C2).
//! A pure regrouping: no character is dropped or duplicated, and every
//! segment id appears in exactly one sentence.

use crate::models::{Paragraph, Segment, Sentence};

const SENTENCE_TERMINATORS: &[char] = &['。', '！', '？', '!', '?', '.'];
const SILENCE_GAP_MS: u64 = 2_000;
const MAX_SENTENCES_PER_PARAGRAPH: usize = 5;

/// Group segments into sentences, then sentences into paragraphs.
pub fn reconstruct(segments: &[Segment]) -> Vec<Paragraph> {
    let sentences = group_into_sentences(segments);
    group_into_paragraphs(sentences)
}

fn ends_with_terminator(text: &str) -> bool {
    text.trim_end().chars().last().map(|c| SENTENCE_TERMINATORS.contains(&c)).unwrap_or(false)
}

/// A sentence ends when the current segment's text terminates with a
/// sentence-ending character, OR the gap to the next segment's start
/// exceeds `SILENCE_GAP_MS`, OR at end-of-input.
fn group_into_sentences(segments: &[Segment]) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut buffer_text: Vec<&str> = Vec::new();
    let mut buffer_ids: Vec<u32> = Vec::new();
    let mut buffer_start: Option<&str> = None;

    for (i, segment) in segments.iter().enumerate() {
        if buffer_start.is_none() {
            buffer_start = Some(segment.start_time.as_str());
        }
        buffer_text.push(segment.text.as_str());
        buffer_ids.push(segment.id);

        let is_last = i + 1 == segments.len();
        let gap_exceeds_silence = if is_last {
            false
        } else {
            segments[i + 1].start_ms.saturating_sub(segment.end_ms) > SILENCE_GAP_MS
        };

        if ends_with_terminator(&segment.text) || gap_exceeds_silence || is_last {
            let text = buffer_text.join(" ");
            if !text.trim().is_empty() {
                sentences.push(Sentence {
                    text,
                    segment_ids: std::mem::take(&mut buffer_ids),
                    start_time: buffer_start.unwrap_or_default().to_string(),
                    end_time: segment.end_time.clone(),
                });
            }
            buffer_text.clear();
            buffer_ids.clear();
            buffer_start = None;
        }
    }

    sentences
}

/// Paragraphs close when they accumulate `MAX_SENTENCES_PER_PARAGRAPH`
/// sentences or at end-of-input.
fn group_into_paragraphs(sentences: Vec<Sentence>) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<Sentence> = Vec::new();
    let mut paragraph_id = 1;

    for sentence in sentences {
        current.push(sentence);
        if current.len() >= MAX_SENTENCES_PER_PARAGRAPH {
            paragraphs.push(finish_paragraph(paragraph_id, std::mem::take(&mut current)));
            paragraph_id += 1;
        }
    }

    if !current.is_empty() {
        paragraphs.push(finish_paragraph(paragraph_id, current));
    }

    paragraphs
}

fn finish_paragraph(paragraph_id: u32, sentences: Vec<Sentence>) -> Paragraph {
    let full_text = sentences.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join(" ");
    let start_time = sentences.first().map(|s| s.start_time.clone()).unwrap_or_default();
    let end_time = sentences.last().map(|s| s.end_time.clone()).unwrap_or_default();
    let segment_ids = Paragraph::flatten_segment_ids(&sentences);

    Paragraph {
        paragraph_id,
        sentences,
        full_text,
        start_time,
        end_time,
        segment_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(id: u32, start_ms: u64, end_ms: u64, text: &str) -> Segment {
        Segment::new(id, format!("t{}", start_ms), format!("t{}", end_ms), start_ms, end_ms, text.to_string())
    }

    #[test]
    fn splits_sentence_on_terminator() {
        let segments = vec![seg(1, 0, 1000, "こんにちは。"), seg(2, 1000, 2000, "元気ですか？")];
        let sentences = group_into_sentences(&segments);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "こんにちは。");
        assert_eq!(sentences[0].segment_ids, vec![1]);
    }

    #[test]
    fn merges_fragments_until_terminator() {
        let segments = vec![seg(1, 0, 500, "これは"), seg(2, 500, 1000, "テスト")];
        let sentences = group_into_sentences(&segments);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "これは テスト");
        assert_eq!(sentences[0].segment_ids, vec![1, 2]);
    }

    #[test]
    fn silence_gap_over_2s_forces_sentence_boundary() {
        let segments = vec![seg(1, 0, 500, "前半"), seg(2, 3000, 3500, "後半")];
        let sentences = group_into_sentences(&segments);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn silence_gap_under_2s_does_not_split() {
        let segments = vec![seg(1, 0, 500, "前半"), seg(2, 1500, 2000, "後半")];
        let sentences = group_into_sentences(&segments);
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn paragraph_closes_at_five_sentences() {
        let segments: Vec<Segment> = (0..6)
            .map(|i| seg(i, i as u64 * 1000, i as u64 * 1000 + 900, &format!("文{}。", i)))
            .collect();
        let paragraphs = reconstruct(&segments);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].sentences.len(), 5);
        assert_eq!(paragraphs[1].sentences.len(), 1);
    }

    #[test]
    fn no_character_is_dropped_across_reassembly() {
        let segments = vec![seg(1, 0, 500, "あ"), seg(2, 500, 1000, "い"), seg(3, 1000, 1500, "う。")];
        let paragraphs = reconstruct(&segments);
        let all_text: String = paragraphs.iter().map(|p| p.full_text.clone()).collect::<Vec<_>>().join(" ");
        assert!(all_text.contains('あ'));
        assert!(all_text.contains('い'));
        assert!(all_text.contains('う'));
    }

    #[test]
    fn paragraph_segment_ids_are_union_of_sentence_ids_in_order() {
        let segments = vec![seg(1, 0, 500, "あ。"), seg(2, 500, 1000, "い。")];
        let paragraphs = reconstruct(&segments);
        assert_eq!(paragraphs[0].segment_ids, vec![1, 2]);
    }

    #[test]
    fn empty_input_yields_no_paragraphs() {
        assert!(reconstruct(&[]).is_empty());
    }
}
