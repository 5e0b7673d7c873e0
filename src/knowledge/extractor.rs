//! Entity/quote extraction, classification, importance scoring, and
//! `KnowledgeObject` construction — the second half of `KnowledgeExtractor`
//! (C4), operating on the topic segments produced by `segmentation`.

use crate::models::{Entities, KnowledgeContent, KnowledgeMetadata, KnowledgeObject, Paragraph};

use super::lexicon::{
    classify_type, AGE_REGEX, HIGH_VALUE_CONCEPTS, KNOWN_CONCEPTS, KNOWN_ORGANIZATIONS, KNOWN_PEOPLE,
    MONEY_REGEX, QUOTE_REGEX,
};
use super::segmentation::TopicSegment;

const MAIN_SUMMARY_CHARS: usize = 200;
const KEY_TAKEAWAY_CHARS: usize = 100;
const MAX_QUOTES: usize = 3;

fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

/// Known-people regex set, known-concept/organisation substring sets, ages
/// via `\d{1,2}歳`, and monetary counts via `\d+万`, deduplicated
/// preserving first-seen order.
pub fn extract_entities(text: &str) -> Entities {
    let people = dedupe_preserving_order(
        KNOWN_PEOPLE.iter().filter(|p| text.contains(*p)).map(|p| p.to_string()).collect(),
    );
    let concepts = dedupe_preserving_order(
        KNOWN_CONCEPTS.iter().filter(|c| text.contains(*c)).map(|c| c.to_string()).collect(),
    );
    let organizations = dedupe_preserving_order(
        KNOWN_ORGANIZATIONS.iter().filter(|o| text.contains(*o)).map(|o| o.to_string()).collect(),
    );
    let ages = dedupe_preserving_order(AGE_REGEX.find_iter(text).map(|m| m.as_str().to_string()).collect());
    let numbers = dedupe_preserving_order(MONEY_REGEX.find_iter(text).map(|m| m.as_str().to_string()).collect());

    Entities { people, concepts, organizations, ages, numbers }
}

/// All `「…」`-quoted substrings plus sentences matching the
/// principle/advice patterns, deduplicated.
pub fn extract_quotes(text: &str) -> Vec<String> {
    let mut quotes: Vec<String> = QUOTE_REGEX.find_iter(text).map(|m| m.as_str().to_string()).collect();

    for sentence in text.split('。') {
        let trimmed = sentence.trim();
        if trimmed.is_empty() {
            continue;
        }
        if super::lexicon::ADVICE_QUOTE_REGEX.is_match(trimmed) {
            quotes.push(format!("{}。", trimmed));
        }
    }

    dedupe_preserving_order(quotes)
}

/// +2 if any quotes; +1 if any people entity; +2 if any concept is in the
/// high-value set; +1 if summary length >100.
pub fn score_importance(entities: &Entities, quotes: &[String], summary: &str) -> i32 {
    let mut score = 0;
    if !quotes.is_empty() {
        score += 2;
    }
    if !entities.people.is_empty() {
        score += 1;
    }
    if entities.concepts.iter().any(|c| HIGH_VALUE_CONCEPTS.contains(&c.as_str())) {
        score += 2;
    }
    if summary.chars().count() > KEY_TAKEAWAY_CHARS {
        score += 1;
    }
    score
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        format!("{}…", truncated)
    } else {
        truncated
    }
}

fn union_segment_ids(paragraphs: &[Paragraph]) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    paragraphs
        .iter()
        .flat_map(|p| p.segment_ids.iter().copied())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Build one `KnowledgeObject` per topic segment. `knowledge_id` is
/// assigned by position across the whole run (`k001`, `k002`, ...).
pub fn build_knowledge_objects(segments: &[TopicSegment]) -> Vec<KnowledgeObject> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| !segment.paragraphs.is_empty())
        .map(|(index, segment)| build_one(index, segment))
        .collect()
}

fn build_one(index: usize, segment: &TopicSegment) -> KnowledgeObject {
    let full_text = segment.paragraphs.iter().map(|p| p.full_text.as_str()).collect::<Vec<_>>().join(" ");
    let entities = extract_entities(&full_text);
    let quotes = extract_quotes(&full_text);
    let top_quotes: Vec<String> = quotes.iter().take(MAX_QUOTES).cloned().collect();
    let kind = classify_type(&full_text);

    let main = truncate_with_ellipsis(&full_text, MAIN_SUMMARY_CHARS);
    let key_takeaway = top_quotes
        .first()
        .cloned()
        .unwrap_or_else(|| full_text.chars().take(KEY_TAKEAWAY_CHARS).collect());

    let importance_score = score_importance(&entities, &top_quotes, &main);

    let start_time = segment.paragraphs.first().map(|p| p.start_time.clone()).unwrap_or_default();
    let end_time = segment.paragraphs.last().map(|p| p.end_time.clone()).unwrap_or_default();

    KnowledgeObject {
        knowledge_id: KnowledgeObject::id_for_index(index),
        topic: segment.label.clone().unwrap_or_else(|| "general".to_string()),
        kind,
        content: KnowledgeContent { main, context: full_text, quotes: top_quotes, key_takeaway },
        entities,
        start_time,
        end_time,
        metadata: KnowledgeMetadata {
            importance: Some(crate::models::Importance::from_score(importance_score)),
            category: format!("{:?}", kind),
            sentiment: "neutral".to_string(),
            themes: segment.label.clone().into_iter().collect(),
            segment_ids: union_segment_ids(&segment.paragraphs),
        },
    }
}
