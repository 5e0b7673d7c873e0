//! Fixed lexicons the knowledge extractor (C4) matches against: the topic
//! catalogue used for segmentation, entity vocabularies, quote patterns,
//! and the type/importance classifiers' keyword sets.

use lazy_static::lazy_static;
use regex::Regex;

/// ~24 topic keywords embedded once (embedding mode) or substring-matched
/// (keyword-fallback mode) to label paragraphs during segmentation.
pub const TOPIC_KEYWORDS: &[&str] = &[
    "黄金率", "価値観", "信用", "人生", "成功", "失敗", "目標", "家族", "仕事", "友情",
    "愛", "幸せ", "夢", "努力", "習慣", "感謝", "尊敬", "信頼", "勇気", "挑戦",
    "成長", "経験", "教訓", "未来",
];

/// Concepts in this set push an object's importance score to `high` when present.
pub const HIGH_VALUE_CONCEPTS: &[&str] = &["黄金率", "価値観", "信用", "人生"];

/// ~16-term lexicon for chunk keyword extraction (C5), distinct from the
/// topic catalogue used for segmentation.
pub const IMPORTANCE_LEXICON: &[&str] = &[
    "黄金率", "価値観", "信用", "人生", "成功", "目標", "愛", "幸せ",
    "努力", "習慣", "感謝", "尊敬", "信頼", "勇気", "挑戦", "成長",
];

pub const KNOWN_PEOPLE: &[&str] = &["青木", "田中", "鈴木", "ソクラテス", "イエス"];
pub const KNOWN_CONCEPTS: &[&str] = TOPIC_KEYWORDS;
pub const KNOWN_ORGANIZATIONS: &[&str] = &["マタイ", "教会", "大学", "会社"];

lazy_static! {
    pub static ref AGE_REGEX: Regex = Regex::new(r"\d{1,2}歳").unwrap();
    pub static ref MONEY_REGEX: Regex = Regex::new(r"\d+万").unwrap();
    pub static ref QUOTE_REGEX: Regex = Regex::new("「[^」]*」").unwrap();
    pub static ref ADVICE_QUOTE_REGEX: Regex =
        Regex::new(r"[^。]*(?:こと\s*が\s*大切|してはいけない|べき|なんです)[。]?").unwrap();

    static ref ADVICE_PATTERN: Regex =
        Regex::new(r"べきです|した方がいい|おすすめ|しましょう").unwrap();
    static ref PRINCIPLE_PATTERN: Regex = Regex::new(r"黄金率|法則|原則|ルール").unwrap();
    static ref BIOGRAPHICAL_PATTERN: Regex = Regex::new(r"歳の時|生まれ|出会った|出会い").unwrap();
    static ref ANECDOTE_PATTERN: Regex = Regex::new(r"あるとき|ある日|エピソード").unwrap();
}

/// First match wins, in the documented order: advice, principle,
/// biographical_event, anecdote, general.
pub fn classify_type(text: &str) -> crate::models::KnowledgeType {
    use crate::models::KnowledgeType;

    if ADVICE_PATTERN.is_match(text) {
        KnowledgeType::Advice
    } else if PRINCIPLE_PATTERN.is_match(text) {
        KnowledgeType::Principle
    } else if BIOGRAPHICAL_PATTERN.is_match(text) {
        KnowledgeType::BiographicalEvent
    } else if ANECDOTE_PATTERN.is_match(text) {
        KnowledgeType::Anecdote
    } else {
        KnowledgeType::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KnowledgeType;

    #[test]
    fn classifies_advice_first() {
        assert_eq!(classify_type("毎日運動するべきです、それが黄金率です"), KnowledgeType::Advice);
    }

    #[test]
    fn classifies_principle_when_no_advice_markers() {
        assert_eq!(classify_type("これが黄金率という法則です"), KnowledgeType::Principle);
    }

    #[test]
    fn classifies_biographical_event() {
        assert_eq!(classify_type("29歳の時に出会った言葉です"), KnowledgeType::BiographicalEvent);
    }

    #[test]
    fn classifies_anecdote() {
        assert_eq!(classify_type("あるとき、こんなことがありました"), KnowledgeType::Anecdote);
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(classify_type("今日は天気がいいですね"), KnowledgeType::General);
    }

    #[test]
    fn age_regex_matches_one_or_two_digits() {
        assert!(AGE_REGEX.is_match("29歳"));
        assert!(AGE_REGEX.is_match("5歳"));
    }

    #[test]
    fn money_regex_matches_man_units() {
        assert!(MONEY_REGEX.is_match("100万"));
    }
}
