//! PromptBuilder (C10): assembles the system prompt from retrieved Matches
//! and filters conversation history, per §4.10. The LLM message list itself
//! ([system; history*; user]) is built by `LLMClient::build_messages`; this
//! module is responsible only for the system prompt text and the filtered
//! history passed into it.

use crate::models::{ChatRequest, HistoryTurn, Match};

const SYSTEM_PREAMBLE: &str = "あなたは日本語の音声書き起こしアーカイブに基づいて質問に答えるアシスタントです。\
以下の情報源にのみ基づいて回答してください。情報源から引用する際はラベル（例: 情報源1）を明示してください。\
十分な情報がない場合は「情報がありません」と答えてください。\
回答は簡潔に、2〜3文、目安150文字以内でまとめ、元の語り口の調子を保ってください。";

fn source_timestamp(m: &Match) -> String {
    m.metadata.get("timestamp").and_then(|v| v.as_str()).unwrap_or("unknown").to_string()
}

fn source_content(m: &Match) -> String {
    m.metadata.get("content").and_then(|v| v.as_str()).unwrap_or("").to_string()
}

/// Render retrieved passages as numbered sources, each followed by
/// `(時間: <timestamp>)`.
pub fn render_sources(matches: &[Match]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| format!("情報源{}: {} (時間: {})", i + 1, source_content(m), source_timestamp(m)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full system prompt: the fixed instructions followed by the
/// numbered source list, or a note that no sources were retrieved.
pub fn build_system_prompt(matches: &[Match]) -> String {
    if matches.is_empty() {
        return format!("{}\n\n(情報源は見つかりませんでした)", SYSTEM_PREAMBLE);
    }
    format!("{}\n\n{}", SYSTEM_PREAMBLE, render_sources(matches))
}

/// History turns identical to the current message are dropped so the
/// message list never repeats the question being asked.
pub fn filtered_history(request: &ChatRequest) -> Vec<HistoryTurn> {
    request.history_excluding_current().into_iter().cloned().collect()
}
