use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub content: String,
}

/// Body of `POST /chat`. `message` must be non-empty and at most 1000 chars;
/// validated by the answer service before retrieval runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<HistoryTurn>,
    #[serde(default)]
    pub language: Option<String>,
}

impl ChatRequest {
    pub const MAX_MESSAGE_LEN: usize = 1000;

    /// `|message| <= 1000` counted in chars, matching the subtitle/transcript
    /// convention used elsewhere in the pipeline (`textLength`).
    pub fn message_is_valid(&self) -> bool {
        let len = self.message.chars().count();
        len > 0 && len <= Self::MAX_MESSAGE_LEN
    }

    /// History turns identical to the current message are dropped before
    /// prompt assembly to avoid duplicating it.
    pub fn history_excluding_current(&self) -> Vec<&HistoryTurn> {
        self.conversation_history
            .iter()
            .filter(|turn| turn.content != self.message)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_id: None,
            conversation_history: vec![],
            language: None,
        }
    }

    #[test]
    fn exactly_1000_chars_is_valid() {
        let req = request(&"a".repeat(1000));
        assert!(req.message_is_valid());
    }

    #[test]
    fn exactly_1001_chars_is_invalid() {
        let req = request(&"a".repeat(1001));
        assert!(!req.message_is_valid());
    }

    #[test]
    fn empty_message_is_invalid() {
        assert!(!request("").message_is_valid());
    }

    #[test]
    fn history_turn_equal_to_current_message_is_filtered() {
        let mut req = request("current question");
        req.conversation_history = vec![
            HistoryTurn { role: Role::User, content: "current question".to_string() },
            HistoryTurn { role: Role::Assistant, content: "previous answer".to_string() },
        ];
        let filtered = req.history_excluding_current();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].content, "previous answer");
    }

    #[test]
    fn deserializes_camel_case_body() {
        let json = r#"{"message":"hi","conversationId":"abc","conversationHistory":[{"role":"user","content":"hi"}]}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.conversation_id.as_deref(), Some("abc"));
        assert_eq!(req.conversation_history.len(), 1);
    }
}
