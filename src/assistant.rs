use crate::chat::{Conversation, Direction};

/// Reply style selected in the AI tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStyle {
    Professional,
    Relaxed,
    Friendly,
    Formal,
}

impl AiStyle {
    pub const ALL: [AiStyle; 4] = [
        AiStyle::Professional,
        AiStyle::Relaxed,
        AiStyle::Friendly,
        AiStyle::Formal,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AiStyle::Professional => "professional",
            AiStyle::Relaxed => "relaxed",
            AiStyle::Friendly => "friendly",
            AiStyle::Formal => "formal",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Some(AiStyle::Professional),
            "relaxed" => Some(AiStyle::Relaxed),
            "friendly" => Some(AiStyle::Friendly),
            "formal" => Some(AiStyle::Formal),
            _ => None,
        }
    }
}

/// Rewrite a draft in the selected style. There is no model behind this;
/// the transformation is deterministic so the preview is stable.
pub fn rewrite(style: AiStyle, draft: &str) -> String {
    let draft = draft.trim();
    if draft.is_empty() {
        return String::new();
    }
    match style {
        AiStyle::Professional => format!("Thank you for reaching out. {draft}"),
        AiStyle::Relaxed => format!("Hey! {draft} 🙂"),
        AiStyle::Friendly => format!("Hi there! {draft} Happy to help!"),
        AiStyle::Formal => format!("Dear customer, {draft} Kind regards."),
    }
}

/// Local conversation summary for the AI tab. Counts both directions and
/// quotes the most recent message.
pub fn summarize(conversation: &Conversation) -> String {
    if conversation.is_empty() {
        return "No messages in this conversation yet.".to_string();
    }
    let sent = conversation
        .messages()
        .iter()
        .filter(|m| m.direction == Direction::Sent)
        .count();
    let received = conversation.len() - sent;
    let last = conversation
        .messages()
        .last()
        .map(|m| m.body.as_str())
        .unwrap_or_default();
    format!(
        "{} messages ({} sent, {} received). Last message: \"{}\"",
        conversation.len(),
        sent,
        received,
        last
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_parse_case_insensitively() {
        assert_eq!(AiStyle::from_str("Formal"), Some(AiStyle::Formal));
        assert_eq!(AiStyle::from_str(" RELAXED "), Some(AiStyle::Relaxed));
        assert_eq!(AiStyle::from_str("casual"), None);
    }

    #[test]
    fn rewrite_is_deterministic_and_trims() {
        assert_eq!(
            rewrite(AiStyle::Professional, "  your order shipped  "),
            "Thank you for reaching out. your order shipped"
        );
        assert_eq!(rewrite(AiStyle::Formal, ""), "");
    }

    #[test]
    fn summary_counts_directions() {
        let mut conversation = Conversation::default();
        conversation.receive("hello");
        conversation.send("hi, how can I help?", None, None);
        let summary = summarize(&conversation);
        assert!(summary.contains("2 messages"));
        assert!(summary.contains("1 sent, 1 received"));
        assert!(summary.contains("hi, how can I help?"));
    }

    #[test]
    fn summary_for_empty_conversation() {
        let conversation = Conversation::default();
        assert_eq!(summarize(&conversation), "No messages in this conversation yet.");
    }
}
