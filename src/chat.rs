use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// Attachment kind. Capture itself is out of scope; messages only carry
/// the metadata the composer preview would show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    File,
    Voice,
}

impl AttachmentKind {
    pub fn title(self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Video => "video",
            AttachmentKind::File => "file",
            AttachmentKind::Voice => "voice note",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub name: String,
    pub size_bytes: u64,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, name: &str, size_bytes: u64) -> Self {
        Self {
            kind,
            name: name.to_string(),
            size_bytes,
        }
    }

    pub fn size_display(&self) -> String {
        format_file_size(self.size_bytes)
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: Uuid,
    pub direction: Direction,
    pub body: String,
    pub attachment: Option<Attachment>,
    /// Quoted body of the message being replied to
    pub reply_to: Option<String>,
    pub reactions: Vec<String>,
    pub sent_at: OffsetDateTime,
}

/// Message history for one contact. "Sending" is a local mutation only;
/// there is no transport behind it.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append an outgoing message. Text is trimmed; when both the text and
    /// the attachment are empty nothing is sent. Returns the new message id.
    pub fn send(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
        reply_to: Option<String>,
    ) -> Option<Uuid> {
        let body = text.trim();
        if body.is_empty() && attachment.is_none() {
            return None;
        }
        let message = Message {
            id: Uuid::new_v4(),
            direction: Direction::Sent,
            body: body.to_string(),
            attachment,
            reply_to,
            reactions: Vec::new(),
            sent_at: OffsetDateTime::now_utc(),
        };
        let id = message.id;
        self.messages.push(message);
        Some(id)
    }

    /// Append an incoming message (demo feed and assistant replies).
    pub fn receive(&mut self, text: &str) -> Uuid {
        let message = Message {
            id: Uuid::new_v4(),
            direction: Direction::Received,
            body: text.to_string(),
            attachment: None,
            reply_to: None,
            reactions: Vec::new(),
            sent_at: OffsetDateTime::now_utc(),
        };
        let id = message.id;
        self.messages.push(message);
        id
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    /// Toggle `emoji` on the message: a reaction already present is removed,
    /// otherwise it is appended.
    pub fn toggle_reaction(&mut self, id: Uuid, emoji: &str) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        if let Some(pos) = message.reactions.iter().position(|r| r == emoji) {
            message.reactions.remove(pos);
        } else {
            message.reactions.push(emoji.to_string());
        }
        true
    }

    /// Re-send an existing message body as a new outgoing message.
    pub fn forward(&mut self, id: Uuid) -> Option<Uuid> {
        let source = self.messages.iter().find(|m| m.id == id)?;
        let body = source.body.clone();
        let attachment = source.attachment.clone();
        self.send(&body, attachment, None)
    }

    pub fn find(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }
}

/// Human-readable file size: B/KB/MB/GB with up to two decimals, trailing
/// zeros trimmed ("1.5 KB", "12 B").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

// =============================================================================
// Emoji picker catalog
// =============================================================================

pub const EMOJI_CATEGORIES: &[(&str, &[&str])] = &[
    ("recent", &["😀", "😂", "❤️", "👍", "🙏"]),
    (
        "smileys",
        &["😀", "😃", "😄", "😁", "😆", "😅", "😂", "🤣", "😊", "😇"],
    ),
    (
        "animals",
        &["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯"],
    ),
    (
        "food",
        &["🍎", "🍐", "🍊", "🍋", "🍌", "🍉", "🍇", "🍓", "🍈", "🍒"],
    ),
    (
        "activities",
        &["⚽", "🏀", "🏈", "⚾", "🎾", "🏐", "🏉", "🎱", "🏓", "🏸"],
    ),
    (
        "travel",
        &["✈️", "🚀", "🚁", "🚂", "🚢", "🚗", "🚕", "🚙", "🚌", "🚎"],
    ),
    (
        "objects",
        &["💡", "📱", "💻", "⌚", "📷", "🎥", "📺", "🔦", "📡", "🔌"],
    ),
    (
        "symbols",
        &["❤️", "💛", "💚", "💙", "💜", "🖤", "💔", "❣️", "💕", "💞"],
    ),
];

pub fn emoji_category(name: &str) -> Option<&'static [&'static str]> {
    EMOJI_CATEGORIES
        .iter()
        .find(|(category, _)| *category == name)
        .map(|(_, emojis)| *emojis)
}

// =============================================================================
// Message templates
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct MessageTemplate {
    pub title: &'static str,
    pub content: &'static str,
}

pub const TEMPLATE_CATEGORIES: &[(&str, &[MessageTemplate])] = &[
    (
        "greetings",
        &[
            MessageTemplate {
                title: "General welcome",
                content: "Welcome to customer service! How can I help you today?",
            },
            MessageTemplate {
                title: "Welcome by name",
                content: "Hello {name}! Glad you reached out. How can we help?",
            },
        ],
    ),
    (
        "support",
        &[
            MessageTemplate {
                title: "Request details",
                content: "Could you share more details about the issue so we can assist, {name}?",
            },
            MessageTemplate {
                title: "Escalation",
                content: "I am escalating your request to a specialist. We will get back to you shortly.",
            },
        ],
    ),
    (
        "closing",
        &[
            MessageTemplate {
                title: "Thanks",
                content: "Thank you for contacting us, {name}. Have a great day!",
            },
            MessageTemplate {
                title: "Follow-up",
                content: "Is there anything else I can help you with?",
            },
        ],
    ),
];

/// Expand the `{name}` placeholder against the selected contact.
pub fn fill_template(template: &MessageTemplate, contact_name: &str) -> String {
    template.content.replace("{name}", contact_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_trims_and_rejects_empty_input() {
        let mut conversation = Conversation::default();
        assert!(conversation.send("   ", None, None).is_none());
        assert!(conversation.is_empty());

        let id = conversation.send("  hello  ", None, None).unwrap();
        assert_eq!(conversation.find(id).unwrap().body, "hello");
    }

    #[test]
    fn send_with_attachment_only_is_allowed() {
        let mut conversation = Conversation::default();
        let attachment = Attachment::new(AttachmentKind::Image, "photo.png", 2048);
        let id = conversation.send("", Some(attachment), None).unwrap();
        let message = conversation.find(id).unwrap();
        assert!(message.body.is_empty());
        assert_eq!(message.attachment.as_ref().unwrap().name, "photo.png");
    }

    #[test]
    fn reaction_toggles_on_and_off() {
        let mut conversation = Conversation::default();
        let id = conversation.send("hi", None, None).unwrap();
        assert!(conversation.toggle_reaction(id, "👍"));
        assert_eq!(conversation.find(id).unwrap().reactions, vec!["👍"]);
        assert!(conversation.toggle_reaction(id, "👍"));
        assert!(conversation.find(id).unwrap().reactions.is_empty());
    }

    #[test]
    fn delete_removes_message() {
        let mut conversation = Conversation::default();
        let id = conversation.send("bye", None, None).unwrap();
        assert!(conversation.delete(id));
        assert!(!conversation.delete(id));
        assert!(conversation.is_empty());
    }

    #[test]
    fn forward_copies_body_and_attachment() {
        let mut conversation = Conversation::default();
        let attachment = Attachment::new(AttachmentKind::File, "doc.pdf", 100);
        let id = conversation.send("see attached", Some(attachment), None).unwrap();
        let forwarded = conversation.forward(id).unwrap();
        assert_ne!(id, forwarded);
        let copy = conversation.find(forwarded).unwrap();
        assert_eq!(copy.body, "see attached");
        assert_eq!(copy.attachment.as_ref().unwrap().name, "doc.pdf");
    }

    #[test]
    fn file_sizes_format_with_trimmed_decimals() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(12), "12 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn template_placeholder_is_filled() {
        let template = TEMPLATE_CATEGORIES
            .iter()
            .find(|(name, _)| *name == "greetings")
            .map(|(_, templates)| templates[1])
            .unwrap();
        assert_eq!(
            fill_template(&template, "Ahmed"),
            "Hello Ahmed! Glad you reached out. How can we help?"
        );
    }

    #[test]
    fn emoji_catalog_lookup() {
        assert!(emoji_category("smileys").is_some());
        assert!(emoji_category("missing").is_none());
    }
}
