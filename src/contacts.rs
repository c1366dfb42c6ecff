use uuid::Uuid;

/// Presence indicator shown in the contacts table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Online,
    Away,
    Offline,
}

impl ContactStatus {
    pub fn title(self) -> &'static str {
        match self {
            ContactStatus::Online => "online",
            ContactStatus::Away => "away",
            ContactStatus::Offline => "offline",
        }
    }
}

/// A row of the contacts table.
#[derive(Debug, Clone)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub status: ContactStatus,
    pub tags: Vec<String>,
}

impl Contact {
    pub fn new(name: &str, phone: &str, email: Option<&str>, status: ContactStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.map(str::to_string),
            status,
            tags: Vec::new(),
        }
    }

    /// Add a tag chip. Input is trimmed; empty input and case-insensitive
    /// duplicates are rejected. Returns true when the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        if self
            .tags
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove the tag at `index`. Returns true when something was removed.
    pub fn remove_tag(&mut self, index: usize) -> bool {
        if index < self.tags.len() {
            self.tags.remove(index);
            true
        } else {
            false
        }
    }

    /// Short form for the avatar cell: first letters of the first two words.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .collect()
    }
}

/// Demo contact book. The dashboard has no backend; the table is seeded the
/// way the server-rendered page ships with sample rows.
pub fn demo_book() -> Vec<Contact> {
    let mut contacts = vec![
        Contact::new(
            "Ahmed Mohammed",
            "+966501234567",
            Some("ahmed@example.com"),
            ContactStatus::Online,
        ),
        Contact::new(
            "Sara Alqahtani",
            "+966555000111",
            Some("sara@example.com"),
            ContactStatus::Away,
        ),
        Contact::new(
            "Khalid Omar",
            "+966533222444",
            None,
            ContactStatus::Offline,
        ),
        Contact::new(
            "Layla Hassan",
            "+966544888999",
            Some("layla@example.com"),
            ContactStatus::Online,
        ),
    ];
    contacts[0].add_tag("vip");
    contacts[0].add_tag("booking");
    contacts[1].add_tag("support");
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tag_trims_and_rejects_empty() {
        let mut contact = Contact::new("Test", "+100", None, ContactStatus::Online);
        assert!(contact.add_tag("  vip  "));
        assert_eq!(contact.tags, vec!["vip"]);
        assert!(!contact.add_tag("   "));
        assert_eq!(contact.tags.len(), 1);
    }

    #[test]
    fn add_tag_rejects_case_insensitive_duplicates() {
        let mut contact = Contact::new("Test", "+100", None, ContactStatus::Online);
        assert!(contact.add_tag("Booking"));
        assert!(!contact.add_tag("booking"));
        assert!(!contact.add_tag("BOOKING"));
        assert_eq!(contact.tags.len(), 1);
    }

    #[test]
    fn remove_tag_out_of_range_is_noop() {
        let mut contact = Contact::new("Test", "+100", None, ContactStatus::Online);
        contact.add_tag("a");
        assert!(!contact.remove_tag(5));
        assert!(contact.remove_tag(0));
        assert!(contact.tags.is_empty());
    }

    #[test]
    fn initials_take_first_two_words() {
        let contact = Contact::new("Ahmed Mohammed Ali", "+100", None, ContactStatus::Online);
        assert_eq!(contact.initials(), "AM");
    }
}
