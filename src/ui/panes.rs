/// Panel identifiers for the 3-panel dashboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Panel 1: Contacts table
    Contacts,
    /// Panel 2: Chat window and composer
    Chat,
    /// Panel 3: Contact-info sidebar (tabs + section container)
    ContactInfo,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Contacts, Panel::Chat, Panel::ContactInfo];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Contacts => "CONTACTS",
            Panel::Chat => "CHAT",
            Panel::ContactInfo => "CONTACT INFO",
        }
    }

    pub fn digit(self) -> char {
        match self {
            Panel::Contacts => '1',
            Panel::Chat => '2',
            Panel::ContactInfo => '3',
        }
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Panel::Contacts),
            '2' => Some(Panel::Chat),
            '3' => Some(Panel::ContactInfo),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Panel::Contacts => Panel::Chat,
            Panel::Chat => Panel::ContactInfo,
            Panel::ContactInfo => Panel::Contacts,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Panel::Contacts => Panel::ContactInfo,
            Panel::Chat => Panel::Contacts,
            Panel::ContactInfo => Panel::Chat,
        }
    }
}

/// Tabs of the contact-info sidebar. Only the Info tab hosts the section
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTab {
    Info,
    Ai,
    Journeys,
    Email,
    Notes,
    Reservations,
}

impl InfoTab {
    pub const ALL: [InfoTab; 6] = [
        InfoTab::Info,
        InfoTab::Ai,
        InfoTab::Journeys,
        InfoTab::Email,
        InfoTab::Notes,
        InfoTab::Reservations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            InfoTab::Info => "Info",
            InfoTab::Ai => "AI",
            InfoTab::Journeys => "Journeys",
            InfoTab::Email => "Email",
            InfoTab::Notes => "Notes",
            InfoTab::Reservations => "Reservations",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            InfoTab::Info => "Contact information",
            InfoTab::Ai => "AI message style",
            InfoTab::Journeys => "Contact journeys",
            InfoTab::Email => "Email",
            InfoTab::Notes => "Notes",
            InfoTab::Reservations => "Reservations",
        }
    }

    /// Whether the tab content is the reorderable section container
    pub fn has_sections(self) -> bool {
        matches!(self, InfoTab::Info)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        let index = (self.index() + 1) % Self::ALL.len();
        Self::ALL[index]
    }

    pub fn prev(self) -> Self {
        let index = (self.index() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[index]
    }
}
