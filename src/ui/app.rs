use std::collections::HashMap;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use tui_widgets::popup::PopupState;
use uuid::Uuid;

use crate::assistant::{self, AiStyle};
use crate::chat::{Attachment, AttachmentKind, Conversation, EMOJI_CATEGORIES, TEMPLATE_CATEGORIES};
use crate::config::{Config, UiColors};
use crate::contacts::{self, Contact};
use crate::layout::{self, SectionLayout};
use crate::notify::{self, Notice, Paginator, ERRORS_PER_PAGE};
use crate::storage::{
    KvStore, PREF_CHAT_SIDEBAR_EXPANDED, PREF_CONTACT_INFO_OPEN, PREF_SECONDARY_SIDEBAR_HIDDEN,
};

use super::draw;
use super::panes::{InfoTab, Panel};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Confirmation dialog carrying the action to run on accept
#[derive(Debug, Clone)]
pub struct ConfirmModal {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

/// Action to perform when confirm modal is accepted
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    /// Clear the persisted section layout (canonical + legacy keys)
    ResetLayout,
    /// Delete a chat message
    DeleteMessage { id: Uuid },
}

/// Help modal state with scroll support
#[derive(Debug, Clone, Default)]
pub struct HelpModal {
    /// Current scroll offset (line index at top of viewport)
    pub scroll: usize,
}

/// Tag-chip editor for the selected contact
#[derive(Debug, Clone)]
pub struct TagsModal {
    pub input: Input,
    pub selected: usize,
}

/// Cursor into a category/item catalog (emoji and template pickers)
#[derive(Debug, Clone, Copy, Default)]
pub struct PickerState {
    pub category: usize,
    pub index: usize,
}

pub struct App<'a> {
    pub config: &'a Config,
    pub store: KvStore,

    // Contacts table (panel 1)
    pub contacts: Vec<Contact>,
    pub selected: usize,

    // Chat (panel 2)
    pub conversations: HashMap<Uuid, Conversation>,
    pub composer: Input,
    pub pending_attachment: Option<Attachment>,
    pub reply_to: Option<String>,
    pub message_cursor: Option<usize>,
    pub ai_style: AiStyle,
    pub last_summary: Option<String>,

    // Contact-info sidebar (panel 3)
    pub info_tab: InfoTab,
    /// The section container; `None` whenever the active tab has no
    /// container, so layout operations can report failure without writing
    pub layout: Option<SectionLayout>,
    pub section_cursor: usize,
    pub info_scroll: usize,

    // Panel visibility / persisted UI prefs
    pub focused_panel: Panel,
    pub contact_info_open: bool,
    pub chat_sidebar_expanded: bool,
    pub secondary_sidebar_hidden: bool,
    pub notifications_open: bool,
    pub help_center_open: bool,

    // Notifications panel
    pub notices: Vec<Notice>,
    pub error_pager: Paginator,

    // Modals
    pub modal_popup: PopupState,
    pub help_modal: Option<HelpModal>,
    pub confirm_modal: Option<ConfirmModal>,
    pub tags_modal: Option<TagsModal>,
    pub emoji_picker: Option<PickerState>,
    pub template_picker: Option<PickerState>,
    pub attach_cursor: Option<usize>,

    pub status: Option<String>,
}

/// Attachment stubs offered by the attach menu; capture is out of scope so
/// picking one just fills in demo metadata.
pub const ATTACHMENT_STUBS: &[(AttachmentKind, &str, u64)] = &[
    (AttachmentKind::Image, "photo.png", 245_760),
    (AttachmentKind::Video, "clip.mp4", 3_145_728),
    (AttachmentKind::File, "invoice.pdf", 87_040),
    (AttachmentKind::Voice, "voice-note.ogg", 65_536),
];

impl<'a> App<'a> {
    pub fn new(config: &'a Config, store: KvStore) -> Self {
        let contacts = contacts::demo_book();
        let mut conversations: HashMap<Uuid, Conversation> = HashMap::new();
        for contact in &contacts {
            let mut conversation = Conversation::default();
            conversation.receive("Hello, I need help with my booking.");
            conversations.insert(contact.id, conversation);
        }

        let notices = notify::demo_feed();
        let error_pager = Paginator::new(notices.len(), ERRORS_PER_PAGE);

        let mut app = Self {
            config,
            store,
            contacts,
            selected: 0,
            conversations,
            composer: Input::default(),
            pending_attachment: None,
            reply_to: None,
            message_cursor: None,
            ai_style: AiStyle::Professional,
            last_summary: None,
            info_tab: InfoTab::Info,
            layout: None,
            section_cursor: 0,
            info_scroll: 0,
            focused_panel: Panel::Contacts,
            contact_info_open: true,
            chat_sidebar_expanded: true,
            secondary_sidebar_hidden: false,
            notifications_open: false,
            help_center_open: false,
            notices,
            error_pager,
            modal_popup: PopupState::default(),
            help_modal: None,
            confirm_modal: None,
            tags_modal: None,
            emoji_picker: None,
            template_picker: None,
            attach_cursor: None,
            status: None,
        };

        app.restore_ui_prefs();
        app.attach_section_container();
        app
    }

    fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.config.debounce_ms)
    }

    /// Restore persisted sidebar visibility preferences.
    fn restore_ui_prefs(&mut self) {
        if let Some(open) = self.store.get_flag(PREF_CONTACT_INFO_OPEN) {
            self.contact_info_open = open;
        }
        if let Some(expanded) = self.store.get_flag(PREF_CHAT_SIDEBAR_EXPANDED) {
            self.chat_sidebar_expanded = expanded;
        }
        if let Some(hidden) = self.store.get_flag(PREF_SECONDARY_SIDEBAR_HIDDEN) {
            self.secondary_sidebar_hidden = hidden;
        }
    }

    /// Build the section container for the active tab and restore its saved
    /// layout. Tabs without a container leave `layout` empty.
    fn attach_section_container(&mut self) {
        if self.info_tab.has_sections() {
            let mut layout = SectionLayout::new(&self.config.sections, self.debounce_delay());
            layout.restore(&mut self.store);
            self.layout = Some(layout);
        } else {
            self.layout = None;
        }
        self.section_cursor = 0;
    }

    // -------------------------------------------------------------------------
    // Section layout operations (container may be absent)
    // -------------------------------------------------------------------------

    /// Write the current section layout snapshot. Returns false (and writes
    /// nothing) when the active tab has no section container; a storage
    /// write failure is logged, the in-memory layout stays correct.
    pub fn save_layout(&mut self) -> bool {
        let Some(layout) = &self.layout else {
            return false;
        };
        if let Err(err) = layout.save(&mut self.store) {
            warn!(%err, "layout snapshot write failed");
        }
        true
    }

    /// Restore the section layout from the store. False when the container
    /// is absent or nothing parseable is stored.
    pub fn restore_layout(&mut self) -> bool {
        let Some(layout) = &mut self.layout else {
            return false;
        };
        layout.restore(&mut self.store)
    }

    /// Clear persisted layout (canonical + legacy keys) and rebuild the
    /// container in default markup order.
    pub fn reset_layout(&mut self) {
        if let Err(err) = layout::reset(&mut self.store) {
            warn!(%err, "layout reset failed");
        }
        if self.info_tab.has_sections() {
            self.layout = Some(SectionLayout::new(
                &self.config.sections,
                self.debounce_delay(),
            ));
        }
        self.section_cursor = 0;
        self.set_status("Section order reset to default");
    }

    /// Switch the contact-info tab: snapshot the old container, swap the
    /// content, then restore into the new one.
    pub fn switch_info_tab(&mut self, tab: InfoTab) {
        if tab == self.info_tab {
            return;
        }
        self.save_layout();
        self.info_tab = tab;
        self.info_scroll = 0;
        self.attach_section_container();
    }

    /// Trailing edge of the debounce window: write the pending snapshot.
    pub fn tick_at(&mut self, now: Instant) {
        let due = match &mut self.layout {
            Some(layout) => layout.debounce().fire_at(now),
            None => false,
        };
        if due {
            self.save_layout();
        }
    }

    fn schedule_layout_save(&mut self) {
        if let Some(layout) = &mut self.layout {
            layout.debounce().schedule();
        }
    }

    pub fn on_resize(&mut self) {
        self.schedule_layout_save();
    }

    // -------------------------------------------------------------------------
    // Event loop
    // -------------------------------------------------------------------------

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            draw::render(terminal, self)?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key)? {
                            break;
                        }
                    }
                    Event::Resize(_, _) => self.on_resize(),
                    _ => {}
                }
            }

            self.tick_at(Instant::now());
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Key routing
    // -------------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Ctrl+C always quits (hardcoded for safety)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Ok(true);
        }

        // Modals take priority, one at a time
        if self.help_modal.is_some() {
            self.handle_help_modal_key(key);
            return Ok(false);
        }
        if self.confirm_modal.is_some() {
            self.handle_confirm_modal_key(key);
            return Ok(false);
        }
        if self.tags_modal.is_some() {
            self.handle_tags_modal_key(key);
            return Ok(false);
        }
        if self.emoji_picker.is_some() {
            self.handle_emoji_picker_key(key);
            return Ok(false);
        }
        if self.template_picker.is_some() {
            self.handle_template_picker_key(key);
            return Ok(false);
        }
        if self.attach_cursor.is_some() {
            self.handle_attach_menu_key(key);
            return Ok(false);
        }

        // Global bindings (composer swallows plain characters, so only
        // non-text panels honor single-letter globals)
        let global = &self.config.keys.global;
        let typing = self.focused_panel == Panel::Chat;
        if !typing {
            if key_matches_any(&key, &global.quit) {
                return Ok(true);
            }
            if key_matches_any(&key, &global.contact_info) {
                self.toggle_contact_info();
                return Ok(false);
            }
            if key_matches_any(&key, &global.notifications) {
                self.notifications_open = !self.notifications_open;
                return Ok(false);
            }
            // Minor sidebar toggles, not worth a binding group
            if matches!(key.code, KeyCode::Char('c')) {
                self.chat_sidebar_expanded = !self.chat_sidebar_expanded;
                self.store
                    .set_flag(PREF_CHAT_SIDEBAR_EXPANDED, self.chat_sidebar_expanded);
                return Ok(false);
            }
            if matches!(key.code, KeyCode::Char('b')) {
                self.secondary_sidebar_hidden = !self.secondary_sidebar_hidden;
                self.store
                    .set_flag(PREF_SECONDARY_SIDEBAR_HIDDEN, self.secondary_sidebar_hidden);
                return Ok(false);
            }
            if matches!(key.code, KeyCode::Char('H')) {
                self.help_center_open = !self.help_center_open;
                return Ok(false);
            }
        }
        if key_matches_any(&key, &global.help) {
            self.help_modal = Some(HelpModal::default());
            self.modal_popup = PopupState::default();
            return Ok(false);
        }
        if key_matches_any(&key, &global.next_panel) {
            self.focus_panel(self.focused_panel.next());
            return Ok(false);
        }
        if key_matches_any(&key, &global.prev_panel) {
            self.focus_panel(self.focused_panel.prev());
            return Ok(false);
        }
        if let KeyCode::Char(digit) = key.code {
            if !typing {
                if let Some(panel) = Panel::from_digit(digit) {
                    self.focus_panel(panel);
                    return Ok(false);
                }
            }
        }

        if self.notifications_open {
            // PageUp/PageDown page the error feed while the panel is open
            match key.code {
                KeyCode::PageDown => {
                    self.error_pager.next();
                    return Ok(false);
                }
                KeyCode::PageUp => {
                    self.error_pager.prev();
                    return Ok(false);
                }
                _ => {}
            }
        }

        match self.focused_panel {
            Panel::Contacts => self.handle_contacts_key(key),
            Panel::Chat => self.handle_chat_key(key),
            Panel::ContactInfo => self.handle_info_key(key),
        }
        Ok(false)
    }

    fn focus_panel(&mut self, panel: Panel) {
        if panel == Panel::ContactInfo && !self.contact_info_open {
            self.toggle_contact_info();
        }
        self.focused_panel = panel;
    }

    fn toggle_contact_info(&mut self) {
        self.contact_info_open = !self.contact_info_open;
        self.store
            .set_flag(PREF_CONTACT_INFO_OPEN, self.contact_info_open);
        if !self.contact_info_open && self.focused_panel == Panel::ContactInfo {
            self.focused_panel = Panel::Chat;
        }
    }

    // -------------------------------------------------------------------------
    // Contacts panel
    // -------------------------------------------------------------------------

    fn handle_contacts_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.contacts;
        if key_matches_any(&key, &keys.next) {
            if self.selected + 1 < self.contacts.len() {
                self.selected += 1;
                self.on_contact_changed();
            }
        } else if key_matches_any(&key, &keys.prev) {
            if self.selected > 0 {
                self.selected -= 1;
                self.on_contact_changed();
            }
        } else if key_matches_any(&key, &keys.tags) {
            self.tags_modal = Some(TagsModal {
                input: Input::default(),
                selected: 0,
            });
            self.modal_popup = PopupState::default();
        }
    }

    fn on_contact_changed(&mut self) {
        self.message_cursor = None;
        self.reply_to = None;
        self.last_summary = None;
        self.info_scroll = 0;
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.contacts.get(self.selected)
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        let contact = self.contacts.get(self.selected)?;
        self.conversations.get(&contact.id)
    }

    fn conversation_mut(&mut self) -> Option<&mut Conversation> {
        let contact = self.contacts.get(self.selected)?;
        self.conversations.get_mut(&contact.id)
    }

    // -------------------------------------------------------------------------
    // Chat panel
    // -------------------------------------------------------------------------

    fn handle_chat_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.composer;
        if key_matches_any(&key, &keys.send) {
            self.send_message();
            return;
        }
        if key_matches_any(&key, &keys.emoji) {
            self.emoji_picker = Some(PickerState::default());
            self.modal_popup = PopupState::default();
            return;
        }
        if key_matches_any(&key, &keys.template) {
            self.template_picker = Some(PickerState::default());
            self.modal_popup = PopupState::default();
            return;
        }
        if key_matches_any(&key, &keys.attach) {
            self.attach_cursor = Some(0);
            self.modal_popup = PopupState::default();
            return;
        }
        if key_matches_any(&key, &keys.assistant) {
            let draft = self.composer.value().to_string();
            let rewritten = assistant::rewrite(self.ai_style, &draft);
            if !rewritten.is_empty() {
                self.composer = Input::new(rewritten);
                self.set_status(format!("Draft rewritten ({})", self.ai_style.title()));
            }
            return;
        }

        // Message selection and actions on the selected message
        match key.code {
            KeyCode::Up => {
                self.move_message_cursor(-1);
                return;
            }
            KeyCode::Down => {
                self.move_message_cursor(1);
                return;
            }
            KeyCode::F(6) => {
                if let Some(id) = self.cursor_message_id() {
                    if let Some(conversation) = self.conversation_mut() {
                        conversation.toggle_reaction(id, "👍");
                    }
                }
                return;
            }
            KeyCode::F(7) => {
                if let Some(id) = self.cursor_message_id() {
                    let quote = self
                        .conversation()
                        .and_then(|c| c.find(id))
                        .map(|m| m.body.clone());
                    self.reply_to = quote;
                }
                return;
            }
            KeyCode::F(8) => {
                if let Some(id) = self.cursor_message_id() {
                    if let Some(conversation) = self.conversation_mut() {
                        let _ = conversation.forward(id);
                    }
                    self.set_status("Message forwarded");
                }
                return;
            }
            KeyCode::F(9) => {
                if let Some(id) = self.cursor_message_id() {
                    self.confirm_modal = Some(ConfirmModal {
                        title: "DELETE MESSAGE".into(),
                        message: "Delete this message?".into(),
                        action: ConfirmAction::DeleteMessage { id },
                    });
                    self.modal_popup = PopupState::default();
                }
                return;
            }
            KeyCode::Esc => {
                self.reply_to = None;
                self.pending_attachment = None;
                self.message_cursor = None;
                return;
            }
            _ => {}
        }

        let _ = self.composer.handle_event(&Event::Key(key));
    }

    fn move_message_cursor(&mut self, delta: i64) {
        let Some(conversation) = self.conversation() else {
            return;
        };
        let len = conversation.len();
        if len == 0 {
            return;
        }
        let current = self.message_cursor.unwrap_or(len - 1) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1);
        self.message_cursor = Some(next as usize);
    }

    fn cursor_message_id(&self) -> Option<Uuid> {
        let conversation = self.conversation()?;
        let index = self.message_cursor?;
        conversation.messages().get(index).map(|m| m.id)
    }

    fn send_message(&mut self) {
        let text = self.composer.value().to_string();
        let attachment = self.pending_attachment.take();
        let reply_to = self.reply_to.take();
        let Some(conversation) = self.conversation_mut() else {
            return;
        };
        if conversation.send(&text, attachment, reply_to).is_some() {
            self.composer = Input::default();
            self.message_cursor = None;
        }
    }

    // -------------------------------------------------------------------------
    // Contact-info panel
    // -------------------------------------------------------------------------

    fn handle_info_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.sections;

        if key_matches_any(&key, &keys.tab_next) {
            self.switch_info_tab(self.info_tab.next());
            return;
        }
        if key_matches_any(&key, &keys.tab_prev) {
            self.switch_info_tab(self.info_tab.prev());
            return;
        }

        // AI tab: style selection and summary
        if self.info_tab == InfoTab::Ai {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    let index = AiStyle::ALL
                        .iter()
                        .position(|s| *s == self.ai_style)
                        .unwrap_or(0);
                    self.ai_style = AiStyle::ALL[(index + 1) % AiStyle::ALL.len()];
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    let index = AiStyle::ALL
                        .iter()
                        .position(|s| *s == self.ai_style)
                        .unwrap_or(0);
                    self.ai_style =
                        AiStyle::ALL[(index + AiStyle::ALL.len() - 1) % AiStyle::ALL.len()];
                }
                KeyCode::Char('s') => {
                    if let Some(conversation) = self.conversation() {
                        self.last_summary = Some(assistant::summarize(conversation));
                    }
                }
                _ => {}
            }
            return;
        }

        // Scroll settles through the debouncer like the original scroll
        // listener
        match key.code {
            KeyCode::PageDown => {
                self.info_scroll = self.info_scroll.saturating_add(5);
                self.schedule_layout_save();
                return;
            }
            KeyCode::PageUp => {
                self.info_scroll = self.info_scroll.saturating_sub(5);
                self.schedule_layout_save();
                return;
            }
            _ => {}
        }

        let Some(layout) = &mut self.layout else {
            return;
        };
        let len = layout.len();
        if len == 0 {
            return;
        }

        let dragging = layout.dragging().is_some();
        if key_matches_any(&key, &keys.next) {
            if self.section_cursor + 1 < len {
                self.section_cursor += 1;
                if dragging {
                    layout.drag_over(self.section_cursor);
                }
            }
        } else if key_matches_any(&key, &keys.prev) {
            if self.section_cursor > 0 {
                self.section_cursor -= 1;
                if dragging {
                    layout.drag_over(self.section_cursor);
                }
            }
        } else if key_matches_any(&key, &keys.toggle) {
            if layout.toggle(self.section_cursor) {
                // Toggle writes are debounced
                layout.debounce().schedule();
            }
        } else if key_matches_any(&key, &keys.grab) {
            if layout.start_drag(self.section_cursor) {
                self.set_status("Section grabbed; move and drop with Enter");
            }
        } else if key_matches_any(&key, &keys.drop) {
            if dragging {
                layout.drop_on(self.section_cursor);
                if layout.end_drag() {
                    self.save_layout();
                }
            }
        } else if key_matches_any(&key, &keys.cancel) {
            // Drag end saves even without a drop, like the dragend handler
            if layout.end_drag() {
                self.save_layout();
            }
        } else if key_matches_any(&key, &keys.reset) {
            self.confirm_modal = Some(ConfirmModal {
                title: "RESET SECTIONS".into(),
                message: "Reset section order and state to default?".into(),
                action: ConfirmAction::ResetLayout,
            });
            self.modal_popup = PopupState::default();
        }
    }

    // -------------------------------------------------------------------------
    // Modals
    // -------------------------------------------------------------------------

    fn handle_help_modal_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        let Some(modal) = &mut self.help_modal else {
            return;
        };
        if key_matches_any(&key, &keys.next) {
            modal.scroll = modal.scroll.saturating_add(1);
        } else if key_matches_any(&key, &keys.prev) {
            modal.scroll = modal.scroll.saturating_sub(1);
        } else if key_matches_any(&key, &keys.cancel) {
            self.help_modal = None;
        }
    }

    fn handle_confirm_modal_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        if key_matches_any(&key, &keys.confirm) {
            let Some(modal) = self.confirm_modal.take() else {
                return;
            };
            match modal.action {
                ConfirmAction::ResetLayout => self.reset_layout(),
                ConfirmAction::DeleteMessage { id } => {
                    if let Some(conversation) = self.conversation_mut() {
                        conversation.delete(id);
                    }
                    self.message_cursor = None;
                }
            }
        } else if key_matches_any(&key, &keys.cancel) {
            self.confirm_modal = None;
        }
    }

    fn handle_tags_modal_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        let Some(modal) = &mut self.tags_modal else {
            return;
        };

        if key_matches_any(&key, &keys.cancel) {
            self.tags_modal = None;
            return;
        }

        let tag_count = self
            .contacts
            .get(self.selected)
            .map(|c| c.tags.len())
            .unwrap_or(0);

        if key_matches_any(&key, &keys.confirm) {
            let text = modal.input.value().to_string();
            modal.input = Input::default();
            if let Some(contact) = self.contacts.get_mut(self.selected) {
                if contact.add_tag(&text) {
                    self.set_status("Tag added");
                } else if !text.trim().is_empty() {
                    self.set_status("Tag already exists");
                }
            }
            return;
        }
        if key_matches_any(&key, &keys.delete) {
            let index = modal.selected;
            if let Some(contact) = self.contacts.get_mut(self.selected) {
                if contact.remove_tag(index) {
                    if let Some(modal) = &mut self.tags_modal {
                        modal.selected = modal.selected.saturating_sub(1);
                    }
                }
            }
            return;
        }
        match key.code {
            KeyCode::Down => {
                if modal.selected + 1 < tag_count {
                    modal.selected += 1;
                }
            }
            KeyCode::Up => {
                modal.selected = modal.selected.saturating_sub(1);
            }
            _ => {
                let _ = modal.input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_emoji_picker_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        let Some(picker) = &mut self.emoji_picker else {
            return;
        };
        let categories = EMOJI_CATEGORIES.len();
        let items = EMOJI_CATEGORIES[picker.category].1.len();

        if key_matches_any(&key, &keys.cancel) {
            self.emoji_picker = None;
        } else if key_matches_any(&key, &keys.confirm) {
            let emoji = EMOJI_CATEGORIES[picker.category].1[picker.index];
            let value = format!("{}{}", self.composer.value(), emoji);
            self.composer = Input::new(value);
        } else if key_matches_any(&key, &keys.next) {
            picker.index = (picker.index + 1) % items;
        } else if key_matches_any(&key, &keys.prev) {
            picker.index = (picker.index + items - 1) % items;
        } else {
            match key.code {
                KeyCode::Right => {
                    picker.category = (picker.category + 1) % categories;
                    picker.index = 0;
                }
                KeyCode::Left => {
                    picker.category = (picker.category + categories - 1) % categories;
                    picker.index = 0;
                }
                _ => {}
            }
        }
    }

    fn handle_template_picker_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        let Some(picker) = &mut self.template_picker else {
            return;
        };
        let categories = TEMPLATE_CATEGORIES.len();
        let items = TEMPLATE_CATEGORIES[picker.category].1.len();

        if key_matches_any(&key, &keys.cancel) {
            self.template_picker = None;
        } else if key_matches_any(&key, &keys.confirm) {
            let template = TEMPLATE_CATEGORIES[picker.category].1[picker.index];
            let name = self
                .selected_contact()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            self.composer = Input::new(crate::chat::fill_template(&template, &name));
            self.template_picker = None;
        } else if key_matches_any(&key, &keys.next) {
            picker.index = (picker.index + 1) % items;
        } else if key_matches_any(&key, &keys.prev) {
            picker.index = (picker.index + items - 1) % items;
        } else {
            match key.code {
                KeyCode::Right => {
                    picker.category = (picker.category + 1) % categories;
                    picker.index = 0;
                }
                KeyCode::Left => {
                    picker.category = (picker.category + categories - 1) % categories;
                    picker.index = 0;
                }
                _ => {}
            }
        }
    }

    fn handle_attach_menu_key(&mut self, key: KeyEvent) {
        let keys = &self.config.keys.modal;
        let Some(cursor) = self.attach_cursor else {
            return;
        };
        if key_matches_any(&key, &keys.cancel) {
            self.attach_cursor = None;
        } else if key_matches_any(&key, &keys.confirm) {
            let (kind, name, size) = ATTACHMENT_STUBS[cursor];
            self.pending_attachment = Some(Attachment::new(kind, name, size));
            self.attach_cursor = None;
            self.set_status(format!("Attached {name}"));
        } else if key_matches_any(&key, &keys.next) {
            self.attach_cursor = Some((cursor + 1) % ATTACHMENT_STUBS.len());
        } else if key_matches_any(&key, &keys.prev) {
            self.attach_cursor = Some((cursor + ATTACHMENT_STUBS.len() - 1) % ATTACHMENT_STUBS.len());
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    pub fn ui_colors(&self) -> &UiColors {
        &self.config.ui.colors
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}

/// Check if the key event matches any of the binding strings
fn key_matches_any(event: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| key_matches_single(event, b))
}

/// Check if the key event matches a single binding string
fn key_matches_single(event: &KeyEvent, binding: &str) -> bool {
    let trimmed = binding.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Disallow Ctrl/Alt/Super modifiers (we don't support them)
    let disallowed = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER;
    if event.modifiers.intersects(disallowed) {
        return false;
    }

    match trimmed.to_ascii_lowercase().as_str() {
        // Special keys
        "enter" => matches!(event.code, KeyCode::Enter),
        "tab" => matches!(event.code, KeyCode::Tab),
        "backtab" | "shift+tab" => matches!(event.code, KeyCode::BackTab),
        "backspace" => matches!(event.code, KeyCode::Backspace),
        "esc" | "escape" => matches!(event.code, KeyCode::Esc),
        "space" => matches!(event.code, KeyCode::Char(' ')),
        // Arrow keys
        "up" => matches!(event.code, KeyCode::Up),
        "down" => matches!(event.code, KeyCode::Down),
        "left" => matches!(event.code, KeyCode::Left),
        "right" => matches!(event.code, KeyCode::Right),
        // Page navigation
        "pageup" | "page_up" => matches!(event.code, KeyCode::PageUp),
        "pagedown" | "page_down" => matches!(event.code, KeyCode::PageDown),
        // Function keys
        "f1" => matches!(event.code, KeyCode::F(1)),
        "f2" => matches!(event.code, KeyCode::F(2)),
        "f3" => matches!(event.code, KeyCode::F(3)),
        "f4" => matches!(event.code, KeyCode::F(4)),
        "f5" => matches!(event.code, KeyCode::F(5)),
        "f6" => matches!(event.code, KeyCode::F(6)),
        "f7" => matches!(event.code, KeyCode::F(7)),
        "f8" => matches!(event.code, KeyCode::F(8)),
        "f9" => matches!(event.code, KeyCode::F(9)),
        "f10" => matches!(event.code, KeyCode::F(10)),
        "f11" => matches!(event.code, KeyCode::F(11)),
        "f12" => matches!(event.code, KeyCode::F(12)),
        // Single character - case-sensitive (R != r, since R requires Shift)
        _ => {
            let mut chars = trimmed.chars();
            if let (Some(first), None) = (chars.next(), chars.next()) {
                matches!(event.code, KeyCode::Char(c) if c == first)
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::layout::CANONICAL_KEY;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            config_path: PathBuf::from("test-config.toml"),
            storage_path: PathBuf::from("unused"),
            debounce_ms: 250,
            sections: config::default_sections(),
            ui: Default::default(),
            keys: Default::default(),
        }
    }

    #[test]
    fn layout_ops_fail_without_a_section_container() {
        let config = test_config();
        let mut app = App::new(&config, KvStore::in_memory());

        app.switch_info_tab(InfoTab::Email);
        // Moving to Email wrote a snapshot of the Info container; clear it to
        // observe that the Email tab itself never writes
        app.store.remove(CANONICAL_KEY).unwrap();

        assert!(!app.save_layout());
        assert!(!app.restore_layout());
        assert!(app.store.get(CANONICAL_KEY).is_none());
    }

    #[test]
    fn tab_switch_saves_and_restores_section_state() {
        let config = test_config();
        let mut app = App::new(&config, KvStore::in_memory());

        // Expand the second section, then reorder it to the front
        let layout = app.layout.as_mut().unwrap();
        layout.toggle(1);
        layout.start_drag(1);
        layout.drop_on(0);
        layout.end_drag();
        let expected: Vec<String> = layout.sections().iter().map(|s| s.key.clone()).collect();

        app.switch_info_tab(InfoTab::Notes);
        assert!(app.layout.is_none());

        app.switch_info_tab(InfoTab::Info);
        let restored = app.layout.as_ref().unwrap();
        let keys: Vec<String> = restored.sections().iter().map(|s| s.key.clone()).collect();
        assert_eq!(keys, expected);
        assert!(restored.sections()[0].open);
    }

    #[test]
    fn debounced_resize_writes_once_after_settle() {
        let config = test_config();
        let mut app = App::new(&config, KvStore::in_memory());

        let t0 = Instant::now();
        for i in 0..5u64 {
            app.layout
                .as_mut()
                .unwrap()
                .debounce()
                .schedule_at(t0 + Duration::from_millis(i * 20));
        }

        app.tick_at(t0 + Duration::from_millis(100));
        assert!(app.store.get(CANONICAL_KEY).is_none());

        app.tick_at(t0 + Duration::from_millis(80 + 251));
        assert!(app.store.get(CANONICAL_KEY).is_some());
    }

    #[test]
    fn reset_layout_clears_all_store_keys_and_restores_default_order() {
        let config = test_config();
        let mut app = App::new(&config, KvStore::in_memory());

        {
            let layout = app.layout.as_mut().unwrap();
            layout.start_drag(0);
            layout.drop_on(3);
            layout.end_drag();
        }
        app.save_layout();
        app.store
            .set(crate::layout::LEGACY_KEY, "[]")
            .unwrap();

        app.reset_layout();

        assert!(app.store.get(CANONICAL_KEY).is_none());
        assert!(app.store.get(crate::layout::LEGACY_KEY).is_none());
        let keys: Vec<&str> = app
            .layout
            .as_ref()
            .unwrap()
            .sections()
            .iter()
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(keys[0], "conversation-actions");
        assert!(app
            .layout
            .as_ref()
            .unwrap()
            .sections()
            .iter()
            .all(|s| !s.open));
    }

    #[test]
    fn ui_prefs_restore_from_store() {
        let config = test_config();
        let mut store = KvStore::in_memory();
        store.set_flag(PREF_CONTACT_INFO_OPEN, false);
        store.set_flag(PREF_SECONDARY_SIDEBAR_HIDDEN, true);

        let app = App::new(&config, store);
        assert!(!app.contact_info_open);
        assert!(app.secondary_sidebar_hidden);
        // No stored value keeps the default
        assert!(app.chat_sidebar_expanded);
    }

    #[test]
    fn key_binding_strings_match_events() {
        let event = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        assert!(key_matches_single(&event, "g"));
        assert!(!key_matches_single(&event, "G"));

        let event = KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE);
        assert!(key_matches_single(&event, "F2"));

        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(!key_matches_single(&event, "q"));
    }
}
