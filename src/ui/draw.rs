use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use ratatui::symbols::line::NORMAL as LINE;
use ratatui::{Frame, Terminal};
// Use Popup from tui-widgets to render modals
use tui_widgets::popup::Popup;

use crate::chat::{Direction as MessageDirection, EMOJI_CATEGORIES, TEMPLATE_CATEGORIES};
use crate::config::RgbColor;

use super::app::{App, ATTACHMENT_STUBS};
use super::panes::{InfoTab, Panel};

const CONFIRM_HELP: &str = "Y/Enter: confirm  N/Esc: cancel";
const HELP_MODAL_FOOTER: &str = "j/k: scroll  Esc/q: close";
const TAGS_HELP: &str = "Type tag  Enter: add  Up/Down: nav  x: delete  Esc: close";
const PICKER_HELP: &str = "Left/Right: category  j/k: nav  Enter: pick  Esc: close";
const ATTACH_HELP: &str = "j/k: nav  Enter: attach  Esc: close";

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &mut App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_body(frame, layout[1], app);
    draw_footer(frame, layout[2], app);
    draw_confirm_modal(frame, size, app);
    draw_tags_modal(frame, size, app);
    draw_emoji_picker(frame, size, app);
    draw_template_picker(frame, size, app);
    draw_attach_menu(frame, size, app);
    draw_help_modal(frame, size, app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let mut spans: Vec<Span> = vec![Span::styled("WADESK", header_text_style(app))];
    for panel in Panel::ALL {
        spans.push(Span::raw("   "));
        let label = format!("[{}] {}", panel.digit(), panel.title());
        if panel == app.focused_panel {
            spans.push(Span::styled(label, selection_style(app)));
        } else {
            spans.push(Span::styled(label, header_text_style(app)));
        }
    }
    if app.notifications_open {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("errors {}/{}", app.error_pager.page() + 1, app.error_pager.page_count()),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    // Bottom strips for the error feed and the help center, when open
    let mut constraints = vec![Constraint::Min(0)];
    if app.notifications_open {
        constraints.push(Constraint::Length(9));
    }
    if app.help_center_open {
        constraints.push(Constraint::Length(6));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_panels(frame, rows[0], app);
    let mut next = 1;
    if app.notifications_open {
        draw_notifications(frame, rows[next], app);
        next += 1;
    }
    if app.help_center_open {
        draw_help_center(frame, rows[next], app);
    }
}

fn draw_panels(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let contacts_width = if app.secondary_sidebar_hidden { 24 } else { 32 };
    let mut constraints = vec![Constraint::Length(contacts_width), Constraint::Min(30)];
    if app.contact_info_open {
        let info_width = if app.chat_sidebar_expanded { 40 } else { 50 };
        constraints.push(Constraint::Length(info_width));
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    draw_contacts(frame, columns[0], app);
    draw_chat(frame, columns[1], app);
    if app.contact_info_open {
        draw_contact_info(frame, columns[2], app);
    }
}

// =============================================================================
// Contacts table
// =============================================================================

fn draw_contacts(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.focused_panel == Panel::Contacts;
    let rows: Vec<Row> = app
        .contacts
        .iter()
        .enumerate()
        .map(|(index, contact)| {
            let status = match contact.status {
                crate::contacts::ContactStatus::Online => {
                    Span::styled("●", Style::default().fg(Color::Green))
                }
                crate::contacts::ContactStatus::Away => {
                    Span::styled("●", Style::default().fg(Color::Yellow))
                }
                crate::contacts::ContactStatus::Offline => {
                    Span::styled("○", Style::default().fg(Color::DarkGray))
                }
            };
            let tags = contact.tags.join(",");
            let row = Row::new(vec![
                Cell::from(contact.initials()),
                Cell::from(contact.name.clone()),
                Cell::from(status),
                Cell::from(tags),
            ]);
            if index == app.selected {
                row.style(selection_style(app))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
            Constraint::Min(6),
        ],
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Panel::Contacts.title())
            .border_style(border_style(app, active)),
    );
    frame.render_widget(table, area);
}

// =============================================================================
// Chat pane
// =============================================================================

fn draw_chat(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.focused_panel == Panel::Chat;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Panel::Chat.title())
        .border_style(border_style(app, active));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Reply banner and attachment preview take a line each above the composer
    let mut composer_height = 1u16;
    if app.reply_to.is_some() {
        composer_height += 1;
    }
    if app.pending_attachment.is_some() {
        composer_height += 1;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(composer_height)])
        .split(inner);

    draw_messages(frame, rows[0], app);
    draw_composer(frame, rows[1], app, active);
}

fn draw_messages(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(conversation) = app.conversation() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for (index, message) in conversation.messages().iter().enumerate() {
        let selected = app.message_cursor == Some(index);
        let (prefix, body_style) = match message.direction {
            MessageDirection::Sent => ("→ ", Style::default().fg(color(app.ui_colors().accent))),
            MessageDirection::Received => ("← ", Style::default()),
        };
        let body_style = if selected {
            selection_style(app)
        } else {
            body_style
        };

        if let Some(quoted) = &message.reply_to {
            lines.push(Line::from(Span::styled(
                format!("  ┃ {quoted}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let mut spans = vec![Span::styled(format!("{prefix}{}", message.body), body_style)];
        if !message.reactions.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::raw(message.reactions.join(" ")));
        }
        lines.push(Line::from(spans));
        if let Some(attachment) = &message.attachment {
            lines.push(Line::from(Span::styled(
                format!(
                    "  [{} {} {}]",
                    attachment.kind.title(),
                    attachment.name,
                    attachment.size_display()
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    // Show the tail of the history
    let visible = area.height as usize;
    let skip = lines.len().saturating_sub(visible);
    let tail: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(Text::from(tail)), area);
}

fn draw_composer(frame: &mut Frame<'_>, area: Rect, app: &App, active: bool) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(quoted) = &app.reply_to {
        lines.push(Line::from(Span::styled(
            format!("replying to: {quoted}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(attachment) = &app.pending_attachment {
        lines.push(Line::from(Span::styled(
            format!("attach: {} ({})", attachment.name, attachment.size_display()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    let prompt = "> ";
    lines.push(Line::from(vec![
        Span::styled(prompt, header_text_style(app)),
        Span::raw(app.composer.value().to_string()),
    ]));
    let input_row = lines.len() as u16 - 1;
    frame.render_widget(Paragraph::new(Text::from(lines)), area);

    if active {
        let cursor_x = area.x + prompt.len() as u16 + app.composer.visual_cursor() as u16;
        let cursor_y = area.y + input_row;
        if cursor_x < area.x + area.width {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

// =============================================================================
// Contact-info sidebar
// =============================================================================

fn draw_contact_info(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.focused_panel == Panel::ContactInfo;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Panel::ContactInfo.title())
        .border_style(border_style(app, active));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(build_tab_header(app)), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(app.info_tab.header(), header_text_style(app))),
        rows[1],
    );

    match app.info_tab {
        InfoTab::Info => draw_sections(frame, rows[2], app),
        InfoTab::Ai => draw_ai_tab(frame, rows[2], app),
        tab => {
            let text = format!("{} is not wired to a backend in this build.", tab.title());
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
                rows[2],
            );
        }
    }
}

fn build_tab_header(app: &App) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    for tab in InfoTab::ALL {
        if !spans.is_empty() {
            spans.push(Span::raw(format!(" {} ", LINE.vertical)));
        }
        if tab == app.info_tab {
            spans.push(Span::styled(
                tab.title().to_string(),
                selection_style(app).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                tab.title().to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    Line::from(spans)
}

fn draw_sections(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(layout) = &app.layout else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for (index, section) in layout.sections().iter().enumerate() {
        let caret = if section.open { "▾" } else { "▸" };
        let mut style = if index == app.section_cursor && app.focused_panel == Panel::ContactInfo {
            selection_style(app)
        } else {
            Style::default()
        };
        let mut suffix = String::new();
        if layout.dragging() == Some(index) {
            style = style
                .fg(color(app.ui_colors().accent))
                .add_modifier(Modifier::BOLD);
            suffix.push_str("  [grabbed]");
        } else if layout.drop_target() == Some(index) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        lines.push(Line::from(Span::styled(
            format!("{caret} {}{suffix}", section.title),
            style,
        )));
        if section.open {
            for detail in section_details(app, &section.key) {
                lines.push(Line::from(Span::styled(
                    format!("    {detail}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    let skip = app.info_scroll.min(lines.len().saturating_sub(1));
    let tail: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(Text::from(tail)), area);
}

/// Demo body lines for an expanded section.
fn section_details(app: &App, key: &str) -> Vec<String> {
    let Some(contact) = app.selected_contact() else {
        return Vec::new();
    };
    match key {
        "conversation-actions" => vec![
            "Assign conversation".to_string(),
            "Close conversation".to_string(),
        ],
        "conversation-info" => {
            let mut details = vec![format!("Phone: {}", contact.phone)];
            if let Some(email) = &contact.email {
                details.push(format!("Email: {email}"));
            }
            details.push(format!("Status: {}", contact.status.title()));
            details
        }
        "conversation-variables" => vec![format!("name = {}", contact.name)],
        "previous-conversations" => vec!["No previous conversations".to_string()],
        _ => vec!["(empty)".to_string()],
    }
}

fn draw_ai_tab(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Vec::new();
    for style in crate::assistant::AiStyle::ALL {
        let marker = if style == app.ai_style { "●" } else { "○" };
        let line_style = if style == app.ai_style {
            selection_style(app)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {}", style.title()),
            line_style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "j/k: style  s: summarize  F5 in composer: rewrite draft",
        Style::default().fg(Color::DarkGray),
    )));
    if let Some(summary) = &app.last_summary {
        lines.push(Line::from(""));
        lines.push(Line::from(summary.clone()));
    }
    frame.render_widget(
        Paragraph::new(Text::from(lines)).wrap(ratatui::widgets::Wrap { trim: false }),
        area,
    );
}

// =============================================================================
// Notification feed and help center strips
// =============================================================================

fn draw_notifications(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let title = format!(
        "Errors (page {}/{}, PgUp/PgDn)",
        app.error_pager.page() + 1,
        app.error_pager.page_count()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(app, false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = app.error_pager.range().filter_map(|index| {
        let notice = app.notices.get(index)?;
        let level_style = match notice.level {
            crate::notify::Level::Error => Style::default().fg(Color::Red),
            crate::notify::Level::Warning => Style::default().fg(Color::Yellow),
            crate::notify::Level::Info => Style::default().fg(Color::DarkGray),
        };
        Some(Line::from(vec![
            Span::styled(format!("{:5} ", notice.level.title()), level_style),
            Span::raw(format!("{}: {}", notice.title, notice.body)),
        ]))
    }).collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

const HELP_CENTER_LINES: &[&str] = &[
    "Getting started: pick a contact, write in the composer, Enter sends.",
    "Sections: g grabs, j/k moves, Enter drops, Space folds. R resets.",
    "Templates: F3 in the composer inserts a canned reply.",
    "AI styles: switch to the AI tab and pick a tone for F5 rewrites.",
];

fn draw_help_center(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Help center")
        .border_style(border_style(app, false));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let lines: Vec<Line> = HELP_CENTER_LINES.iter().map(|l| Line::from(*l)).collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let text = match &app.status {
        Some(status) => status.clone(),
        None => match app.focused_panel {
            Panel::Contacts => "j/k: nav  t: tags  Tab: panel  i: info  n: errors  ?: help  q: quit".to_string(),
            Panel::Chat => "Enter: send  F2: emoji  F3: template  F4: attach  F5: rewrite  Up/Down: select".to_string(),
            Panel::ContactInfo => "h/l: tab  j/k: nav  Space: fold  g: grab  Enter: drop  R: reset".to_string(),
        },
    };
    frame.render_widget(
        Paragraph::new(Span::styled(text, status_style(app))).alignment(Alignment::Left),
        area,
    );
}

// =============================================================================
// Modals
// =============================================================================

fn draw_confirm_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(modal) = app.confirm_modal.as_ref() else {
        return;
    };

    let body_text = Text::from(vec![
        Line::from(modal.message.clone()),
        Line::from("".to_string()),
        Line::from(CONFIRM_HELP.to_string()),
    ]);
    let title_line = Line::from(Span::styled(modal.title.clone(), header_text_style(app)));
    let popup = Popup::new(body_text)
        .title(title_line)
        .border_style(border_style(app, true));

    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_tags_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(modal) = app.tags_modal.as_ref() else {
        return;
    };
    let selection = selection_style(app);
    let border_s = border_style(app, true);
    let header_s = header_text_style(app);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(contact) = app.selected_contact() {
        if contact.tags.is_empty() {
            lines.push(Line::from(Span::styled(
                "(no tags)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for (index, tag) in contact.tags.iter().enumerate() {
            let style = if index == modal.selected {
                selection
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("⦿ {tag}"), style)));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("new: {}", modal.input.value())));
    lines.push(Line::from(Span::styled(
        TAGS_HELP.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Popup::new(Text::from(lines))
        .title(Line::from(Span::styled("TAGS".to_string(), header_s)))
        .border_style(border_s);
    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_emoji_picker(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(picker) = app.emoji_picker else {
        return;
    };
    let (category, emojis) = EMOJI_CATEGORIES[picker.category];

    let mut item_spans: Vec<Span> = Vec::new();
    for (index, emoji) in emojis.iter().enumerate() {
        if index == picker.index {
            item_spans.push(Span::styled(format!("[{emoji}]"), selection_style(app)));
        } else {
            item_spans.push(Span::raw(format!(" {emoji} ")));
        }
    }

    let body_text = Text::from(vec![
        Line::from(Span::styled(
            format!("category: {category}"),
            header_text_style(app),
        )),
        Line::from(item_spans),
        Line::from(""),
        Line::from(Span::styled(
            PICKER_HELP.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    let popup = Popup::new(body_text)
        .title(Line::from(Span::styled(
            "EMOJI".to_string(),
            header_text_style(app),
        )))
        .border_style(border_style(app, true));
    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_template_picker(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(picker) = app.template_picker else {
        return;
    };
    let (category, templates) = TEMPLATE_CATEGORIES[picker.category];

    let mut lines = vec![Line::from(Span::styled(
        format!("category: {category}"),
        header_text_style(app),
    ))];
    for (index, template) in templates.iter().enumerate() {
        let style = if index == picker.index {
            selection_style(app)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(template.title.to_string(), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        templates[picker.index].content.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        PICKER_HELP.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Popup::new(Text::from(lines))
        .title(Line::from(Span::styled(
            "TEMPLATES".to_string(),
            header_text_style(app),
        )))
        .border_style(border_style(app, true));
    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_attach_menu(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(cursor) = app.attach_cursor else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    for (index, (kind, name, size)) in ATTACHMENT_STUBS.iter().enumerate() {
        let style = if index == cursor {
            selection_style(app)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{} ({}, {})",
                name,
                kind.title(),
                crate::chat::format_file_size(*size)
            ),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        ATTACH_HELP.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Popup::new(Text::from(lines))
        .title(Line::from(Span::styled(
            "ATTACH".to_string(),
            header_text_style(app),
        )))
        .border_style(border_style(app, true));
    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn draw_help_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(modal) = app.help_modal.as_ref() else {
        return;
    };

    // 2/3 width, 80% height, centered
    let width = area
        .width
        .saturating_mul(2)
        .saturating_div(3)
        .max(40)
        .min(area.width);
    let height = area
        .height
        .saturating_mul(4)
        .saturating_div(5)
        .max(10)
        .min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);

    let header_style = header_text_style(app);
    let border_s = border_style(app, true);

    let mut lines: Vec<Line> = Vec::new();
    for (section, entries) in help_entries(app) {
        lines.push(Line::from(Span::styled(section, header_style)));
        for (action, keys) in entries {
            lines.push(Line::from(format!("  {action:<20} {keys}")));
        }
        lines.push(Line::from(""));
    }

    let total = lines.len();
    let visible = height.saturating_sub(3) as usize;
    let scroll = modal.scroll.min(total.saturating_sub(visible.max(1)));
    let body: Vec<Line> = lines.into_iter().skip(scroll).take(visible).collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled("HELP", header_style))
        .title_bottom(Line::from(HELP_MODAL_FOOTER).alignment(Alignment::Right))
        .border_style(border_s);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    frame.render_widget(Paragraph::new(Text::from(body)), inner);
}

fn help_entries(app: &App) -> Vec<(String, Vec<(String, String)>)> {
    let keys = &app.config.keys;
    let join = |bindings: &[String]| bindings.join("/");
    vec![
        (
            "Global".to_string(),
            vec![
                ("quit".to_string(), join(&keys.global.quit)),
                ("next panel".to_string(), join(&keys.global.next_panel)),
                ("contact info".to_string(), join(&keys.global.contact_info)),
                ("errors".to_string(), join(&keys.global.notifications)),
                ("help".to_string(), join(&keys.global.help)),
            ],
        ),
        (
            "Contacts".to_string(),
            vec![
                ("navigate".to_string(), join(&keys.contacts.next)),
                ("edit tags".to_string(), join(&keys.contacts.tags)),
            ],
        ),
        (
            "Composer".to_string(),
            vec![
                ("send".to_string(), join(&keys.composer.send)),
                ("emoji picker".to_string(), join(&keys.composer.emoji)),
                ("templates".to_string(), join(&keys.composer.template)),
                ("attach".to_string(), join(&keys.composer.attach)),
                ("rewrite draft".to_string(), join(&keys.composer.assistant)),
                ("message actions".to_string(), "F6-F9".to_string()),
            ],
        ),
        (
            "Sections".to_string(),
            vec![
                ("switch tab".to_string(), join(&keys.sections.tab_next)),
                ("navigate".to_string(), join(&keys.sections.next)),
                ("fold/unfold".to_string(), join(&keys.sections.toggle)),
                ("grab".to_string(), join(&keys.sections.grab)),
                ("drop".to_string(), join(&keys.sections.drop)),
                ("cancel drag".to_string(), join(&keys.sections.cancel)),
                ("reset order".to_string(), join(&keys.sections.reset)),
            ],
        ),
    ]
}

// =============================================================================
// Styles
// =============================================================================

fn selection_style(app: &App) -> Style {
    Style::default()
        .bg(color(app.ui_colors().selection_bg))
        .fg(color(app.ui_colors().selection_fg))
}

fn border_style(app: &App, active: bool) -> Style {
    if active {
        Style::default().fg(color(app.ui_colors().accent))
    } else {
        Style::default().fg(color(app.ui_colors().border))
    }
}

fn header_text_style(app: &App) -> Style {
    Style::default()
        .fg(color(app.ui_colors().accent))
        .add_modifier(Modifier::BOLD)
}

fn status_style(app: &App) -> Style {
    Style::default()
        .fg(color(app.ui_colors().status_fg))
        .bg(color(app.ui_colors().status_bg))
}

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
