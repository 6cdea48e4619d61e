use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use super::app::{App, InputMode};
use super::keybindings::{Command, KeyBindingMap};
use crate::config::BackendKind;
use crate::internal::notification::NotificationType;
use crate::internal::sync::SyncBackend;
use crate::utils::url::image_host;

/// Empty-list hint naming whichever key is bound to Add.
pub fn empty_state_message(keybindings: &KeyBindingMap) -> String {
    match keybindings.keys_for(Command::Add).first() {
        Some(key) => format!("No pots yet. Press '{}' to add one.", key),
        None => "No pots yet.".to_string(),
    }
}

const ACCENT: Color = Color::Cyan;
const MUTED: Color = Color::DarkGray;

pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_top_bar(app, f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_list(app, f, body[0]);
    render_detail(app, f, body[1]);
    render_status_bar(app, f, chunks[2]);

    match app.input_mode() {
        InputMode::Form => render_form_overlay(app, f),
        InputMode::Confirm => render_confirm_overlay(app, f),
        InputMode::Normal => {}
    }

    if app.notification.is_some() {
        render_notification(app, f);
    }

    if app.show_help {
        render_help_overlay(app, f);
    }

    if app.log_viewer.visible {
        let area = f.area();
        app.log_viewer.render(f, area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4)).max(1);
    let height = height.min(area.height).max(1);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_top_bar(app: &App, f: &mut Frame, area: Rect) {
    let source = match app.manager.backend() {
        SyncBackend::Remote(api) => format!("Remote: {}", api.base_url()),
        SyncBackend::Local => "Local: in-memory".to_string(),
    };
    let title = format!(" Pot Admin v{}  |  {}", app.app_version, source);

    let p = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Left);
    f.render_widget(p, area);
}

fn render_list(app: &mut App, f: &mut Frame, area: Rect) {
    let store = &app.manager.store;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Pots ({}) ", store.len()))
        .border_style(Style::default().fg(ACCENT));

    // Empty state
    if store.is_empty() {
        let text = match app.manager.is_fetching() {
            true => "Loading pots...".to_string(),
            false => empty_state_message(&app.keybindings),
        };
        let p = Paragraph::new(text)
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(block.padding(Padding::top(area.height.saturating_sub(3) / 2)));
        f.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = store
        .pots()
        .iter()
        .map(|pot| {
            let mut spans = vec![
                Span::styled(
                    pot.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("[{}]", pot.category), Style::default().fg(ACCENT)),
            ];
            if !pot.price.is_blank() {
                spans.push(Span::raw(format!("  ₹{}", pot.price)));
            }
            if let Some(op) = store.pending(&pot.id) {
                spans.push(Span::styled(
                    format!("  ({})", op.label()),
                    Style::default().fg(Color::Yellow),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .border_style(Style::default().fg(MUTED))
        .padding(Padding::horizontal(1));

    let Some(pot) = app.selected_pot() else {
        f.render_widget(block, area);
        return;
    };

    let label = |text: &'static str| Span::styled(text, Style::default().fg(MUTED));
    let mut lines = vec![
        Line::from(vec![label("Name:        "), Span::raw(pot.name.as_str())]),
        Line::from(vec![label("Category:    "), Span::raw(pot.category.as_str())]),
    ];

    // Local pots only carry name and category
    if app.manager.backend().kind() == BackendKind::Remote {
        lines.push(Line::from(vec![
            label("Price:       "),
            Span::raw(format!("₹{}", pot.price)),
        ]));
        let host = image_host(&pot.image).unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(vec![label("Image host:  "), Span::raw(host)]));
        lines.push(Line::from(vec![
            label("Image URL:   "),
            Span::raw(pot.image.as_str()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(label("Description")));
        lines.push(Line::from(pot.description.as_str()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("id {}", pot.id),
        Style::default().fg(MUTED),
    )));

    let p = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn render_form_overlay(app: &App, f: &mut Frame) {
    let manager = &app.manager;
    let form = &manager.form;
    let fields = form.fields();
    let popup_area = centered(f.area(), 64, fields.len() as u16 + 6);

    let focused = form.focused();
    let mut lines: Vec<Line> = fields
        .iter()
        .map(|field| {
            let is_focused = Some(*field) == focused;
            let marker = match is_focused {
                true => "▸ ",
                false => "  ",
            };
            let value_style = match is_focused {
                true => Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::UNDERLINED),
                false => Style::default(),
            };
            let cursor = match is_focused {
                true => "▏",
                false => "",
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::styled(format!("{:<12}", field.to_string()), Style::default().fg(MUTED)),
                Span::styled(form.value(*field).to_string(), value_style),
                Span::styled(cursor, Style::default().fg(ACCENT)),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑↓: Field | Enter: Save | Esc: Cancel",
        Style::default().fg(MUTED),
    )));

    let title = match manager.is_submitting() {
        true => format!(" {} (saving…) ", manager.modal.title()),
        false => format!(" {} ", manager.modal.title()),
    };

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(ACCENT))
            .padding(Padding::horizontal(1)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn render_confirm_overlay(app: &App, f: &mut Frame) {
    let Some(request) = app.manager.confirmation() else {
        return;
    };
    let prompt = request.prompt();
    let popup_area = centered(f.area(), prompt.chars().count() as u16 + 6, 5);

    let popup = Paragraph::new(vec![
        Line::from(prompt),
        Line::from(Span::styled(
            "y/Enter: Delete | n/Esc: Cancel",
            Style::default().fg(MUTED),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm delete ")
            .border_style(Style::default().fg(Color::Red)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

fn render_status_bar(app: &App, f: &mut Frame, area: Rect) {
    let status = match (app.input_mode(), app.loading_description()) {
        (InputMode::Form, _) => "Editing | Enter: Save | Esc: Cancel".to_string(),
        (InputMode::Confirm, _) => "Confirm delete | y: Yes | n: No".to_string(),
        (InputMode::Normal, Some(desc)) => format!("{} {}", app.get_spinner_char(), desc),
        (InputMode::Normal, None) => {
            let hint = |command: Command, label: &str| -> Option<String> {
                app.keybindings
                    .keys_for(command)
                    .first()
                    .map(|key| format!("{}: {}", key, label))
            };
            [
                hint(Command::Add, "Add"),
                hint(Command::Edit, "Edit"),
                hint(Command::Delete, "Delete"),
                hint(Command::Refresh, "Refresh"),
                hint(Command::OpenImage, "Image"),
                hint(Command::ToggleHelp, "Help"),
                hint(Command::Quit, "Quit"),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" | ")
        }
    };

    let p = Paragraph::new(status).style(Style::default().fg(Color::White).bg(MUTED));
    f.render_widget(p, area);
}

fn render_notification(app: &App, f: &mut Frame) {
    if let Some(notification) = &app.notification {
        // Sits just above the status bar so it never hides the form
        let area = f.area();
        let width = (notification.message.chars().count() as u16 + 4)
            .min(area.width.saturating_sub(4));
        let height = 3.min(area.height);
        let popup_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height + 1),
            width,
            height,
        );

        let bg_color = match notification.notification_type {
            NotificationType::Info => Color::Blue,
            NotificationType::Warning => Color::Yellow,
            NotificationType::Error => Color::Red,
        };

        let popup = Paragraph::new(notification.message.as_str())
            .style(
                Style::default()
                    .bg(bg_color)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(notification.notification_type.title()),
            )
            .alignment(Alignment::Center);

        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }
}

fn render_help_overlay(app: &App, f: &mut Frame) {
    let rows = [
        (Command::NavigateDown, "Next pot"),
        (Command::NavigateUp, "Previous pot"),
        (Command::Add, "Add a pot"),
        (Command::Edit, "Edit selected pot"),
        (Command::Delete, "Delete selected pot"),
        (Command::Refresh, "Reload from server"),
        (Command::OpenImage, "Open image URL in browser"),
        (Command::ToggleLogs, "Show logs"),
        (Command::ToggleHelp, "Toggle this help"),
        (Command::Quit, "Quit"),
    ];

    let lines: Vec<Line> = rows
        .iter()
        .map(|(command, description)| {
            let keys = app.keybindings.keys_for(*command).join(", ");
            Line::from(vec![
                Span::styled(format!("{:<16}", keys), Style::default().fg(ACCENT)),
                Span::raw(*description),
            ])
        })
        .collect();

    let popup_area = centered(f.area(), 56, rows.len() as u16 + 2);
    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (Esc to close) ")
            .padding(Padding::horizontal(1)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}
