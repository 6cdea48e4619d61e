use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Tabs, Wrap};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File prefix used by the rolling appender in `main`.
pub const LOG_FILE_PREFIX: &str = "pot-admin.log";

const MAX_LINES: usize = 1000;
const VISIBLE_LINES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub module: String,
    pub message: String,
}

/// Overlay that tails today's log file, so transport errors are visible in-app.
pub struct LogViewer {
    pub visible: bool,
    pub entries: Vec<LogEntry>,
    pub scroll: u16,
    pub active_tab: usize,
    pub tabs: Vec<String>,
    pub log_path: String,
}

impl LogViewer {
    pub fn new(log_dir: String) -> Self {
        Self {
            visible: false,
            entries: Vec::new(),
            scroll: 0,
            active_tab: 0,
            tabs: vec!["All".to_string(), "Problems".to_string()],
            log_path: log_dir,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.load_logs();
            // Auto-scroll to bottom when opening
            self.scroll_to_bottom();
        }
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
        self.scroll_to_bottom();
    }

    /// Path of today's file as written by tracing-appender's daily rotation.
    pub fn todays_file(&self) -> PathBuf {
        let date_str = jiff::Zoned::now()
            .with_time_zone(jiff::tz::TimeZone::UTC)
            .strftime("%Y-%m-%d")
            .to_string();
        Path::new(&self.log_path).join(format!("{}.{}", LOG_FILE_PREFIX, date_str))
    }

    pub fn load_logs(&mut self) {
        let path = self.todays_file();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(_) => return,
        };

        // Read all, keep the tail
        let lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();
        self.load_lines(&lines);
    }

    pub fn load_lines(&mut self, lines: &[String]) {
        let (Ok(line_re), Ok(ansi_re)) = (
            // Example: 2025-11-29T09:30:15.123456Z  INFO pot_admin::internal::manager: Added pot
            Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d+Z)\s+(\w+)\s+([^:\s]+(?:::[^:\s]+)*):\s+(.*)$"),
            Regex::new(r"\x1b\[[0-9;]*m"),
        ) else {
            return;
        };

        let skip = lines.len().saturating_sub(MAX_LINES);
        self.entries = lines
            .iter()
            .skip(skip)
            .map(|line| {
                let clean_line = ansi_re.replace_all(line, "").to_string();
                match line_re.captures(&clean_line) {
                    Some(caps) => LogEntry {
                        timestamp: caps[1].to_string(),
                        level: caps[2].to_string(),
                        module: caps[3].to_string(),
                        message: caps[4].to_string(),
                    },
                    // e.g. panic traces
                    None => LogEntry {
                        timestamp: String::new(),
                        level: "UNKNOWN".to_string(),
                        module: String::new(),
                        message: clean_line,
                    },
                }
            })
            .collect();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.filtered_entries().len().saturating_sub(1) as u16;
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_to_bottom(&mut self) {
        let count = self.filtered_entries().len();
        self.scroll = count.saturating_sub(VISIBLE_LINES) as u16;
    }

    pub fn filtered_entries(&self) -> Vec<&LogEntry> {
        match self.active_tab {
            0 => self.entries.iter().collect(),
            1 => self
                .entries
                .iter()
                .filter(|e| e.level == "WARN" || e.level == "ERROR")
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        if !self.visible {
            return;
        }

        // Center the overlay (90% width, 80% height)
        let width = area.width * 90 / 100;
        let height = area.height * 80 / 100;
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let overlay_area = Rect::new(x, y, width, height);
        f.render_widget(Clear, overlay_area);

        let outer_block = Block::default()
            .borders(Borders::ALL)
            .title("Log Viewer (Tab: Switch, Esc: Close)");
        f.render_widget(outer_block.clone(), overlay_area);

        let inner_area = outer_block.inner(overlay_area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Separator Line
                Constraint::Min(0),    // Logs Content
            ])
            .split(inner_area);

        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|t| Line::from(Span::styled(t, Style::default().fg(Color::Green))))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.active_tab)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" | ")
            .block(Block::default().padding(Padding::horizontal(1)));
        f.render_widget(tabs, chunks[0]);

        // Separator spans the full overlay width so it meets the borders with T-junctions
        let separator_area = Rect::new(overlay_area.x, chunks[1].y, overlay_area.width, 1);
        let border_set = symbols::border::Set {
            top_left: symbols::line::VERTICAL_RIGHT,
            top_right: symbols::line::VERTICAL_LEFT,
            ..symbols::border::PLAIN
        };
        let separator_block = Block::default()
            .borders(Borders::TOP)
            .border_set(border_set)
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(separator_block, separator_area);

        let filtered_entries = self.filtered_entries();
        let log_lines: Vec<Line> = match filtered_entries.is_empty() {
            true => vec![Line::from(Span::styled(
                format!("No log entries in {}", self.todays_file().display()),
                Style::default().fg(Color::DarkGray),
            ))],
            false => filtered_entries
                .iter()
                .skip(self.scroll as usize)
                .map(|entry| {
                    let level_style = match entry.level.as_str() {
                        "ERROR" => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        "WARN" => Style::default().fg(Color::Yellow),
                        "INFO" => Style::default().fg(Color::Blue),
                        "DEBUG" => Style::default().fg(Color::Green),
                        "TRACE" => Style::default().fg(Color::Magenta),
                        _ => Style::default(),
                    };

                    Line::from(vec![
                        Span::styled(
                            format!("{} ", entry.timestamp),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(format!("{:5} ", entry.level), level_style),
                        Span::styled(
                            format!("{}: ", entry.module),
                            Style::default().fg(Color::Cyan),
                        ),
                        Span::raw(entry.message.as_str()),
                    ])
                })
                .collect(),
        };

        let logs = Paragraph::new(log_lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().padding(Padding::horizontal(1)));

        f.render_widget(logs, chunks[2]);
    }
}
