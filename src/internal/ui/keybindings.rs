use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::Display;

/// Commands a key can be bound to in the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Command {
    Quit,
    NavigateUp,
    NavigateDown,
    Add,
    Edit,
    Delete,
    Refresh,
    OpenImage,
    ToggleHelp,
    ToggleLogs,
}

/// Represents a view mode for context-specific keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBindingContext {
    Global,
    List,
}

/// Maps key events to commands
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    global: HashMap<KeyEvent, Command>,
    list: HashMap<KeyEvent, Command>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the command for a given key event in a specific context
    /// Checks context-specific bindings first, then falls back to global
    pub fn get_command(&self, key: &KeyEvent, context: KeyBindingContext) -> Option<Command> {
        let context_map = match context {
            KeyBindingContext::Global => &self.global,
            KeyBindingContext::List => &self.list,
        };

        if let Some(command) = context_map.get(&normalize(key)) {
            return Some(*command);
        }

        self.global.get(&normalize(key)).copied()
    }

    pub fn add_binding(&mut self, context: KeyBindingContext, key: KeyEvent, command: Command) {
        let map = match context {
            KeyBindingContext::Global => &mut self.global,
            KeyBindingContext::List => &mut self.list,
        };
        map.insert(normalize(&key), command);
    }

    /// Merge custom list bindings from configuration
    pub fn merge_config(&mut self, bindings: &HashMap<String, Command>) {
        for (key_str, command) in bindings {
            match parse_key_str(key_str) {
                Some(key_event) => self.add_binding(KeyBindingContext::List, key_event, *command),
                None => tracing::warn!("Invalid key string in config: {}", key_str),
            }
        }
    }

    /// Keys bound to `command` in the list view, for help and status hints.
    pub fn keys_for(&self, command: Command) -> Vec<String> {
        let mut keys: Vec<String> = self
            .list
            .iter()
            .chain(self.global.iter())
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| describe_key(k))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

// Terminals disagree on whether uppercase letters carry SHIFT; compare without it.
fn normalize(key: &KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code
        && c.is_ascii_uppercase()
    {
        modifiers.remove(KeyModifiers::SHIFT);
    }
    KeyEvent::new(key.code, modifiers)
}

pub fn describe_key(key: &KeyEvent) -> String {
    let mut parts = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl".to_string());
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt".to_string());
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift".to_string());
    }
    let code = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        other => format!("{:?}", other),
    };
    parts.push(code);
    parts.join("+")
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "Esc", "Up", "Down", "Left", "Right"
/// - With modifiers: "Ctrl+R", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();

    let mut modifiers = KeyModifiers::empty();
    let key_part = match parts.split_last() {
        Some((last, mods)) => {
            for modifier in mods {
                match modifier.to_lowercase().as_str() {
                    "ctrl" => modifiers |= KeyModifiers::CONTROL,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    _ => return None,
                }
            }
            *last
        }
        None => return None,
    };

    let code = match key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "Esc" => KeyCode::Esc,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Backspace" => KeyCode::Backspace,
        "Delete" => KeyCode::Delete,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
