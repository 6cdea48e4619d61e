use crate::internal::ui::keybindings::{Command, KeyBindingContext, KeyBindingMap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();

    add_global_bindings(&mut map);
    add_list_bindings(&mut map);

    map
}

fn add_global_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Global;

    map.add_binding(ctx, key('?'), Command::ToggleHelp);
    map.add_binding(ctx, key('q'), Command::Quit);
    map.add_binding(ctx, ctrl('c'), Command::Quit);
    map.add_binding(ctx, key('L'), Command::ToggleLogs);

    // Navigation
    map.add_binding(ctx, key('j'), Command::NavigateDown);
    map.add_binding(ctx, key('k'), Command::NavigateUp);
    map.add_binding(ctx, key_code(KeyCode::Down), Command::NavigateDown);
    map.add_binding(ctx, key_code(KeyCode::Up), Command::NavigateUp);
}

fn add_list_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::List;

    map.add_binding(ctx, key('a'), Command::Add);
    map.add_binding(ctx, key('e'), Command::Edit);
    map.add_binding(ctx, key_code(KeyCode::Enter), Command::Edit);
    map.add_binding(ctx, key('d'), Command::Delete);
    map.add_binding(ctx, key_code(KeyCode::Delete), Command::Delete);
    map.add_binding(ctx, key('r'), Command::Refresh);
    map.add_binding(ctx, key('o'), Command::OpenImage);
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_crud() {
        let map = create_default_keybindings();
        let ctx = KeyBindingContext::List;
        assert_eq!(map.get_command(&key('a'), ctx), Some(Command::Add));
        assert_eq!(map.get_command(&key('e'), ctx), Some(Command::Edit));
        assert_eq!(map.get_command(&key('d'), ctx), Some(Command::Delete));
        assert_eq!(map.get_command(&key('r'), ctx), Some(Command::Refresh));
        assert_eq!(map.get_command(&ctrl('c'), ctx), Some(Command::Quit));
    }
}
