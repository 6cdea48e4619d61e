use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pot_admin::config::{AppConfig, BackendKind};
use pot_admin::internal::ui::app::App;
use pot_admin::internal::ui::log_viewer::LogViewer;
use pot_admin::internal::ui::keybindings::{Command, KeyBindingContext, KeyBindingMap};
use pot_admin::internal::ui::view::empty_state_message;
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

const DEFAULT_EMPTY: &str = "No pots yet. Press 'a' to add one.";

fn local_app() -> App {
    let config = AppConfig {
        backend: BackendKind::Local,
        ..Default::default()
    };
    App::new(config).unwrap()
}

fn render(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| app.ui(f)).unwrap();
    buffer_text(terminal.backend().buffer())
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key_event(KeyEvent::new(code, KeyModifiers::empty()));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

#[test]
fn test_empty_list_shows_hint() {
    let mut app = local_app();
    let screen = render(&mut app);
    assert!(screen.contains(DEFAULT_EMPTY));
    assert!(screen.contains("Local: in-memory"));
}

#[test]
fn test_empty_hint_follows_rebound_add_key() {
    let mut app = local_app();
    let mut keybindings = KeyBindingMap::new();
    keybindings.add_binding(
        KeyBindingContext::List,
        KeyEvent::new(KeyCode::Char('n'), KeyModifiers::empty()),
        Command::Add,
    );
    app.keybindings = keybindings;

    let screen = render(&mut app);
    assert!(screen.contains("No pots yet. Press 'n' to add one."));
    assert!(screen.contains(&empty_state_message(&app.keybindings)));

    press(&mut app, KeyCode::Char('n'));
    assert!(app.manager.modal.is_open());
}

#[test]
fn test_add_edit_delete_through_keys() {
    let mut app = local_app();

    // Add
    press(&mut app, KeyCode::Char('a'));
    let screen = render(&mut app);
    assert!(screen.contains("Add Pot"));
    type_text(&mut app, "Terracotta");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Clay");
    press(&mut app, KeyCode::Enter);

    let screen = render(&mut app);
    assert!(screen.contains("Terracotta"));
    assert!(screen.contains("[Clay]"));
    assert!(screen.contains("Pot added!"));
    assert!(!screen.contains(DEFAULT_EMPTY));

    // Edit keeps the id and merges the new name
    let id = app.selected_pot().unwrap().id.clone();
    press(&mut app, KeyCode::Char('e'));
    let screen = render(&mut app);
    assert!(screen.contains("Edit Pot"));
    for _ in 0.."Terracotta".len() {
        press(&mut app, KeyCode::Backspace);
    }
    type_text(&mut app, "Urn");
    press(&mut app, KeyCode::Enter);

    let screen = render(&mut app);
    assert!(screen.contains("Urn"));
    assert!(!screen.contains("Terracotta"));
    assert_eq!(app.selected_pot().unwrap().id, id);

    // Delete asks first
    press(&mut app, KeyCode::Char('d'));
    let screen = render(&mut app);
    assert!(screen.contains("Delete \"Urn\"?"));
    press(&mut app, KeyCode::Char('y'));

    let screen = render(&mut app);
    assert!(screen.contains(DEFAULT_EMPTY));
    assert!(screen.contains("Pot deleted!"));
}

#[test]
fn test_missing_fields_warn_and_keep_form() {
    let mut app = local_app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Lonely");
    press(&mut app, KeyCode::Enter);

    let screen = render(&mut app);
    assert!(screen.contains("All fields are required"));
    assert!(screen.contains("Add Pot"));
    assert!(screen.contains("Lonely"));
}

#[test]
fn test_help_overlay_lists_bindings() {
    let mut app = local_app();
    press(&mut app, KeyCode::Char('?'));
    let screen = render(&mut app);
    assert!(screen.contains("Help (Esc to close)"));
    assert!(screen.contains("Add a pot"));
}

#[test]
fn test_log_viewer_render_empty() {
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    let mut log_viewer = LogViewer::new("does-not-exist".to_string());
    log_viewer.visible = true;

    terminal
        .draw(|f| {
            let area = f.area();
            log_viewer.render(f, area);
        })
        .unwrap();

    let screen = buffer_text(terminal.backend().buffer());
    assert!(screen.contains("Log Viewer"));
    assert!(screen.contains("No log entries"));
}
