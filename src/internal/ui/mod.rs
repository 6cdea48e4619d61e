pub mod app;
pub mod keybindings;
pub mod keybindings_default;
pub mod log_viewer;
pub mod view;
