pub mod editor;
pub mod editor_handlers;
pub mod editor_ui;
