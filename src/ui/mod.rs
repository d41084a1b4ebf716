pub mod bot_view;
pub mod bubble;
pub mod chat_view;
pub mod main_window;
pub mod setup;
pub mod sidebar;
pub mod style;
