pub mod api;
pub mod app;
pub mod bot_chat;
pub mod console;
pub mod echo;
pub mod ui;
pub mod utils;
