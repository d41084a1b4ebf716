pub mod client;
pub mod error;
pub mod models;

pub use client::{BotClient, ConsoleClient};
pub use error::ApiError;
