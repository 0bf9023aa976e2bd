// Library interface for the RepDeck feed client
pub mod api;
pub mod app;
pub mod config;
pub mod feed;

#[macro_use]
pub mod logging;

pub mod server_config;
pub mod terminal;
pub mod ui;
