pub mod aggregate;
pub mod config;
pub mod http_client;
pub mod match_fetch;
pub mod pgn;
pub mod pipeline;
pub mod player;
pub mod report;
pub mod time_window;
