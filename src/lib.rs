pub mod api;
pub mod app;
pub mod config;
pub mod download;
pub mod error;
pub mod mcq;
pub mod preview;
pub mod session;
pub mod status;
pub mod upload;
pub mod utils;
