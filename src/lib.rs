//! Stockwatch Web Library
//!
//! Cookie-session authentication and watch-list storage for the stock
//! monitor front end. The binary in `main.rs` only loads config and serves
//! `App::router()`.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod watches;

pub use app::App;
pub use config::Config;
pub use db::Database;
