//! Client logic for the bloglist API.
//!
//! Everything a front-end needs lives here: the HTTP clients, the persisted
//! session slot, and the application state the views read from. Front-ends
//! drive an [`app::App`] and render its [`app::AppState`].

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
