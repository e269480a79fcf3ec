//! Chatbot studio API: library crate for the REST server.
//!
//! Exposes all modules so the binary (`main.rs`) and `cb-e2e-tests`
//! can reach `AppState`, `build_router` and the intent resolvers.

pub mod auth;
pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod events;
pub mod inference;
pub mod routes;
pub mod seed;
pub mod state;
pub mod widget;
