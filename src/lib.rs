// Public API for integration tests and potential library usage

pub mod auth;
pub mod broadcast;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod intake;
pub mod matcher;
pub mod orchestrator;
pub mod protocol;
pub mod scoreboard;
pub mod services;
pub mod session;
pub mod state;
pub mod types;
pub mod ws;
