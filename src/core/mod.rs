// src/core/mod.rs
//! Core services shared by every view: HTTP client, token persistence, configuration

pub mod api_client;
pub mod config_manager;
pub mod token_store;

pub use api_client::ApiClient;
pub use config_manager::ConfigManager;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
