pub mod auth;
pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
pub mod types;
pub mod utils;
pub mod views;

pub use auth::{AuthSession, AuthState};
pub use crate::core::{ApiClient, ConfigManager, FileTokenStore, MemoryTokenStore, TokenStore};
pub use error::{ApiError, ApiResult};
