use serde::Deserialize;
use serde_json::Value;

/// Body of a rejected request. FastAPI puts a string in `detail` for
/// explicit errors and a list of objects for validation failures.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(msg)) if !msg.is_empty() => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
