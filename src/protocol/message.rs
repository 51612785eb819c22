use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// An inbound request envelope: `id` correlates the eventual response,
/// `method` is the dotted command name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    /// Strict decode, used after the classifier has already vouched for
    /// the shape. Returns `None` for anything malformed.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// A named string parameter, when present.
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.as_ref()?.get(name)?.as_str()
    }

    /// A named integer parameter, when present.
    pub fn u64_param(&self, name: &str) -> Option<u64> {
        self.params.as_ref()?.get(name)?.as_u64()
    }

    /// A named boolean parameter, when present.
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        self.params.as_ref()?.get(name)?.as_bool()
    }
}

/// Successful response envelope for a request id.
pub fn response_ok(id: u64, result: Value) -> Value {
    json!({ "id": id, "result": result })
}

/// Error response envelope for a request id.
pub fn response_err(id: u64, message: &str) -> Value {
    json!({ "id": id, "error": { "message": message } })
}
