//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for the greeting endpoint (GET /hello)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HelloQuery {
    /// Who to greet, defaults to "world"
    #[serde(default)]
    pub name: Option<String>,
}

impl HelloQuery {
    /// Returns the name to greet, falling back to "world" when absent or empty.
    pub fn name_or_default(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => "world",
        }
    }
}
