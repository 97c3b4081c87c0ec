//! Shared types for backend communication

use serde::Deserialize;
use std::fmt;

/// A backend operation: where it lives and how its payloads are keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Search,
    Read,
    Research,
    Summarize,
    Graph,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Search,
        Capability::Read,
        Capability::Research,
        Capability::Summarize,
        Capability::Graph,
    ];

    /// Endpoint path relative to the API base
    pub fn path(self) -> &'static str {
        match self {
            Capability::Search => "/search",
            Capability::Read => "/read",
            Capability::Research => "/research",
            Capability::Summarize => "/summarize",
            Capability::Graph => "/graph",
        }
    }

    /// Key of the single field in the request body
    pub fn request_field(self) -> &'static str {
        match self {
            Capability::Search => "query",
            Capability::Read | Capability::Summarize => "url",
            Capability::Research | Capability::Graph => "topic",
        }
    }

    /// Key of the field holding the result in the response body
    pub fn response_field(self) -> &'static str {
        match self {
            Capability::Search => "result",
            Capability::Read => "content",
            Capability::Research => "report",
            Capability::Summarize => "summary",
            Capability::Graph => "graph",
        }
    }

    /// Fixed message shown when the call fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Capability::Search => "Failed to search",
            Capability::Read => "Failed to read URL",
            Capability::Research => "Failed to perform research",
            Capability::Summarize => "Failed to summarize URL",
            Capability::Graph => "Failed to generate graph",
        }
    }

    /// CLI verb
    pub fn name(self) -> &'static str {
        match self {
            Capability::Search => "search",
            Capability::Read => "read",
            Capability::Research => "research",
            Capability::Summarize => "summarize",
            Capability::Graph => "graph",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// `{ <request field>: <input> }`
    pub fn request_body(self, input: &str) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(
            self.request_field().to_string(),
            serde_json::Value::String(input.to_string()),
        );
        serde_json::Value::Object(body)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Body of `GET /` on the backend
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_uses_capability_field() {
        assert_eq!(
            Capability::Search.request_body("rust vs go"),
            serde_json::json!({ "query": "rust vs go" })
        );
        assert_eq!(
            Capability::Summarize.request_body("https://example.com"),
            serde_json::json!({ "url": "https://example.com" })
        );
        assert_eq!(
            Capability::Graph.request_body("Quantum Physics"),
            serde_json::json!({ "topic": "Quantum Physics" })
        );
    }

    #[test]
    fn test_from_name() {
        for capability in Capability::ALL {
            assert_eq!(Capability::from_name(capability.name()), Some(capability));
        }
        assert_eq!(Capability::from_name("chat"), None);
    }
}
