//! HTTP client for the research backend API

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::types::{Capability, HealthResponse};
use crate::config;

/// Failure of a single backend call.
///
/// HTTP and transport failures display as the capability's fixed message so
/// the user never sees status codes or response bodies.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", .capability.failure_message())]
    Status { capability: Capability, status: u16 },
    #[error("{}", .capability.failure_message())]
    Transport {
        capability: Capability,
        #[source]
        source: reqwest::Error,
    },
    #[error("Malformed response: missing \"{field}\"")]
    MalformedResponse {
        capability: Capability,
        field: &'static str,
    },
    #[error("Backend health check failed: {0}")]
    Health(#[source] reqwest::Error),
}

/// Client for communicating with the research backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// `api_base` is either `{origin}/api` or the relative `/api`
    pub fn new(api_base: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: config::absolute_base(api_base),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn origin(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    pub async fn search(&self, query: &str) -> Result<String, ClientError> {
        self.invoke(Capability::Search, query).await
    }

    pub async fn read(&self, url: &str) -> Result<String, ClientError> {
        self.invoke(Capability::Read, url).await
    }

    pub async fn research(&self, topic: &str) -> Result<String, ClientError> {
        self.invoke(Capability::Research, topic).await
    }

    pub async fn summarize(&self, url: &str) -> Result<String, ClientError> {
        self.invoke(Capability::Summarize, url).await
    }

    pub async fn graph(&self, topic: &str) -> Result<String, ClientError> {
        self.invoke(Capability::Graph, topic).await
    }

    /// POST `{field: input}` to the capability endpoint and unwrap its result field
    pub async fn invoke(&self, capability: Capability, input: &str) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, capability.path());
        tracing::debug!("POST {} ({})", url, capability);

        let response = self
            .client
            .post(&url)
            .json(&capability.request_body(input))
            .send()
            .await
            .map_err(|source| {
                tracing::warn!("{} request failed: {}", capability, source);
                ClientError::Transport { capability, source }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", capability, status);
            return Err(ClientError::Status {
                capability,
                status: status.as_u16(),
            });
        }

        let field = capability.response_field();
        let body: Value = response.json().await.map_err(|e| {
            tracing::warn!("{} returned an undecodable body: {}", capability, e);
            ClientError::MalformedResponse { capability, field }
        })?;

        extract_field(capability, body)
    }

    /// Check if backend is healthy
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/", self.origin());
        self.client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ClientError::Health)?
            .json()
            .await
            .map_err(ClientError::Health)
    }
}

fn extract_field(capability: Capability, body: Value) -> Result<String, ClientError> {
    let field = capability.response_field();
    match body {
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::String(value)) => Ok(value),
            _ => Err(ClientError::MalformedResponse { capability, field }),
        },
        _ => Err(ClientError::MalformedResponse { capability, field }),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    /// Serve `router` on an ephemeral port and return its origin
    pub(crate) async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    /// Every endpoint answers `{<response field>: "X"}` when the request carries the
    /// expected field, and 400 otherwise.
    fn echo_router() -> Router {
        Capability::ALL.into_iter().fold(Router::new(), |router, capability| {
            router.route(
                &format!("/api{}", capability.path()),
                post(move |Json(body): Json<Value>| async move {
                    if body.get(capability.request_field()).and_then(Value::as_str) == Some("input") {
                        Ok(Json(json!({ capability.response_field(): "X" })))
                    } else {
                        Err(StatusCode::BAD_REQUEST)
                    }
                }),
            )
        })
    }

    fn failing_router() -> Router {
        Capability::ALL.into_iter().fold(Router::new(), |router, capability| {
            router.route(
                &format!("/api{}", capability.path()),
                post(move || async move {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "detail": "upstream exploded", capability.response_field(): "X" })),
                    )
                }),
            )
        })
    }

    async fn call(client: &BackendClient, capability: Capability) -> Result<String, ClientError> {
        match capability {
            Capability::Search => client.search("input").await,
            Capability::Read => client.read("input").await,
            Capability::Research => client.research("input").await,
            Capability::Summarize => client.summarize("input").await,
            Capability::Graph => client.graph("input").await,
        }
    }

    #[tokio::test]
    async fn test_each_capability_returns_its_field() {
        let origin = spawn_backend(echo_router()).await;
        let client = BackendClient::new(&config::api_base(Some(&origin)));

        for capability in Capability::ALL {
            assert_eq!(call(&client, capability).await.unwrap(), "X", "{}", capability);
        }
    }

    #[tokio::test]
    async fn test_non_ok_status_yields_fixed_message() {
        let origin = spawn_backend(failing_router()).await;
        let client = BackendClient::new(&config::api_base(Some(&origin)));

        for capability in Capability::ALL {
            let err = call(&client, capability).await.unwrap_err();
            assert!(matches!(err, ClientError::Status { status: 500, .. }));
            assert_eq!(err.to_string(), capability.failure_message());
        }
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let router = Router::new().route(
            "/api/research",
            post(|| async { Json(json!({ "result": "wrong key" })) }),
        );
        let origin = spawn_backend(router).await;
        let client = BackendClient::new(&config::api_base(Some(&origin)));

        let err = client.research("topic").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::MalformedResponse { field: "report", .. }
        ));
        assert_eq!(err.to_string(), "Malformed response: missing \"report\"");
    }

    #[tokio::test]
    async fn test_non_string_field_is_malformed() {
        let router = Router::new().route(
            "/api/graph",
            post(|| async { Json(json!({ "graph": null })) }),
        );
        let origin = spawn_backend(router).await;
        let client = BackendClient::new(&config::api_base(Some(&origin)));

        assert!(matches!(
            client.graph("topic").await,
            Err(ClientError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_capability_message() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BackendClient::new(&format!("http://{}/api", addr));
        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert_eq!(err.to_string(), "Failed to search");
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = Router::new().route(
            "/",
            get(|| async { Json(json!({ "status": "ok", "message": "running" })) }),
        );
        let origin = spawn_backend(router).await;
        let client = BackendClient::new(&config::api_base(Some(&origin)));

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.message, "running");
    }

    #[test]
    fn test_relative_base_resolves_to_default_origin() {
        let client = BackendClient::new("/api");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000/api");
        assert_eq!(client.origin(), "http://127.0.0.1:8000");
    }
}
