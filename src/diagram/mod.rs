//! Mind map rendering
//!
//! Backend graph results are Mermaid source, raw or wrapped in a fenced code
//! block. The source is extracted, rendered to SVG by a [`DiagramRenderer`],
//! and any failure is turned into a visible placeholder here instead of
//! reaching the shell's error state.

pub mod mmdc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Shown in place of a diagram that failed to render
pub const RENDER_FAILED: &str = "Failed to render graph. Invalid syntax?";

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:mermaid)?\s*([\s\S]*?)```").expect("fence pattern is valid"));

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("renderer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("diagram i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize render config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Fixed Mermaid configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub start_on_load: bool,
    pub theme: &'static str,
    pub security_level: &'static str,
    pub font_family: &'static str,
}

static RENDER_CONFIG: Lazy<RenderConfig> = Lazy::new(|| {
    tracing::debug!("initializing diagram render config");
    RenderConfig {
        start_on_load: false,
        theme: "neutral",
        security_level: "loose",
        font_family: "inherit",
    }
});

/// Process-wide render configuration, initialized on first use
pub fn render_config() -> &'static RenderConfig {
    &RENDER_CONFIG
}

/// Turns Mermaid source into SVG markup
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render(&self, id: &str, source: &str) -> Result<String, DiagramError>;

    /// Confirm the renderer can run at all
    async fn check(&self) -> Result<(), DiagramError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramOutput {
    Svg(String),
    Failed,
}

/// Pull the diagram source out of a backend result.
///
/// The interior of the first fenced block wins; without one, stray fence
/// markers are stripped from the whole text.
pub fn extract_source(chart: &str) -> String {
    match FENCED_BLOCK.captures(chart).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => chart
            .replace("```mermaid", "")
            .replace("```", "")
            .trim()
            .to_string(),
    }
}

/// Fresh identifier for one render
pub fn render_id() -> String {
    format!("mermaid-{}", uuid::Uuid::new_v4().simple())
}

/// Render `chart`, never failing: errors become [`DiagramOutput::Failed`]
pub async fn render_chart(renderer: Arc<dyn DiagramRenderer>, chart: String) -> DiagramOutput {
    let source = extract_source(&chart);
    let id = render_id();

    match renderer.render(&id, &source).await {
        Ok(svg) => DiagramOutput::Svg(svg),
        Err(e) => {
            tracing::error!("diagram render error ({}): {}", id, e);
            DiagramOutput::Failed
        }
    }
}
