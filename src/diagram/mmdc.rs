//! Mermaid CLI (`mmdc`) renderer

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempPath;
use tokio::process::Command;
use tokio::sync::OnceCell;

use super::{render_config, DiagramError, DiagramRenderer};

/// Renders diagrams by running the Mermaid CLI in a scratch directory
pub struct MermaidCli {
    program: PathBuf,
    /// Render config written once and reused by every render
    config_file: OnceCell<TempPath>,
}

impl MermaidCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config_file: OnceCell::new(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn config_path(&self) -> Result<&Path, DiagramError> {
        let path = self
            .config_file
            .get_or_try_init(|| async {
                let json = serde_json::to_vec(render_config())?;
                let file = tempfile::Builder::new()
                    .prefix("searchdesk-mermaid-")
                    .suffix(".json")
                    .tempfile()?;
                tokio::fs::write(file.path(), json).await?;
                tracing::debug!("wrote mermaid config to {:?}", file.path());
                Ok::<_, DiagramError>(file.into_temp_path())
            })
            .await?;
        Ok(&**path)
    }
}

#[async_trait]
impl DiagramRenderer for MermaidCli {
    async fn render(&self, id: &str, source: &str) -> Result<String, DiagramError> {
        let config = self.config_path().await?;
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(format!("{}.mmd", id));
        let output = workdir.path().join(format!("{}.svg", id));
        tokio::fs::write(&input, source).await?;

        let result = Command::new(&self.program)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .arg("-c")
            .arg(config)
            .arg("-I")
            .arg(id)
            .arg("-q")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DiagramError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(DiagramError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let svg = tokio::fs::read_to_string(&output).await?;
        tracing::debug!("rendered {} ({} bytes)", id, svg.len());
        Ok(svg)
    }

    /// Run `mmdc --version` without blocking the caller
    async fn check(&self) -> Result<(), DiagramError> {
        let result = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| DiagramError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !result.status.success() {
            return Err(DiagramError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        tracing::debug!(
            "mermaid cli {}",
            String::from_utf8_lossy(&result.stdout).trim()
        );
        Ok(())
    }
}
