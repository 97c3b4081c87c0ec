//! Open links in the system browser
//!
//! Links leave the app entirely: the browser runs as a detached process with
//! no handle back into the window.

use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

/// Only web and mail links are handed to the system opener
pub fn is_external_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("mailto:")
        || lower.starts_with("www.")
}

/// Scheme-less `www.` links are upgraded to https
fn normalize(url: &str) -> String {
    let url = url.trim();
    if url.to_ascii_lowercase().starts_with("www.") {
        format!("https://{}", url)
    } else {
        url.to_string()
    }
}

#[cfg(target_os = "macos")]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("open", &[])
}

#[cfg(target_os = "windows")]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("cmd", &["/C", "start", ""])
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener() -> (&'static str, &'static [&'static str]) {
    ("xdg-open", &[])
}

/// Start `command` without waiting on it. The child is reaped on a
/// background thread so it never lingers as a zombie.
fn spawn_detached(mut command: Command) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            if !status.success() {
                tracing::debug!("browser opener exited with {}", status);
            }
            Some(status)
        }
        Err(e) => {
            tracing::debug!("failed to reap browser opener: {}", e);
            None
        }
    }))
}

/// Open `url` in the default browser
pub fn open(url: &str) -> Result<(), String> {
    if !is_external_url(url) {
        return Err(format!("Refusing to open non-web link: {}", url));
    }

    let target = normalize(url);
    let (program, args) = opener();
    let mut command = Command::new(program);
    command.args(args).arg(&target);
    spawn_detached(command).map_err(|e| format!("Failed to open {}: {}", target, e))?;

    tracing::info!("Opened {} in browser", target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_urls() {
        assert!(is_external_url("https://example.com"));
        assert!(is_external_url("HTTP://EXAMPLE.COM"));
        assert!(is_external_url("mailto:someone@example.com"));
        assert!(is_external_url("www.example.com"));
    }

    #[test]
    fn test_other_schemes_are_refused() {
        for url in ["javascript:alert(1)", "file:///etc/passwd", "#section", "relative/path"] {
            assert!(!is_external_url(url), "{}", url);
            assert!(open(url).is_err());
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_detached_child_is_reaped() {
        let reaper = spawn_detached(Command::new("true")).unwrap();
        let status = reaper.join().unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[test]
    fn test_detached_spawn_failure_is_reported() {
        assert!(spawn_detached(Command::new("/nonexistent/opener")).is_err());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("www.rust-lang.org"), "https://www.rust-lang.org");
        assert_eq!(normalize(" https://docs.rs "), "https://docs.rs");
    }
}
