//! Application shell state machine
//!
//! Toolkit-independent: the iced program in `app` owns a [`Shell`], feeds it
//! user intents and backend outcomes, and turns each [`Dispatch`] into a task.

use crate::backend::types::Capability;

/// Shown when a failure carries no message of its own
pub const GENERIC_FAILURE: &str = "An error occurred";

/// The selected capability, driving placeholder, backend call and renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Search,
    Read,
    Research,
    Summarize,
    Graph,
}

impl Mode {
    /// Tab order
    pub const TABS: [Mode; 5] = [
        Mode::Search,
        Mode::Read,
        Mode::Research,
        Mode::Graph,
        Mode::Summarize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Search => "Search",
            Mode::Read => "Read URL",
            Mode::Research => "Deep Research",
            Mode::Summarize => "Summarize",
            Mode::Graph => "Mind Map",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Search => "What are you looking for?",
            Mode::Research => "Enter a topic to research...",
            Mode::Graph => "Enter a topic to map (e.g. Quantum Physics)...",
            Mode::Read | Mode::Summarize => "Enter a URL (https://...)",
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            Mode::Research => Some("Deep research takes ~30s"),
            Mode::Read => Some("Clean markdown extraction"),
            _ => None,
        }
    }

    pub fn capability(self) -> Capability {
        match self {
            Mode::Search => Capability::Search,
            Mode::Read => Capability::Read,
            Mode::Research => Capability::Research,
            Mode::Summarize => Capability::Summarize,
            Mode::Graph => Capability::Graph,
        }
    }
}

/// Which adapter displays the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    Markdown,
    Diagram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// A submission handed to the backend. Only the outcome for the latest
/// ticket is ever applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: u64,
    pub capability: Capability,
    pub input: String,
}

#[derive(Debug, Default)]
pub struct Shell {
    mode: Mode,
    input: String,
    result: Option<String>,
    loading: bool,
    error: Option<String>,
    latest_ticket: u64,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn latest_ticket(&self) -> u64 {
        self.latest_ticket
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Submitting
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    pub fn set_input(&mut self, input: String) {
        self.input = input;
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Switch capability and start from a clean slate. Any in-flight request
    /// is invalidated so its late outcome is dropped.
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.input.clear();
        self.result = None;
        self.error = None;
        self.loading = false;
        self.latest_ticket += 1;
    }

    /// Start a submission. Blank input is inert and leaves state untouched.
    pub fn submit(&mut self) -> Option<Dispatch> {
        if self.input.trim().is_empty() {
            return None;
        }

        self.latest_ticket += 1;
        self.loading = true;
        self.error = None;
        self.result = None;

        Some(Dispatch {
            ticket: self.latest_ticket,
            capability: self.mode.capability(),
            input: self.input.clone(),
        })
    }

    /// Apply the outcome of `ticket`. Returns `false` when the ticket has been
    /// superseded and the outcome was discarded.
    pub fn resolve(&mut self, ticket: u64, outcome: Result<String, String>) -> bool {
        if ticket != self.latest_ticket {
            tracing::debug!(
                "discarding outcome of ticket {} (latest is {})",
                ticket,
                self.latest_ticket
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(message) => {
                self.result = None;
                self.error = Some(if message.is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message
                });
            }
        }
        self.loading = false;
        true
    }

    pub fn result_view(&self) -> ResultView {
        match self.mode {
            Mode::Graph => ResultView::Diagram,
            _ => ResultView::Markdown,
        }
    }

    /// Text placed on the clipboard by the copy action: the raw result
    pub fn copy_payload(&self) -> Option<&str> {
        self.result.as_deref()
    }
}
