//! Core application state and iced program
//!
//! The [`Shell`] owns the request/response state; this module turns its
//! dispatches into tasks and picks the renderer for the result.

use std::sync::Arc;

use iced::widget::{button, column, container, row, scrollable, text, Column, Space};
use iced::{Background, Border, Element, Length, Padding, Task, Theme};

use crate::backend::api::BackendClient;
use crate::diagram::{self, DiagramOutput, DiagramRenderer};
use crate::markdown::{self, Document};
use crate::native::browser;
use crate::config;
use crate::shell::{Dispatch, Mode, ResultView, Shell};
use crate::ui::diagram_view::{self, DiagramState};
use crate::ui::theme::DarkTheme;
use crate::ui::{markdown_view, mode_tabs, search_bar};

// ============================================================================
// Application State
// ============================================================================

pub struct SearchDesk {
    shell: Shell,
    backend: BackendClient,
    renderer: Arc<dyn DiagramRenderer>,
    /// Parsed form of the current Markdown result
    document: Option<Document>,
    diagram: DiagramState,
}

#[derive(Debug, Clone)]
pub enum Message {
    ModeSelected(Mode),
    InputChanged(String),
    Submit,
    Completed {
        ticket: u64,
        outcome: Result<String, String>,
    },
    DiagramRendered {
        ticket: u64,
        output: DiagramOutput,
    },
    CopyResult,
    LinkClicked(String),
    BackendChecked(Result<String, String>),
    RendererChecked(Result<(), String>),
}

/// Send one dispatch to the backend and wrap its outcome for `update`
pub async fn run_dispatch(backend: BackendClient, dispatch: Dispatch) -> Message {
    let outcome = backend
        .invoke(dispatch.capability, &dispatch.input)
        .await
        .map_err(|e| e.to_string());
    Message::Completed {
        ticket: dispatch.ticket,
        outcome,
    }
}

impl SearchDesk {
    pub fn new(backend: BackendClient, renderer: Arc<dyn DiagramRenderer>) -> (Self, Task<Message>) {
        let probe = backend.clone();
        let diagrams = renderer.clone();
        let app = Self {
            shell: Shell::new(),
            backend,
            renderer,
            document: None,
            diagram: DiagramState::Empty,
        };
        let check = Task::perform(
            async move {
                probe
                    .health()
                    .await
                    .map(|health| health.status)
                    .map_err(|e| e.to_string())
            },
            Message::BackendChecked,
        );
        let renderer_check = Task::perform(
            async move { diagrams.check().await.map_err(|e| e.to_string()) },
            Message::RendererChecked,
        );
        (app, Task::batch([check, renderer_check]))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ModeSelected(mode) => {
                self.shell.select_mode(mode);
                self.clear_rendered();
                Task::none()
            }

            Message::InputChanged(input) => {
                self.shell.set_input(input);
                Task::none()
            }

            Message::Submit => match self.dispatch() {
                Some(dispatch) => Task::perform(
                    run_dispatch(self.backend.clone(), dispatch),
                    std::convert::identity,
                ),
                None => Task::none(),
            },

            Message::Completed { ticket, outcome } => {
                if !self.shell.resolve(ticket, outcome) {
                    return Task::none();
                }
                self.present_result(ticket)
            }

            Message::DiagramRendered { ticket, output } => {
                if ticket == self.shell.latest_ticket() {
                    self.diagram = DiagramState::from_output(output);
                } else {
                    tracing::debug!("Dropping diagram for stale ticket {}", ticket);
                }
                Task::none()
            }

            Message::CopyResult => match self.shell.copy_payload() {
                Some(payload) => iced::clipboard::write(payload.to_string()),
                None => Task::none(),
            },

            Message::LinkClicked(url) => {
                if let Err(e) = browser::open(&url) {
                    tracing::warn!("{}", e);
                }
                Task::none()
            }

            Message::BackendChecked(status) => {
                match status {
                    Ok(status) => tracing::info!("Backend reachable at {} ({})", self.backend.base_url(), status),
                    Err(e) => tracing::warn!("{} at {}", e, self.backend.base_url()),
                }
                Task::none()
            }

            Message::RendererChecked(status) => {
                if let Err(e) = status {
                    tracing::warn!(
                        "Diagram renderer unavailable ({}); mind maps will fail to render (set ${})",
                        e,
                        config::MMDC_ENV
                    );
                }
                Task::none()
            }
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ========================================================================
    // Business Logic
    // ========================================================================

    /// Start a submission from the current input, if it is not blank
    fn dispatch(&mut self) -> Option<Dispatch> {
        let dispatch = self.shell.submit()?;
        self.clear_rendered();
        tracing::info!("Submitting {} request (ticket {})", dispatch.capability, dispatch.ticket);
        Some(dispatch)
    }

    fn clear_rendered(&mut self) {
        self.document = None;
        self.diagram = DiagramState::Empty;
    }

    /// Hand a fresh result to the adapter for the current mode
    fn present_result(&mut self, ticket: u64) -> Task<Message> {
        let Some(result) = self.shell.result() else {
            self.clear_rendered();
            return Task::none();
        };

        match self.shell.result_view() {
            ResultView::Markdown => {
                self.document = Some(markdown::parse(result));
                Task::none()
            }
            ResultView::Diagram => {
                self.diagram = DiagramState::Rendering;
                Task::perform(
                    diagram::render_chart(self.renderer.clone(), result.to_string()),
                    move |output| Message::DiagramRendered { ticket, output },
                )
            }
        }
    }

    // ========================================================================
    // View
    // ========================================================================

    pub fn view(&self) -> Element<'_, Message> {
        let mode = self.shell.mode();

        let header = column![
            text("Web Search Agent").size(34).color(DarkTheme::TEXT),
            text("Your AI-powered assistant for searching, reading, researching, and summarizing the web.")
                .size(15)
                .color(DarkTheme::TEXT_MUTED),
        ]
        .spacing(8)
        .align_x(iced::Alignment::Center);

        let search = search_bar::view(
            self.shell.input(),
            mode.placeholder(),
            self.shell.is_loading(),
            self.shell.can_submit(),
            Message::InputChanged,
            Message::Submit,
        );

        let mut content = Column::new()
            .push(header)
            .push(mode_tabs::view(mode, Message::ModeSelected))
            .push(search)
            .spacing(24)
            .max_width(900)
            .align_x(iced::Alignment::Center);

        if let Some(hint) = mode.hint() {
            let dot = if mode == Mode::Research {
                DarkTheme::AMBER
            } else {
                DarkTheme::GREEN
            };
            content = content.push(
                row![
                    text("●").size(8).color(dot),
                    text(hint).size(12).color(DarkTheme::TEXT_MUTED)
                ]
                .spacing(6)
                .align_y(iced::Alignment::Center),
            );
        }

        if let Some(error) = self.shell.error() {
            content = content.push(
                container(text(error).size(14).color(DarkTheme::ERROR))
                    .padding(16)
                    .center_x(Length::Fill)
                    .style(|_theme| container::Style {
                        background: Some(Background::Color(DarkTheme::ERROR_SURFACE)),
                        border: Border {
                            color: DarkTheme::ERROR_BORDER,
                            width: 1.0,
                            radius: 12.0.into(),
                        },
                        ..Default::default()
                    }),
            );
        }

        content = match self.shell.result().filter(|r| !r.is_empty()) {
            Some(_) => content.push(self.view_result()),
            None if self.shell.is_loading() => content.push(
                text("Working on it...")
                    .size(14)
                    .color(DarkTheme::TEXT_MUTED),
            ),
            None if self.shell.error().is_none() => content.push(
                container(
                    text("Pick a mode and ask away.")
                        .size(14)
                        .color(DarkTheme::TEXT_PLACEHOLDER),
                )
                .padding(48),
            ),
            None => content,
        };

        container(scrollable(
            container(content)
                .padding(Padding::from([48.0, 24.0]))
                .center_x(Length::Fill),
        ))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::BACKGROUND)),
            ..Default::default()
        })
        .into()
    }

    fn view_result(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = match self.shell.result_view() {
            ResultView::Diagram => diagram_view::view(&self.diagram),
            ResultView::Markdown => match &self.document {
                Some(document) => markdown_view::view(document, Message::LinkClicked),
                None => Space::with_height(0.0).into(),
            },
        };

        let copy = button(text("Copy").size(13))
            .on_press(Message::CopyResult)
            .padding(Padding::from([6.0, 12.0]))
            .style(|_theme, status| button::Style {
                background: Some(Background::Color(match status {
                    button::Status::Hovered | button::Status::Pressed => DarkTheme::SURFACE_HIGHLIGHT,
                    _ => DarkTheme::SURFACE,
                })),
                text_color: DarkTheme::TEXT_MUTED,
                border: Border {
                    color: DarkTheme::BORDER,
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            });

        container(
            column![
                row![Space::with_width(Length::Fill), copy],
                body
            ]
            .spacing(8),
        )
        .padding(Padding::from([24.0, 32.0]))
        .width(Length::Fill)
        .style(|_theme| container::Style {
            background: Some(Background::Color(DarkTheme::SURFACE)),
            border: Border {
                color: DarkTheme::BORDER,
                width: 1.0,
                radius: 12.0.into(),
            },
            ..Default::default()
        })
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::api::tests::spawn_backend;
    use crate::diagram::DiagramError;
    use crate::markdown::Block;
    use crate::shell::Phase;
    use async_trait::async_trait;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    struct NoRenderer;

    #[async_trait]
    impl DiagramRenderer for NoRenderer {
        async fn render(&self, _id: &str, _source: &str) -> Result<String, DiagramError> {
            Ok("<svg/>".to_string())
        }
    }

    fn app(api_base: &str) -> SearchDesk {
        SearchDesk::new(BackendClient::new(api_base), Arc::new(NoRenderer)).0
    }

    fn submit(app: &mut SearchDesk, mode: Mode, input: &str) -> u64 {
        let _ = app.update(Message::ModeSelected(mode));
        let _ = app.update(Message::InputChanged(input.to_string()));
        let _ = app.update(Message::Submit);
        app.shell.latest_ticket()
    }

    #[tokio::test]
    async fn test_search_result_renders_as_markdown() {
        const RESULT: &str = "## Comparison\n\n| | Rust | Go |\n|---|---|---|\n| GC | no | yes |\n";
        let router = Router::new().route(
            "/api/search",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "query": "rust vs go" }));
                Json(json!({ "result": RESULT }))
            }),
        );
        let origin = spawn_backend(router).await;
        let mut app = app(&config::api_base(Some(&origin)));

        let _ = app.update(Message::InputChanged("rust vs go".to_string()));
        let dispatch = app.dispatch().expect("dispatch for non-blank input");
        assert_eq!(app.shell.phase(), Phase::Submitting);

        let completed = run_dispatch(app.backend.clone(), dispatch).await;
        assert!(matches!(&completed, Message::Completed { outcome: Ok(_), .. }));
        let _ = app.update(completed);

        let document = app.document.as_ref().expect("markdown document");
        match &document.blocks[0] {
            Block::Heading { level, content } => {
                assert_eq!(*level, 2);
                assert_eq!(markdown::Inline::plain_text(content), "Comparison");
            }
            other => panic!("expected heading, got {:?}", other),
        }
        assert!(matches!(document.blocks[1], Block::Table(_)));
        assert_eq!(app.shell.copy_payload(), Some(RESULT));
    }

    #[tokio::test]
    async fn test_dispatch_follows_selected_mode() {
        let router = Router::new().route(
            "/api/summarize",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body, json!({ "url": "  https://example.com " }));
                Json(json!({ "summary": "- short" }))
            }),
        );
        let origin = spawn_backend(router).await;
        let mut app = app(&config::api_base(Some(&origin)));

        let _ = app.update(Message::ModeSelected(Mode::Summarize));
        let _ = app.update(Message::InputChanged("  https://example.com ".to_string()));
        let dispatch = app.dispatch().expect("dispatch for non-blank input");

        let _ = app.update(run_dispatch(app.backend.clone(), dispatch).await);
        assert_eq!(app.shell.result(), Some("- short"));
        assert!(matches!(
            app.document.as_ref().map(|d| &d.blocks[0]),
            Some(Block::List { .. })
        ));
        drop(app.view());
    }

    #[tokio::test]
    async fn test_stale_dispatch_outcome_is_ignored() {
        let router = Router::new().route(
            "/api/search",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "result": body["query"] }))
            }),
        );
        let origin = spawn_backend(router).await;
        let mut app = app(&config::api_base(Some(&origin)));

        let _ = app.update(Message::InputChanged("first".to_string()));
        let first = app.dispatch().expect("first dispatch");
        let _ = app.update(Message::ModeSelected(Mode::Search));
        let _ = app.update(Message::InputChanged("second".to_string()));
        let second = app.dispatch().expect("second dispatch");

        let late = run_dispatch(app.backend.clone(), first).await;
        let _ = app.update(run_dispatch(app.backend.clone(), second).await);
        let _ = app.update(late);
        assert_eq!(app.shell.result(), Some("second"));
    }

    #[test]
    fn test_failure_lands_in_error_state() {
        let mut app = app("/api");
        let ticket = submit(&mut app, Mode::Read, "https://example.com");

        let _ = app.update(Message::Completed {
            ticket,
            outcome: Err("Failed to read URL".to_string()),
        });
        assert_eq!(app.shell.error(), Some("Failed to read URL"));
        assert!(app.document.is_none());
    }

    #[test]
    fn test_graph_result_starts_rendering() {
        let mut app = app("/api");
        let ticket = submit(&mut app, Mode::Graph, "Quantum Physics");

        let _ = app.update(Message::Completed {
            ticket,
            outcome: Ok("```mermaid\ngraph TD; A-->B;\n```".to_string()),
        });
        assert!(matches!(app.diagram, DiagramState::Rendering));
        assert!(app.document.is_none());

        let _ = app.update(Message::DiagramRendered {
            ticket,
            output: DiagramOutput::Failed,
        });
        assert_eq!(app.diagram.message(), Some(diagram::RENDER_FAILED));
        assert_eq!(app.shell.error(), None);
    }

    #[test]
    fn test_stale_diagram_is_dropped() {
        let mut app = app("/api");
        let first = submit(&mut app, Mode::Graph, "first");
        let _ = app.update(Message::Completed {
            ticket: first,
            outcome: Ok("graph TD; A-->B;".to_string()),
        });

        let _ = app.update(Message::InputChanged("second".to_string()));
        let _ = app.update(Message::Submit);
        let _ = app.update(Message::DiagramRendered {
            ticket: first,
            output: DiagramOutput::Svg("<svg/>".to_string()),
        });
        assert!(matches!(app.diagram, DiagramState::Empty));
    }

    #[test]
    fn test_mode_switch_clears_rendered_output() {
        let mut app = app("/api");
        let ticket = submit(&mut app, Mode::Search, "q");
        let _ = app.update(Message::Completed {
            ticket,
            outcome: Ok("# Title".to_string()),
        });
        assert!(app.document.is_some());

        let _ = app.update(Message::ModeSelected(Mode::Summarize));
        assert!(app.document.is_none());
        assert_eq!(app.shell.input(), "");
        assert_eq!(app.shell.result(), None);
    }

    #[test]
    fn test_blank_submit_does_nothing() {
        let mut app = app("/api");
        let before = app.shell.latest_ticket();
        let _ = app.update(Message::InputChanged("   ".to_string()));
        let _ = app.update(Message::Submit);

        assert_eq!(app.shell.latest_ticket(), before);
        assert_eq!(app.shell.phase(), Phase::Idle);
    }
}
