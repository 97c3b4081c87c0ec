//! UI components

pub mod diagram_view;
pub mod markdown_view;
pub mod mode_tabs;
pub mod search_bar;
pub mod theme;
