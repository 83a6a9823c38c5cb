// ABOUTME: Search input component holding the interactive query and whether it is being edited
// ABOUTME: Renders the "Search:" prompt while typing and the "Filter:" line once a query is kept

use ratatui::text::{Line, Span};

use super::style;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub query: String,
    pub is_focused: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh query.
    pub fn focus(&mut self) {
        self.query.clear();
        self.is_focused = true;
    }

    pub fn blur(&mut self) {
        self.is_focused = false;
    }

    pub fn handle_input(&mut self, ch: char) {
        self.query.push(ch);
    }

    /// Returns false when there was nothing to erase.
    pub fn handle_backspace(&mut self) -> bool {
        self.query.pop().is_some()
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        if self.is_focused {
            vec![
                Line::from(vec![
                    Span::styled("Search: ", style::search()),
                    Span::raw(format!("{}_", self.query)),
                ]),
                Line::default(),
            ]
        } else if !self.query.is_empty() {
            vec![
                Line::from(vec![
                    Span::styled("Filter: ", style::search()),
                    Span::raw(self.query.clone()),
                ]),
                Line::default(),
            ]
        } else {
            Vec::new()
        }
    }
}
