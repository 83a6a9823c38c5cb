// ABOUTME: Host list component for the filtered view of known_hosts lines with a clamped cursor
// ABOUTME: Renders one row per parseable record, highlighting the row under the cursor

use ratatui::text::Line;

use super::style;
use crate::ssh::HostRecord;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostList {
    pub hosts: Vec<String>,
    pub selected_index: usize,
}

impl HostList {
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            hosts,
            selected_index: 0,
        }
    }

    /// Replaces the view. The cursor goes back to the top unless the new
    /// view is empty, in which case it is left alone.
    pub fn set_hosts(&mut self, hosts: Vec<String>) {
        self.hosts = hosts;
        if !self.hosts.is_empty() {
            self.selected_index = 0;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.hosts.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.hosts.len().saturating_sub(1);
    }

    /// Pulls the cursor back inside the list after a removal.
    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.hosts.len() {
            self.selected_index = self.hosts.len().saturating_sub(1);
        }
    }

    pub fn get_selected_host(&self) -> Option<&String> {
        self.hosts.get(self.selected_index)
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        if self.hosts.is_empty() {
            return vec![Line::styled("No hosts found", style::normal())];
        }

        self.hosts
            .iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let record = HostRecord::parse(line).ok()?;
                let is_selected = index == self.selected_index;
                let marker = if is_selected { ">" } else { " " };
                let row = format!("{marker} {}", record.display_name());

                let row_style = if is_selected {
                    style::selected()
                } else {
                    style::normal()
                };
                Some(Line::styled(row, row_style))
            })
            .collect()
    }
}
