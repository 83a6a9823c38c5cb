// ABOUTME: Terminal rendering of the interactive state using ratatui
// ABOUTME: Views are built as plain styled lines so they can be asserted on without a terminal

pub mod host_list;
pub mod search_input;

pub use host_list::HostList;
pub use search_input::SearchInput;

use ratatui::Frame;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Mode};
use crate::ssh::HostRecord;

pub(crate) mod style {
    use ratatui::style::{Color, Modifier, Style};

    const PURPLE: Color = Color::Rgb(0x7d, 0x56, 0xf4);
    const WHITE: Color = Color::Rgb(0xfa, 0xfa, 0xfa);

    pub fn title() -> Style {
        Style::default().fg(WHITE).bg(PURPLE)
    }

    pub fn selected() -> Style {
        Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(WHITE)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Color::Rgb(0xff, 0x5f, 0x87))
            .add_modifier(Modifier::BOLD)
    }

    pub fn search() -> Style {
        Style::default().fg(PURPLE)
    }

    pub fn footer() -> Style {
        Style::default().fg(Color::Rgb(0x62, 0x62, 0x62))
    }
}

pub fn draw(frame: &mut Frame, state: &AppState) {
    let view = Paragraph::new(Text::from(render(state)));
    frame.render_widget(view, frame.size());
}

pub fn render(state: &AppState) -> Vec<Line<'static>> {
    if let Some(message) = &state.error_message {
        return render_error(message);
    }

    match &state.mode {
        Mode::List => render_list(state),
        Mode::ConfirmDelete(line) => render_confirm_delete(line),
    }
}

fn title(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!(" {text} "), style::title()))
}

fn render_error(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::styled(format!("Error: {message}"), style::error()),
        Line::default(),
        Line::raw("Press 'q' to quit"),
    ]
}

fn render_list(state: &AppState) -> Vec<Line<'static>> {
    let mut lines = vec![title("Known Hosts Manager"), Line::default()];
    lines.extend(state.search_input.lines());
    lines.extend(state.host_list.lines());
    lines.push(Line::default());
    lines.push(Line::styled(
        "Controls: ↑↓ navigate | d delete | / search | q quit",
        style::footer(),
    ));
    lines
}

fn render_confirm_delete(line: &str) -> Vec<Line<'static>> {
    let record = match HostRecord::parse(line) {
        Ok(record) => record,
        Err(e) => return vec![Line::styled(format!("Error: {e}"), style::error())],
    };

    vec![
        title("Confirm Deletion"),
        Line::default(),
        Line::styled("Delete this host?", style::normal()),
        Line::default(),
        Line::styled(record.display_name(), style::selected()),
        Line::default(),
        Line::styled("Press 'y' to confirm, 'n' to cancel", style::footer()),
    ]
}

#[cfg(test)]
pub(crate) fn plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
