// ABOUTME: Interactive state machine for browsing, filtering and deleting known_hosts lines
// ABOUTME: Pure Model-Update logic: messages in, effects out, no terminal or file access here

use crate::matcher;
use crate::ui::{HostList, SearchInput};

/// Keys the controller reacts to, decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Home,
    End,
    Enter,
    Esc,
    Backspace,
    CtrlC,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    /// Waiting for y/n on the line the cursor was on when `d` was pressed.
    ConfirmDelete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(Key),
    HostsLoaded(Vec<String>),
    LoadFailed(String),
    Saved,
    SaveFailed(String),
    Tick,
    Resize,
}

/// Work requested by an update; the runner performs it and feeds the
/// outcome back in as a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load,
    Save(Vec<String>),
    ScheduleTick,
    Quit,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub hosts: Vec<String>,
    pub host_list: HostList,
    pub search_input: SearchInput,
    pub mode: Mode,
    pub error_message: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            hosts: Vec::new(),
            host_list: HostList::new(Vec::new()),
            search_input: SearchInput::new(),
            mode: Mode::List,
            error_message: None,
        }
    }

    /// Effects to run before the first message.
    pub fn init(&self) -> Vec<Effect> {
        vec![Effect::ScheduleTick, Effect::Load]
    }

    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::Key(key) => self.handle_key(key),

            Message::HostsLoaded(hosts) => {
                tracing::debug!("Loaded {} hosts", hosts.len());
                self.hosts = hosts;
                self.filter_hosts();
                Vec::new()
            }

            Message::LoadFailed(error) | Message::SaveFailed(error) => {
                tracing::debug!("Entering error view: {error}");
                self.error_message = Some(error);
                Vec::new()
            }

            Message::Saved => {
                tracing::debug!("known_hosts saved");
                Vec::new()
            }

            Message::Tick => vec![Effect::ScheduleTick],

            Message::Resize => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: Key) -> Vec<Effect> {
        if self.error_message.is_some() {
            return match key {
                Key::Char('q') | Key::Esc | Key::CtrlC => vec![Effect::Quit],
                _ => Vec::new(),
            };
        }

        match self.mode {
            Mode::List => self.handle_list_key(key),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key),
        }
    }

    fn handle_list_key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::CtrlC => return vec![Effect::Quit],
            Key::Up => self.host_list.select_previous(),
            Key::Down => self.host_list.select_next(),
            Key::Home => self.host_list.select_first(),
            Key::End => self.host_list.select_last(),
            _ if self.search_input.is_focused => self.handle_search_key(key),
            Key::Esc | Key::Char('q') => return vec![Effect::Quit],
            Key::Char('/') => {
                self.search_input.focus();
                self.filter_hosts();
                self.host_list.select_first();
            }
            Key::Char('d') => {
                if let Some(line) = self.host_list.get_selected_host().cloned() {
                    self.mode = Mode::ConfirmDelete(line);
                }
            }
            _ => {}
        }

        Vec::new()
    }

    fn handle_search_key(&mut self, key: Key) {
        match key {
            Key::Enter | Key::Esc | Key::Char('q') => self.search_input.blur(),
            Key::Char('/') => {}
            Key::Backspace => {
                if self.search_input.handle_backspace() {
                    self.filter_hosts();
                }
            }
            Key::Char(ch) => {
                self.search_input.handle_input(ch);
                self.filter_hosts();
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Char('y' | 'Y') => {
                let Mode::ConfirmDelete(line) = std::mem::replace(&mut self.mode, Mode::List)
                else {
                    return Vec::new();
                };

                self.hosts = matcher::remove_line(&self.hosts, &line);
                self.host_list.hosts = matcher::remove_line(&self.host_list.hosts, &line);
                self.host_list.clamp_selection();
                tracing::info!("Removing host: {line}");

                vec![Effect::Save(self.hosts.clone())]
            }
            Key::Char('n' | 'N' | 'q') | Key::Esc | Key::CtrlC => {
                self.mode = Mode::List;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn filter_hosts(&mut self) {
        let filtered = matcher::search(&self.hosts, &self.search_input.query);
        self.host_list.set_hosts(filtered);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
