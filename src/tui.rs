// ABOUTME: Interactive terminal session driving AppState through a single message queue
// ABOUTME: Key input, timer ticks and file load/save completions all arrive as Messages

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::app::{AppState, Effect, Key, Message};
use crate::ssh::{KnownHostsFile, StoreError};
use crate::ui;

const INPUT_POLL: Duration = Duration::from_millis(100);

type Backend = CrosstermBackend<Stdout>;

pub fn run(store: KnownHostsFile, tick_interval: Duration) -> Result<()> {
    let mut terminal = setup_terminal().context("Failed to initialise terminal")?;
    let result = event_loop(&mut terminal, store, tick_interval);
    restore_terminal(&mut terminal);
    result
}

fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<Backend>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

fn event_loop(
    terminal: &mut Terminal<Backend>,
    store: KnownHostsFile,
    tick_interval: Duration,
) -> Result<()> {
    let (sender, receiver) = mpsc::channel();
    let runner = EffectRunner::new(sender.clone(), store, tick_interval);
    spawn_input_reader(sender);

    let mut state = AppState::new();
    let initial = state.init();
    let outcome = if runner.run_all(initial) {
        Ok(())
    } else {
        drive(terminal, &mut state, &receiver, &runner)
    };

    let flushed = runner.finish();
    outcome.and(flushed)
}

fn drive(
    terminal: &mut Terminal<Backend>,
    state: &mut AppState,
    receiver: &Receiver<Message>,
    runner: &EffectRunner,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, state))?;

        let Ok(message) = receiver.recv() else {
            tracing::debug!("Message queue closed");
            return Ok(());
        };

        let effects = state.update(message);
        if runner.run_all(effects) {
            return Ok(());
        }
    }
}

/// Performs effects off the UI thread. Every result comes back through
/// the queue. Saves go to one writer thread so they land in order, and
/// [`EffectRunner::finish`] waits for it before the terminal is released.
struct EffectRunner {
    sender: Sender<Message>,
    store: KnownHostsFile,
    tick_interval: Duration,
    saves: Sender<Vec<String>>,
    writer: JoinHandle<Result<(), StoreError>>,
}

impl EffectRunner {
    fn new(sender: Sender<Message>, store: KnownHostsFile, tick_interval: Duration) -> Self {
        let (saves, pending) = mpsc::channel();
        let writer = spawn_writer(store.clone(), pending, sender.clone());
        Self {
            sender,
            store,
            tick_interval,
            saves,
            writer,
        }
    }

    /// Closes the save queue and waits for queued saves to reach the disk.
    /// A failed save is returned even if the UI already showed it.
    fn finish(self) -> Result<()> {
        drop(self.saves);
        match self.writer.join() {
            Ok(result) => result.context("Failed to save known_hosts"),
            Err(_) => anyhow::bail!("known_hosts writer thread panicked"),
        }
    }

    /// Returns true when one of the effects asked to quit.
    fn run_all(&self, effects: Vec<Effect>) -> bool {
        let mut quit = false;
        for effect in effects {
            quit |= self.run(effect);
        }
        quit
    }

    fn run(&self, effect: Effect) -> bool {
        match effect {
            Effect::Quit => return true,

            Effect::Load => {
                let sender = self.sender.clone();
                let store = self.store.clone();
                thread::spawn(move || {
                    let message = match store.load() {
                        Ok(hosts) => Message::HostsLoaded(hosts),
                        Err(e) => Message::LoadFailed(e.to_string()),
                    };
                    let _ = sender.send(message);
                });
            }

            Effect::Save(lines) => {
                if self.saves.send(lines).is_err() {
                    let message = "known_hosts writer is not running".to_string();
                    let _ = self.sender.send(Message::SaveFailed(message));
                }
            }

            Effect::ScheduleTick => {
                let sender = self.sender.clone();
                let interval = self.tick_interval;
                thread::spawn(move || {
                    thread::sleep(interval);
                    let _ = sender.send(Message::Tick);
                });
            }
        }

        false
    }
}

/// Writes queued line sets one after another until the queue closes.
/// Returns the first failure.
fn spawn_writer(
    store: KnownHostsFile,
    pending: Receiver<Vec<String>>,
    sender: Sender<Message>,
) -> JoinHandle<Result<(), StoreError>> {
    thread::spawn(move || {
        let mut first_error = None;
        for lines in pending {
            let message = match store.save(&lines) {
                Ok(()) => {
                    let path = store.path().display();
                    tracing::info!("Saved {} lines to {path}", lines.len());
                    Message::Saved
                }
                Err(e) => {
                    let message = Message::SaveFailed(e.to_string());
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                    message
                }
            };
            let _ = sender.send(message);
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

/// Forwards terminal input until the queue's receiver goes away.
fn spawn_input_reader(sender: Sender<Message>) {
    thread::spawn(move || {
        loop {
            let message = match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => match translate_key(key) {
                        Some(key) => Message::Key(key),
                        None => continue,
                    },
                    Ok(Event::Resize(..)) => Message::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::debug!("Terminal input failed: {e}");
                        break;
                    }
                },
                Err(e) => {
                    tracing::debug!("Terminal input failed: {e}");
                    break;
                }
            };

            if sender.send(message).is_err() {
                break;
            }
        }
    });
}

fn translate_key(key: KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let translated = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::CtrlC,
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => return None,
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        _ => return None,
    };

    Some(translated)
}
