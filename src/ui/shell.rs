//! Terminal shell state: cursor, input modes and the key map.
//!
//! Keys are translated into [`UiEvent`]s here; nothing in this module
//! touches playback directly.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::UiEvent;
use crate::config::{ControlsSettings, Preference};
use crate::playlist::Playlist;

/// What a delete confirmation will remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every selected row; carries the count for the prompt.
    Selected(usize),
    /// Just the row under the cursor.
    Row(usize),
}

impl DeleteTarget {
    pub fn count(self) -> usize {
        match self {
            DeleteTarget::Selected(n) => n,
            DeleteTarget::Row(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a search query; every keystroke refilters.
    Search,
    /// Typing a file or directory to add.
    AddPath,
    ConfirmDelete(DeleteTarget),
    Preferences,
}

/// Result of feeding one key to the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellAction {
    Ignore,
    Dispatch(UiEvent),
    Quit,
}

#[derive(Debug)]
pub struct ShellState {
    /// Playlist index under the cursor.
    pub cursor: usize,
    pub mode: InputMode,
    /// Text being typed in `Search` / `AddPath`.
    pub input: String,
    pub show_sidebar: bool,
    /// Row highlighted in the preferences pane.
    pub pref_cursor: usize,
    pending_gg: bool,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            cursor: 0,
            mode: InputMode::Normal,
            input: String::new(),
            show_sidebar: true,
            pref_cursor: 0,
            pending_gg: false,
        }
    }
}

impl ShellState {
    /// Keep the cursor on a visible row after the playlist or filter changed.
    pub fn clamp_cursor(&mut self, playlist: &Playlist) {
        let visible = playlist.visible_indices();
        if visible.is_empty() {
            self.cursor = 0;
        } else if !visible.contains(&self.cursor) {
            self.cursor = visible
                .iter()
                .copied()
                .find(|&i| i > self.cursor)
                .unwrap_or(visible[visible.len() - 1]);
        }
    }

    fn move_cursor(&mut self, playlist: &Playlist, forward: bool) {
        let visible = playlist.visible_indices();
        if visible.is_empty() {
            return;
        }
        let pos = visible.iter().position(|&i| i == self.cursor);
        let next = match (pos, forward) {
            (Some(p), true) => visible[(p + 1) % visible.len()],
            (Some(0), false) => visible[visible.len() - 1],
            (Some(p), false) => visible[p - 1],
            (None, _) => visible[0],
        };
        self.cursor = next;
    }

    fn cursor_row(&self, playlist: &Playlist) -> Option<usize> {
        playlist.is_visible(self.cursor).then_some(self.cursor)
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        playlist: &Playlist,
        controls: &ControlsSettings,
    ) -> ShellAction {
        match self.mode {
            InputMode::Normal => self.normal_key(key, playlist, controls),
            InputMode::Search => self.search_key(key),
            InputMode::AddPath => self.add_path_key(key),
            InputMode::ConfirmDelete(target) => self.confirm_key(key, target),
            InputMode::Preferences => self.preferences_key(key),
        }
    }

    fn normal_key(
        &mut self,
        key: KeyEvent,
        playlist: &Playlist,
        controls: &ControlsSettings,
    ) -> ShellAction {
        let was_g = std::mem::take(&mut self.pending_gg);
        let scrub = controls.scrub_seconds as f64;
        let step = controls.volume_step;

        let event = match key.code {
            KeyCode::Char('q') => return ShellAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return ShellAction::Quit;
            }
            KeyCode::Char(' ') | KeyCode::Char('p') => UiEvent::PlayPause,
            KeyCode::Char('s') => UiEvent::Stop,
            KeyCode::Left | KeyCode::Char('h') => UiEvent::Previous,
            KeyCode::Right | KeyCode::Char('l') => UiEvent::Next,
            KeyCode::Char('H') => UiEvent::SeekBy(-scrub),
            KeyCode::Char('L') => UiEvent::SeekBy(scrub),
            KeyCode::Char('m') => UiEvent::ToggleMute,
            KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => UiEvent::VolumeStep(step),
            KeyCode::Down | KeyCode::Char('-') => UiEvent::VolumeStep(-step),
            KeyCode::Char('j') => {
                self.move_cursor(playlist, true);
                return ShellAction::Ignore;
            }
            KeyCode::Char('k') => {
                self.move_cursor(playlist, false);
                return ShellAction::Ignore;
            }
            KeyCode::Char('g') => {
                if was_g {
                    if let Some(&first) = playlist.visible_indices().first() {
                        self.cursor = first;
                    }
                } else {
                    self.pending_gg = true;
                }
                return ShellAction::Ignore;
            }
            KeyCode::Char('G') => {
                if let Some(&last) = playlist.visible_indices().last() {
                    self.cursor = last;
                }
                return ShellAction::Ignore;
            }
            KeyCode::Enter => match self.cursor_row(playlist) {
                Some(row) => UiEvent::Activate(row),
                None => return ShellAction::Ignore,
            },
            KeyCode::Char('v') => match self.cursor_row(playlist) {
                Some(row) => UiEvent::ToggleSelected(row),
                None => return ShellAction::Ignore,
            },
            KeyCode::Char('a') => UiEvent::SelectAll,
            KeyCode::Esc => {
                if !playlist.selected().is_empty() {
                    UiEvent::ClearSelection
                } else if !playlist.query().is_empty() {
                    UiEvent::SetSearch(String::new())
                } else {
                    return ShellAction::Ignore;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let selected = playlist.selected().len();
                let target = if selected > 0 {
                    DeleteTarget::Selected(selected)
                } else if let Some(row) = self.cursor_row(playlist) {
                    DeleteTarget::Row(row)
                } else {
                    return ShellAction::Ignore;
                };
                self.mode = InputMode::ConfirmDelete(target);
                return ShellAction::Ignore;
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
                self.input = playlist.query().to_string();
                return ShellAction::Ignore;
            }
            KeyCode::Char('o') => {
                self.mode = InputMode::AddPath;
                self.input.clear();
                return ShellAction::Ignore;
            }
            KeyCode::Char('P') => {
                self.mode = InputMode::Preferences;
                return ShellAction::Ignore;
            }
            KeyCode::F(9) => {
                self.show_sidebar = !self.show_sidebar;
                return ShellAction::Ignore;
            }
            _ => return ShellAction::Ignore,
        };
        ShellAction::Dispatch(event)
    }

    fn search_key(&mut self, key: KeyEvent) -> ShellAction {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input.clear();
                ShellAction::Dispatch(UiEvent::SetSearch(String::new()))
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                ShellAction::Ignore
            }
            KeyCode::Backspace => {
                self.input.pop();
                ShellAction::Dispatch(UiEvent::SetSearch(self.input.clone()))
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.input.push(c);
                ShellAction::Dispatch(UiEvent::SetSearch(self.input.clone()))
            }
            _ => ShellAction::Ignore,
        }
    }

    fn add_path_key(&mut self, key: KeyEvent) -> ShellAction {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input.clear();
                ShellAction::Ignore
            }
            KeyCode::Enter => {
                self.mode = InputMode::Normal;
                let typed = std::mem::take(&mut self.input);
                let typed = typed.trim();
                if typed.is_empty() {
                    ShellAction::Ignore
                } else {
                    ShellAction::Dispatch(UiEvent::AddFiles(vec![expand_tilde(typed)]))
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                ShellAction::Ignore
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.input.push(c);
                ShellAction::Ignore
            }
            _ => ShellAction::Ignore,
        }
    }

    fn confirm_key(&mut self, key: KeyEvent, target: DeleteTarget) -> ShellAction {
        self.mode = InputMode::Normal;
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => match target {
                DeleteTarget::Selected(_) => ShellAction::Dispatch(UiEvent::RemoveSelected),
                DeleteTarget::Row(row) => ShellAction::Dispatch(UiEvent::RemoveIndices(vec![row])),
            },
            _ => ShellAction::Ignore,
        }
    }

    fn preferences_key(&mut self, key: KeyEvent) -> ShellAction {
        let count = Preference::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('P') => {
                self.mode = InputMode::Normal;
                ShellAction::Ignore
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.pref_cursor = (self.pref_cursor + 1) % count;
                ShellAction::Ignore
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.pref_cursor = (self.pref_cursor + count - 1) % count;
                ShellAction::Ignore
            }
            KeyCode::Enter | KeyCode::Char(' ') => ShellAction::Dispatch(
                UiEvent::TogglePreference(Preference::ALL[self.pref_cursor % count]),
            ),
            _ => ShellAction::Ignore,
        }
    }
}

fn expand_tilde(typed: &str) -> PathBuf {
    match typed.strip_prefix("~/") {
        Some(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => PathBuf::from(typed),
        },
        None => PathBuf::from(typed),
    }
}
