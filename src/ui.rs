//! Terminal rendering and the display side of the player.
//!
//! The player core talks to a [`UiSink`]; [`View`] implements it by storing
//! what it is told, and [`draw`] renders the view, the playlist and the
//! shell state with `ratatui` once per loop iteration.

mod shell;
mod sink;
mod view;

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{Preference, Preferences, Settings, SettingsProvider};
use crate::player::format_secs;
use crate::playlist::Playlist;

pub use shell::{DeleteTarget, InputMode, ShellAction, ShellState};
pub use sink::UiSink;
pub use view::{NO_SONG_ARTIST, NO_SONG_TITLE, View};

/// Everything a frame is drawn from.
pub struct Screen<'a> {
    pub view: &'a View,
    pub playlist: &'a Playlist,
    pub current: Option<usize>,
    pub shell: &'a ShellState,
    pub prefs: &'a Preferences,
    pub settings: &'a Settings,
}

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

fn controls_text(scrub_seconds: u64) -> String {
    [
        "[space/p] play/pause".to_string(),
        "[s] stop".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{scrub_seconds}s"),
        "[m] mute".to_string(),
        "[+/-] volume".to_string(),
        "[j/k] move".to_string(),
        "[enter] play".to_string(),
        "[v/a] select".to_string(),
        "[d] delete".to_string(),
        "[/] search".to_string(),
        "[o] add".to_string(),
        "[P] prefs".to_string(),
        "[F9] sidebar".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Right-hand time label: total duration, or `-MM:SS` left when asked for.
pub fn duration_text(view: &View, show_remaining: bool) -> String {
    match view.remaining_secs() {
        Some(rem) if show_remaining => format!("-{}", format_secs(rem)),
        _ => view.duration_label.clone(),
    }
}

/// Slice of `total` rows to render so that `sel` stays roughly centered.
fn visible_window(total: usize, height: usize, sel: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = sel.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, screen, chunks[0]);

    let body = if screen.shell.show_sidebar {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);
        draw_playlist(frame, screen, cols[0]);
        cols[1]
    } else {
        chunks[1]
    };
    draw_now_playing(frame, screen, body);

    let footer = Paragraph::new(controls_text(screen.settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    draw_popup(frame, screen, chunks[1]);
}

fn draw_header(frame: &mut Frame, screen: &Screen, area: Rect) {
    let ttl = Duration::from_secs(screen.settings.ui.toast_seconds);
    let text = match screen.view.current_toast(ttl) {
        Some(toast) => toast.to_string(),
        None => screen.settings.ui.header_text.clone(),
    };
    let header = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" oscillate ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(header, area);
}

fn draw_playlist(frame: &mut Frame, screen: &Screen, area: Rect) {
    let playlist = screen.playlist;
    let display = playlist.visible_indices();

    let mut title = format!(" playlist ({}) ", playlist.len());
    let selected = playlist.selected().len();
    if selected > 0 {
        title.push_str(&format!("• {selected} selected "));
    }
    if screen.shell.mode == InputMode::Search {
        title.push_str(&format!("• /{}_ ", screen.shell.input));
    } else if !playlist.query().is_empty() {
        title.push_str(&format!("• /{} ", playlist.query()));
    }

    // Only build items for the rows that fit.
    let height = area.height.saturating_sub(2) as usize;
    let sel_pos = display
        .iter()
        .position(|&i| i == screen.shell.cursor)
        .unwrap_or(0);
    let (start, end) = visible_window(display.len(), height, sel_pos);

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .filter_map(|&i| {
            let track = playlist.get(i)?;
            let marker = if screen.current == Some(i) {
                "♪ "
            } else {
                "  "
            };
            let check = if playlist.is_selected(i) { "[x] " } else { "" };
            let mut item = ListItem::new(format!(
                "{marker}{check}{} - {}",
                track.title(),
                track.artist()
            ));
            if screen.current == Some(i) {
                item = item.bold();
            }
            Some(item)
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !empty {
        state.select(Some(sel_pos - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(frame: &mut Frame, screen: &Screen, area: Rect) {
    let view = screen.view;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(LEFT_PAD);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let heading = Paragraph::new(vec![
        Line::from(view.title.as_str()).bold(),
        Line::from(view.artist.as_str()).italic(),
    ]);
    frame.render_widget(heading, rows[0]);

    let right = duration_text(view, screen.prefs.show_time_remaining());
    let gauge = Gauge::default()
        .ratio(view.progress_ratio())
        .label(format!("{} / {}", view.position_label, right))
        .use_unicode(true);
    frame.render_widget(gauge, rows[1]);

    let play = if view.playing { "⏸" } else { "▶" };
    let mut transport = Line::from(format!(
        "{play}  {} {:>3.0}%",
        view.mute_icon.glyph(),
        view.volume * 100.0
    ));
    if !view.transport_enabled {
        transport = transport.dim();
    }
    frame.render_widget(Paragraph::new(transport), rows[2]);

    if let Some(status) = view.status.as_deref() {
        frame.render_widget(Paragraph::new(status).red().wrap(Wrap { trim: true }), rows[3]);
    }
}

fn draw_popup(frame: &mut Frame, screen: &Screen, area: Rect) {
    let shell = screen.shell;
    match shell.mode {
        InputMode::Normal | InputMode::Search => {}
        InputMode::AddPath => {
            let popup = centered_rect_sized(64, 3, area);
            frame.render_widget(Clear, popup);
            let input = Paragraph::new(format!("{}_", shell.input)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" add file or folder (enter adds, esc cancels) ")
                    .padding(LEFT_PAD),
            );
            frame.render_widget(input, popup);
        }
        InputMode::ConfirmDelete(target) => {
            let n = target.count();
            let noun = if n == 1 { "song" } else { "songs" };
            let popup = centered_rect_sized(40, 3, area);
            frame.render_widget(Clear, popup);
            let prompt = Paragraph::new(format!("Delete {n} {noun}? [y/n]"))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(" delete "));
            frame.render_widget(prompt, popup);
        }
        InputMode::Preferences => {
            let popup = centered_rect_sized(44, Preference::ALL.len() as u16 + 2, area);
            frame.render_widget(Clear, popup);
            let items: Vec<ListItem> = Preference::ALL
                .iter()
                .map(|&pref| {
                    let mark = if screen.prefs.get(pref) { "[x]" } else { "[ ]" };
                    ListItem::new(format!("{mark} {}", pref.title()))
                })
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" preferences (enter toggles) "),
                )
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            let mut state = ListState::default();
            state.select(Some(shell.pref_cursor));
            frame.render_stateful_widget(list, popup, &mut state);
        }
    }
}
