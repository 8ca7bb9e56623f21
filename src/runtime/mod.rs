use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::AppSession;
use crate::backend::{DetachedBackend, MediaBackend, RodioBackend, SourceEvent};
use crate::error::PlayerError;

mod event_loop;
mod logging;
mod settings;
mod timers;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();

    match logging::init(&settings.logging) {
        Ok(Some(path)) => log::info!("logging to {}", path.display()),
        Ok(None) => {}
        // Not fatal; the player is still usable without a log.
        Err(e) => eprintln!("oscillate: could not open log file: {e}"),
    }
    if let Some(msg) = config_warning {
        log::warn!("{msg}");
    }

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let (event_tx, event_rx) = mpsc::channel::<SourceEvent>();
    let (backend, unavailable): (Box<dyn MediaBackend>, Option<String>) =
        match RodioBackend::spawn(event_tx) {
            Ok(b) => (Box::new(b), None),
            Err(PlayerError::BackendUnavailable(reason)) => (Box::new(DetachedBackend), Some(reason)),
            Err(e) => (Box::new(DetachedBackend), Some(e.to_string())),
        };

    let mut session = AppSession::new(backend, &settings);
    let mut view = session.new_view();
    if let Some(reason) = unavailable {
        session.mark_backend_unavailable(reason, &mut view);
    }
    if !paths.is_empty() {
        session.add_files(&paths, &mut view);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new(view);
    let run_result = event_loop::run(&mut terminal, &settings, &mut session, &event_rx, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("bye");
    run_result
}
