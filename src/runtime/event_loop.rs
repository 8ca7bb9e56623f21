use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::AppSession;
use crate::backend::{MediaBackend, SourceEvent};
use crate::config;
use crate::tasks::POSITION_TICK_INTERVAL;
use crate::ui::{self, Screen, ShellAction, ShellState, View};

use super::timers::Timers;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// State the loop carries across iterations besides the session itself.
pub struct EventLoopState {
    pub shell: ShellState,
    pub view: View,
    timers: Timers,
    last_tick: Instant,
}

impl EventLoopState {
    pub fn new(view: View) -> Self {
        Self {
            shell: ShellState::default(),
            view,
            timers: Timers::default(),
            last_tick: Instant::now(),
        }
    }

    /// Move newly queued session tasks onto the timer wheel.
    fn collect_tasks<B: MediaBackend>(&mut self, session: &mut AppSession<B>) {
        let now = Instant::now();
        for scheduled in session.take_scheduled() {
            self.timers.schedule(scheduled, now);
        }
    }

    /// Everything except drawing and input: backend events, timers and
    /// the position tick.
    pub fn pump<B: MediaBackend>(
        &mut self,
        session: &mut AppSession<B>,
        events: &Receiver<SourceEvent>,
    ) {
        while let Ok(event) = events.try_recv() {
            session.on_backend_event(event, &mut self.view);
        }

        self.collect_tasks(session);
        let view = &mut self.view;
        self.timers
            .run_due(Instant::now(), |task| session.run_task(task, view));
        self.collect_tasks(session);

        if self.last_tick.elapsed() >= POSITION_TICK_INTERVAL {
            self.last_tick = Instant::now();
            session.position_tick(&mut self.view);
        }

        self.shell.clamp_cursor(session.tracker().playlist());
    }
}

/// Main terminal event loop. Returns `Ok(())` when the user quits.
pub fn run<B: MediaBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut AppSession<B>,
    events: &Receiver<SourceEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        state.pump(session, events);

        terminal.draw(|f| {
            ui::draw(
                f,
                &Screen {
                    view: &state.view,
                    playlist: session.tracker().playlist(),
                    current: session.tracker().current(),
                    shell: &state.shell,
                    prefs: session.prefs(),
                    settings,
                },
            )
        })?;

        if !event::poll(INPUT_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state
            .shell
            .handle_key(key, session.tracker().playlist(), &settings.controls)
        {
            ShellAction::Quit => break,
            ShellAction::Ignore => {}
            ShellAction::Dispatch(event) => {
                log::debug!("key {:?} -> {event:?}", key.code);
                if let Err(e) = session.handle(event, &mut state.view) {
                    log::debug!("event not applied: {e}");
                }
            }
        }
    }

    Ok(())
}
