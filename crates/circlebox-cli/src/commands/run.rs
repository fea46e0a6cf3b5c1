use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use circlebox_core::{AppConfig, IntervalTimer, TickEvent};
use circlebox_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    widgets::{ChainWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Ticks from the animation timer arrive on this channel
    let (timer, mut tick_rx) = IntervalTimer::new();
    let mut app = App::new(config.clone(), timer)?;

    let event_handler = EventHandler::new(
        config.animation.idle_tick_period(),
        config.animation.tick_period(),
    );

    info!(
        nodes = config.chain.node_count,
        tick_ms = config.animation.tick_ms,
        "Starting TUI"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("circlebox"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app, &keymap, &event_handler, &mut tick_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(settled = app.settled_count, "TUI exited");
    result
}

fn main_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<IntervalTimer>,
    keymap: &Keymap,
    event_handler: &EventHandler,
    tick_rx: &mut mpsc::UnboundedReceiver<TickEvent>,
) -> Result<()> {
    loop {
        // Apply timer ticks that arrived since the last iteration (non-blocking)
        while let Ok(event) = tick_rx.try_recv() {
            app.on_tick_event(event);
        }

        if app.needs_redraw {
            terminal.draw(|frame| draw(frame, app))?;
        }

        // Poll faster while a transition is running so frames keep up with ticks
        let event = if app.is_animating() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, keymap);
                    app.handle_action(action);
                }
                AppEvent::Resize(_, _) => {
                    app.needs_redraw = true;
                }
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App<IntervalTimer>) {
    let size = frame.area();

    // Stage + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    ChainWidget::render(frame, main_layout[0], app);
    StatusBarWidget::render(frame, main_layout[1], app);
}
