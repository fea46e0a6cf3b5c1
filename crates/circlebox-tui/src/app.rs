use std::sync::Arc;

use anyhow::Result;
use circlebox_core::{AppConfig, Controller, Layout, Tap, Tick, TickEvent, TimerSource};
use tracing::debug;

use crate::input::Action;
use crate::surface::CanvasSurface;
use crate::theme::Theme;

/// Application state
pub struct App<S: TimerSource> {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Animation engine
    pub controller: Controller<S>,
    /// Stage geometry; resized to the canvas before each frame
    pub layout: Layout,
    pub theme: Theme,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Completed transitions since startup
    pub settled_count: u64,
    /// A frame is due because something changed
    pub needs_redraw: bool,
}

impl<S: TimerSource> App<S> {
    pub fn new(config: Arc<AppConfig>, timer: S) -> Result<Self> {
        let controller = Controller::new(&config, timer)?;
        let layout = Layout::new(config.stage.width, config.stage.height, &config)?;
        let theme = Theme::from_config(&config.theme);
        Ok(Self {
            config,
            controller,
            layout,
            theme,
            should_quit: false,
            status_message: None,
            settled_count: 0,
            needs_redraw: true,
        })
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.needs_redraw = true;
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Progress of the node under the cursor
    pub fn current_progress(&self) -> f64 {
        let chain = self.controller.chain();
        chain
            .get(self.controller.cursor().current())
            .map(|p| p.state().progress())
            .unwrap_or(0.0)
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Tap => match self.controller.tap() {
                Tap::Started { position, heading } => {
                    self.status_message = None;
                    self.needs_redraw = true;
                    debug!(position, ?heading, "Tap accepted");
                }
                Tap::Ignored => {
                    self.set_status("Busy: wait for the current node to settle");
                }
            },
            Action::None => {}
        }
    }

    /// Apply the result of a timer tick
    pub fn apply_tick(&mut self, tick: Tick) {
        if let Tick::Settled { reversed, .. } = tick {
            self.settled_count += 1;
            if reversed {
                self.set_status("End of chain reached, reversing");
            }
        }
        if tick.needs_redraw() {
            self.needs_redraw = true;
        }
    }

    /// Drive one tick directly
    pub fn tick(&mut self) {
        let tick = self.controller.tick();
        self.apply_tick(tick);
    }

    /// Draw the whole stage onto a fresh canvas surface of the given size
    pub fn render_surface(&mut self, width: f64, height: f64) -> CanvasSurface {
        self.layout = self.layout.resized(width, height);
        let mut surface = CanvasSurface::new(height);
        self.controller.draw(&mut surface, &self.layout);
        self.needs_redraw = false;
        surface
    }
}

impl App<circlebox_core::IntervalTimer> {
    /// Apply a tick delivered by the interval timer
    pub fn on_tick_event(&mut self, event: TickEvent) {
        let tick = self.controller.on_tick_event(event);
        self.apply_tick(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct NullTimer;

    impl TimerSource for NullTimer {
        type Handle = ();

        fn schedule(&mut self, _period: Duration) {}

        fn cancel(&mut self, _handle: ()) {}
    }

    fn app() -> App<NullTimer> {
        App::new(Arc::new(AppConfig::default()), NullTimer).unwrap()
    }

    #[test]
    fn test_tap_then_ticks_settle() {
        let mut app = app();
        app.handle_action(Action::Tap);
        assert!(app.is_animating());

        for _ in 0..100 {
            if !app.is_animating() {
                break;
            }
            app.tick();
        }

        assert!(!app.is_animating());
        assert_eq!(app.settled_count, 1);
        assert_eq!(app.controller.cursor().current(), 1);
    }

    #[test]
    fn test_tap_while_busy_sets_status() {
        let mut app = app();
        app.handle_action(Action::Tap);
        app.tick();
        app.handle_action(Action::Tap);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_quit_action() {
        let mut app = app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_surface_clears_redraw_flag() {
        let mut app = app();
        assert!(app.needs_redraw);
        let surface = app.render_surface(160.0, 80.0);
        assert!(!app.needs_redraw);
        assert_eq!(surface.background(), Some(app.theme.back));
        // Five boxes, four edges each, plus the arcs
        assert!(surface.segments().len() >= 20);
    }
}
