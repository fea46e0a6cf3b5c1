//! Tap-driven controller tying the cursor to a ticker
//!
//! The host forwards tap signals and timer ticks here and redraws whenever a
//! result other than `Ignored` comes back.

use tracing::{debug, info};

use crate::chain::NodeChain;
use crate::config::AppConfig;
use crate::cursor::{CursorStep, SequenceCursor};
use crate::error::Result;
use crate::render::{draw_background, DrawingSurface, Layout};
use crate::state::{Begin, Heading};
use crate::ticker::{IntervalTimer, TickEvent, Ticker, TimerSource};

/// Result of a tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    /// The current position began a transition and the ticker started
    Started { position: usize, heading: Heading },
    /// A transition is already running; nothing changed
    Ignored,
}

/// Result of a timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No animation was running
    Ignored,
    Advanced,
    /// The transition finished; the ticker has been stopped
    Settled {
        settled: usize,
        current: usize,
        reversed: bool,
    },
}

impl Tick {
    #[inline]
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Tick::Ignored)
    }
}

pub struct Controller<S: TimerSource> {
    cursor: SequenceCursor,
    ticker: Ticker<S>,
}

impl<S: TimerSource> Controller<S> {
    pub fn new(config: &AppConfig, source: S) -> Result<Self> {
        Ok(Self {
            cursor: SequenceCursor::new(config.chain.node_count)?,
            ticker: Ticker::new(source, config.animation.tick_period()),
        })
    }

    #[inline]
    pub fn cursor(&self) -> &SequenceCursor {
        &self.cursor
    }

    #[inline]
    pub fn chain(&self) -> &NodeChain {
        self.cursor.chain()
    }

    #[inline]
    pub fn ticker(&self) -> &Ticker<S> {
        &self.ticker
    }

    /// Whether a transition is running
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.ticker.is_active()
    }

    /// Handle the input signal
    pub fn tap(&mut self) -> Tap {
        if self.cursor.is_animating() {
            debug!(position = self.cursor.current(), "Tap ignored: already animating");
            return Tap::Ignored;
        }

        match self.cursor.begin_current() {
            Begin::Started(heading) => {
                self.ticker.start();
                let position = self.cursor.current();
                info!(position, ?heading, "Transition started");
                Tap::Started { position, heading }
            }
            Begin::Busy => Tap::Ignored,
        }
    }

    /// Handle one timer tick
    pub fn tick(&mut self) -> Tick {
        if !self.ticker.is_active() {
            return Tick::Ignored;
        }

        match self.cursor.advance() {
            CursorStep::Continuing => Tick::Advanced,
            CursorStep::Settled {
                settled,
                current,
                reversed,
            } => {
                self.ticker.stop();
                if reversed {
                    info!(at = settled, traversal = ?self.cursor.traversal(), "Traversal reversed");
                }
                Tick::Settled {
                    settled,
                    current,
                    reversed,
                }
            }
            // The ticker outlived the transition; shut it down
            CursorStep::Idle => {
                self.ticker.stop();
                Tick::Ignored
            }
        }
    }

    /// Clear the stage and draw the full chain
    pub fn draw<D: DrawingSurface + ?Sized>(&self, surface: &mut D, layout: &Layout) {
        draw_background(surface, layout);
        self.cursor.chain().draw(surface, layout);
    }
}

impl Controller<IntervalTimer> {
    /// Handle a tick from the interval timer, dropping ticks of timers that
    /// have already been cancelled
    pub fn on_tick_event(&mut self, event: TickEvent) -> Tick {
        let live = self.ticker.handle().map(|h| h.id());
        if live != Some(event.timer) {
            debug!(timer = event.timer, "Dropping stale tick");
            return Tick::Ignored;
        }
        self.tick()
    }
}
