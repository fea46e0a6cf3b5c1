pub mod chain;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod render;
pub mod scale;
pub mod state;
pub mod ticker;

pub use chain::{Neighbor, NodeChain, Position};
pub use config::AppConfig;
pub use controller::{Controller, Tap, Tick};
pub use cursor::{CursorStep, SequenceCursor};
pub use error::{Error, Result};
pub use render::{DrawOp, DrawingSurface, Layout, LineCap, RecordingSurface, Rgb};
pub use state::{Advance, AnimationState, Begin, Heading};
pub use ticker::{IntervalTimer, TickEvent, Ticker, TimerHandle, TimerSource};
