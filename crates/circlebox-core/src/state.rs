//! Per-node transition state machine
//!
//! Each node owns one [`AnimationState`]. A transition always moves away from
//! the last settled value toward the other extreme: 0 -> 1 or 1 -> 0.

use serde::Serialize;

use crate::scale::per_tick_delta;

/// Direction of travel, both for a node's progress and for the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Forward,
    Reverse,
}

impl Heading {
    /// +1 for forward, -1 for reverse
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Heading::Forward => 1.0,
            Heading::Reverse => -1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Heading::Forward => Heading::Reverse,
            Heading::Reverse => Heading::Forward,
        }
    }

    /// Heading that leaves a settled value: forward from 0, reverse from 1
    #[inline]
    fn away_from(committed: f64) -> Self {
        if 1.0 - 2.0 * committed > 0.0 {
            Heading::Forward
        } else {
            Heading::Reverse
        }
    }
}

/// Result of a single tick on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The node was not animating; nothing changed
    Idle,
    /// Progress moved but the transition is not finished
    Continuing,
    /// The transition finished and the node is idle again
    Settled,
}

/// Result of asking a node to start a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Begin {
    Started(Heading),
    /// Already mid-transition; the request was ignored
    Busy,
}

/// Progress scalar, direction and last settled value of one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    progress: f64,
    /// `None` while idle
    direction: Option<Heading>,
    /// Last settled value, always 0 or 1
    committed: f64,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    pub fn direction(&self) -> Option<Heading> {
        self.direction
    }

    #[inline]
    pub fn committed(&self) -> f64 {
        self.committed
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.direction.is_none()
    }

    /// Apply one tick of progress
    ///
    /// Once a full unit of travel away from the committed value has been
    /// covered, progress snaps to the other extreme, the state goes idle and
    /// `Advance::Settled` is returned. This happens exactly once per
    /// transition.
    pub fn advance(&mut self) -> Advance {
        let Some(heading) = self.direction else {
            return Advance::Idle;
        };

        self.progress += per_tick_delta(self.progress, heading.sign(), 1.0, 1.0);

        if (self.progress - self.committed).abs() > 1.0 {
            self.progress = self.committed + heading.sign();
            self.direction = None;
            self.committed = self.progress;
            Advance::Settled
        } else {
            Advance::Continuing
        }
    }

    /// Start a transition away from the committed value
    ///
    /// Ignored while a transition is already running.
    pub fn begin(&mut self) -> Begin {
        if self.direction.is_some() {
            return Begin::Busy;
        }
        let heading = Heading::away_from(self.committed);
        self.direction = Some(heading);
        Begin::Started(heading)
    }
}
