//! Cursor that walks the chain one settled node at a time

use tracing::debug;

use crate::chain::{Neighbor, NodeChain};
use crate::error::Result;
use crate::state::{Advance, Begin, Heading};

/// Result of one cursor tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStep {
    /// The current position was not animating
    Idle,
    Continuing,
    /// The current position finished its transition and the cursor moved on
    Settled {
        /// Position that just settled
        settled: usize,
        /// Position the cursor now points at
        current: usize,
        /// The traversal direction flipped at an end of the chain
        reversed: bool,
    },
}

/// Owns the chain plus the current position and traversal direction
#[derive(Debug, Clone)]
pub struct SequenceCursor {
    chain: NodeChain,
    current: usize,
    traversal: Heading,
}

impl SequenceCursor {
    /// Cursor at the head of a fresh chain of `count` nodes, heading forward
    pub fn new(count: usize) -> Result<Self> {
        let chain = NodeChain::new(count)?;
        Ok(Self {
            current: chain.head(),
            chain,
            traversal: Heading::Forward,
        })
    }

    #[inline]
    pub fn chain(&self) -> &NodeChain {
        &self.chain
    }

    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn traversal(&self) -> Heading {
        self.traversal
    }

    /// Whether the current position is mid-transition
    pub fn is_animating(&self) -> bool {
        self.chain
            .get(self.current)
            .is_some_and(|p| !p.state().is_idle())
    }

    /// Start the current position's transition
    pub fn begin_current(&mut self) -> Begin {
        self.chain.begin(self.current)
    }

    /// Tick the current position and move on once it settles
    pub fn advance(&mut self) -> CursorStep {
        match self.chain.advance(self.current) {
            Advance::Idle => CursorStep::Idle,
            Advance::Continuing => CursorStep::Continuing,
            Advance::Settled => {
                let settled = self.current;
                let (current, reversed) = match self.chain.neighbor(settled, self.traversal) {
                    Neighbor::Moved(next) => (next, false),
                    Neighbor::Exhausted(same) => {
                        self.traversal = self.traversal.reversed();
                        (same, true)
                    }
                };
                self.current = current;
                debug!(
                    settled,
                    current,
                    reversed,
                    traversal = ?self.traversal,
                    "Position settled"
                );
                CursorStep::Settled {
                    settled,
                    current,
                    reversed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run one full transition of the current position
    fn settle_current(cursor: &mut SequenceCursor) -> CursorStep {
        assert!(matches!(cursor.begin_current(), Begin::Started(_)));
        for _ in 0..100 {
            let step = cursor.advance();
            if matches!(step, CursorStep::Settled { .. }) {
                return step;
            }
            assert_eq!(step, CursorStep::Continuing);
        }
        panic!("position never settled");
    }

    #[test]
    fn test_new_cursor_starts_at_head_forward() {
        let cursor = SequenceCursor::new(5).unwrap();
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.traversal(), Heading::Forward);
        assert!(!cursor.is_animating());
    }

    #[test]
    fn test_advance_while_idle_does_nothing() {
        let mut cursor = SequenceCursor::new(3).unwrap();
        assert_eq!(cursor.advance(), CursorStep::Idle);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_walks_forward_then_back() {
        let mut cursor = SequenceCursor::new(5).unwrap();
        let mut visited = Vec::new();

        for _ in 0..9 {
            visited.push(cursor.current());
            settle_current(&mut cursor);
        }

        assert_eq!(visited, vec![0, 1, 2, 3, 4, 4, 3, 2, 1]);
    }

    #[test]
    fn test_reverses_at_both_ends() {
        let mut cursor = SequenceCursor::new(5).unwrap();
        let mut settled_order = Vec::new();
        let mut reversals = Vec::new();

        for _ in 0..10 {
            if let CursorStep::Settled { settled, reversed, .. } = settle_current(&mut cursor) {
                settled_order.push(settled);
                if reversed {
                    reversals.push(settled);
                }
            }
        }

        assert_eq!(settled_order, vec![0, 1, 2, 3, 4, 4, 3, 2, 1, 0]);
        assert_eq!(reversals, vec![4, 0]);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.traversal(), Heading::Forward);
    }

    #[test]
    fn test_distinct_positions_differ_from_settlement_order() {
        let mut cursor = SequenceCursor::new(5).unwrap();
        let mut settled_order = Vec::new();

        for _ in 0..10 {
            if let CursorStep::Settled { settled, .. } = settle_current(&mut cursor) {
                settled_order.push(settled);
            }
        }

        let mut positions = settled_order.clone();
        positions.dedup();

        // Each end settles twice in a row, once per direction
        assert_eq!(settled_order, vec![0, 1, 2, 3, 4, 4, 3, 2, 1, 0]);
        assert_eq!(positions, vec![0, 1, 2, 3, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_end_position_keeps_its_own_direction() {
        let mut cursor = SequenceCursor::new(2).unwrap();
        settle_current(&mut cursor); // 0 -> 1
        settle_current(&mut cursor); // 1 settles at 1.0, reversal
        assert_eq!(cursor.current(), 1);
        assert_eq!(cursor.traversal(), Heading::Reverse);
        assert_eq!(cursor.chain().get(1).unwrap().state().committed(), 1.0);

        // The end position's next run goes back down to 0
        settle_current(&mut cursor);
        assert_eq!(cursor.chain().get(1).unwrap().state().committed(), 0.0);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_begin_while_animating_is_busy() {
        let mut cursor = SequenceCursor::new(3).unwrap();
        cursor.begin_current();
        cursor.advance();
        assert!(cursor.is_animating());
        assert_eq!(cursor.begin_current(), Begin::Busy);
    }
}
