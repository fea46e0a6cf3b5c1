//! Fixed-length, doubly-linked chain of animated nodes
//!
//! Positions live in an arena and refer to their neighbors by index. The
//! links are wired once after every position exists and never change.

use crate::error::{Error, Result};
use crate::render::{draw_node, DrawingSurface, Layout};
use crate::state::{Advance, AnimationState, Begin, Heading};

/// One element of the chain
#[derive(Debug, Clone)]
pub struct Position {
    index: usize,
    state: AnimationState,
    next: Option<usize>,
    previous: Option<usize>,
}

impl Position {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: AnimationState::new(),
            next: None,
            previous: None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    #[inline]
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    #[inline]
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    pub fn advance(&mut self) -> Advance {
        self.state.advance()
    }

    pub fn begin(&mut self) -> Begin {
        self.state.begin()
    }

    /// Draw this position's shape at its current progress
    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S, layout: &Layout) {
        draw_node(surface, layout, self.index, self.state.progress());
    }
}

/// Where a step from a position leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    Moved(usize),
    /// No neighbor in that direction; carries the unchanged position
    Exhausted(usize),
}

impl Neighbor {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Neighbor::Moved(index) | Neighbor::Exhausted(index) => index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeChain {
    positions: Vec<Position>,
}

impl NodeChain {
    /// Build `count` positions in index order and link them
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(Error::Config("a chain needs at least one node".into()));
        }

        let mut positions: Vec<Position> = (0..count).map(Position::new).collect();
        for i in 1..count {
            positions[i - 1].next = Some(i);
            positions[i].previous = Some(i - 1);
        }

        Ok(Self { positions })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false; a chain has at least one position
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn head(&self) -> usize {
        0
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    /// Positions from head to tail, following `next` links
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            chain: self,
            cursor: Some(self.head()),
        }
    }

    /// Advance the state of position `index`
    pub fn advance(&mut self, index: usize) -> Advance {
        match self.positions.get_mut(index) {
            Some(position) => position.advance(),
            None => Advance::Idle,
        }
    }

    /// Ask position `index` to start a transition
    pub fn begin(&mut self, index: usize) -> Begin {
        match self.positions.get_mut(index) {
            Some(position) => position.begin(),
            None => Begin::Busy,
        }
    }

    /// Step from `index` in `heading`
    ///
    /// At either end the step is refused and the same index comes back as
    /// [`Neighbor::Exhausted`].
    pub fn neighbor(&self, index: usize, heading: Heading) -> Neighbor {
        let link = self.positions.get(index).and_then(|p| match heading {
            Heading::Forward => p.next,
            Heading::Reverse => p.previous,
        });
        match link {
            Some(next) => Neighbor::Moved(next),
            None => Neighbor::Exhausted(index),
        }
    }

    /// Redraw the whole chain, head first
    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S, layout: &Layout) {
        for position in self.iter() {
            position.draw(surface, layout);
        }
    }
}

pub struct ChainIter<'a> {
    chain: &'a NodeChain,
    cursor: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Position;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.chain.get(self.cursor?)?;
        self.cursor = position.next;
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::render::RecordingSurface;

    #[test]
    fn test_empty_chain_is_rejected() {
        assert!(matches!(NodeChain::new(0), Err(Error::Config(_))));
    }

    #[test]
    fn test_links_are_consistent() {
        let chain = NodeChain::new(5).unwrap();
        assert_eq!(chain.len(), 5);
        for position in chain.iter() {
            if let Some(next) = position.next() {
                assert_eq!(chain.get(next).unwrap().previous(), Some(position.index()));
            }
        }
        assert_eq!(chain.get(0).unwrap().previous(), None);
        assert_eq!(chain.get(4).unwrap().next(), None);
    }

    #[test]
    fn test_iter_visits_in_index_order() {
        let chain = NodeChain::new(4).unwrap();
        let indices: Vec<usize> = chain.iter().map(Position::index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_neighbor_moves_inside_chain() {
        let chain = NodeChain::new(5).unwrap();
        assert_eq!(chain.neighbor(2, Heading::Forward), Neighbor::Moved(3));
        assert_eq!(chain.neighbor(2, Heading::Reverse), Neighbor::Moved(1));
    }

    #[test]
    fn test_neighbor_exhausted_at_ends() {
        let chain = NodeChain::new(5).unwrap();
        assert_eq!(chain.neighbor(4, Heading::Forward), Neighbor::Exhausted(4));
        assert_eq!(chain.neighbor(0, Heading::Reverse), Neighbor::Exhausted(0));
    }

    #[test]
    fn test_single_node_is_exhausted_both_ways() {
        let chain = NodeChain::new(1).unwrap();
        assert_eq!(chain.neighbor(0, Heading::Forward), Neighbor::Exhausted(0));
        assert_eq!(chain.neighbor(0, Heading::Reverse), Neighbor::Exhausted(0));
    }

    #[test]
    fn test_out_of_range_index_is_a_no_op() {
        let mut chain = NodeChain::new(2).unwrap();
        assert_eq!(chain.advance(9), Advance::Idle);
        assert_eq!(chain.begin(9), Begin::Busy);
    }

    #[test]
    fn test_draw_renders_every_position() {
        let config = AppConfig::default();
        let layout = Layout::new(600.0, 300.0, &config).unwrap();
        let chain = NodeChain::new(5).unwrap();
        let mut surface = RecordingSurface::new();

        chain.draw(&mut surface, &layout);

        assert_eq!(surface.stroke_rects().count(), 5);
        assert_eq!(surface.paths().count(), 10);
        assert_eq!(surface.save_depth(), 0);
    }
}
