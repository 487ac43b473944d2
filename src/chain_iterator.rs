//! Cursor over the segments of a chain, base to tip.

use crate::chain::{KinematicChain, Segment};
use crate::geometry::Pose;
use crate::joint::Joint;

/// One step of the traversal: the segment at `current_index` moves the body at `next_index`.
#[derive(Debug, Clone, Copy)]
pub struct ChainStep<'a> {
    pub current_index: usize,
    pub next_index: usize,
    pub joint: &'a Joint,
    pub attachment: &'a Pose,
    pub segment: &'a Segment,
}

/// Cursor over the segments of a [`KinematicChain`]. Can be rewound with [`ChainIterator::reset`].
#[derive(Debug, Clone)]
pub struct ChainIterator<'a> {
    chain: &'a KinematicChain,
    index: usize,
}

impl<'a> ChainIterator<'a> {
    pub fn new(chain: &'a KinematicChain) -> Self {
        ChainIterator { chain, index: 0 }
    }

    /// Rewinds to the first segment.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn has_next(&self) -> bool {
        self.index < self.chain.len()
    }
}

impl<'a> Iterator for ChainIterator<'a> {
    type Item = ChainStep<'a>;

    fn next(&mut self) -> Option<ChainStep<'a>> {
        if !self.has_next() {
            return None;
        }
        let segment = self.chain.segment(self.index);
        let step = ChainStep {
            current_index: self.index,
            next_index: self.index + 1,
            joint: &segment.joint,
            attachment: &segment.attachment,
            segment,
        };
        self.index += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.chain.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ChainIterator<'_> {}

#[cfg(test)]
mod tests {
    use crate::parameters::ChainParameters;

    #[test]
    fn test_iterates_all_segments_and_resets() {
        let chain = ChainParameters::two_dof().to_chain().expect("valid chain");
        let mut it = chain.iter();
        assert_eq!(it.len(), 2);
        assert!(it.has_next());

        let indices: Vec<(usize, usize)> = it.by_ref().map(|s| (s.current_index, s.next_index)).collect();
        assert_eq!(indices, vec![(0, 1), (1, 2)]);
        assert!(!it.has_next());
        assert!(it.next().is_none());

        it.reset();
        let first = it.next().expect("first segment");
        assert_eq!(first.attachment, &chain.segment(0).attachment);
        assert_eq!(first.joint, &chain.segment(0).joint);
    }
}
