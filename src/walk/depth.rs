//! Depth tracking for the interactive walk

/// Current depth below the roots, bounded by an optional maximum.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthTracker {
    current: usize,
    max: Option<usize>,
}

impl DepthTracker {
    pub fn new(max: Option<usize>) -> Self {
        Self { current: 0, max }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Check if we're at maximum depth
    pub fn at_max_depth(&self) -> bool {
        self.max.is_some_and(|max| self.current >= max)
    }

    pub fn can_descend(&self) -> bool {
        !self.at_max_depth()
    }

    pub fn descend(&mut self) {
        self.current += 1;
    }

    pub fn ascend(&mut self) {
        debug_assert!(self.current > 0, "depth marker consumed at depth 0");
        self.current = self.current.saturating_sub(1);
    }
}
