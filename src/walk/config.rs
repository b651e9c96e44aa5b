//! Configuration for the interactive walk

/// Options controlling what the interactive walk offers.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Deepest level that can be stepped into. `None` means unlimited.
    pub max_depth: Option<usize>,
    /// Offer symlinks as entries instead of skipping them
    pub include_symlinks: bool,
    /// Pick several categories per path through a follow-up multi-select
    pub multi_category: bool,
    /// Glob patterns for child names to leave out when stepping into a directory
    pub ignore_patterns: Vec<String>,
}

impl WalkOptions {
    /// Options allowing a single step into the roots and no further.
    pub fn no_recurse() -> Self {
        Self {
            max_depth: Some(1),
            ..Default::default()
        }
    }
}
