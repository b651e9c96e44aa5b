//! Interactive filesystem walk
//!
//! The walk visits paths one at a time and asks the user what to do with each:
//! assign categories, step into a directory, step out of the current one, skip,
//! or stop. Traversal order is driven by a queue of paths and depth markers, so
//! stepping into a directory visits its children depth-first and stepping out
//! drops whatever is left of the current directory.

mod choice;
mod config;
mod depth;
mod filter;
mod queue;
mod walker;

pub use choice::{Action, Choice};
pub use config::WalkOptions;
pub use depth::DepthTracker;
pub use filter::{SkipReason, eligibility, is_eligible, is_readable};
pub use queue::{QueueItem, TraversalQueue};
pub use walker::{InteractiveWalker, WalkReport, WalkStatus};
