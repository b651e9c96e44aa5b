//! Work queue of the interactive walk

use std::collections::VecDeque;
use std::path::PathBuf;

/// One unit of work in the traversal queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    /// Visit this path.
    Path(PathBuf),
    /// End of the children pushed by one Step-into; consuming it leaves that directory.
    DepthMarker,
}

/// Double-ended queue of paths and depth markers.
///
/// Items are taken from the front. Children of a directory are pushed to the front
/// so they are visited before anything queued earlier (depth-first order).
#[derive(Debug, Default)]
pub struct TraversalQueue {
    items: VecDeque<QueueItem>,
}

impl TraversalQueue {
    /// Seed the queue with one path task per root, in the given order.
    pub fn seeded<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            items: roots.into_iter().map(QueueItem::Path).collect(),
        }
    }

    pub fn push_front(&mut self, item: QueueItem) {
        self.items.push_front(item);
    }

    /// Push several items to the front.
    ///
    /// With `preserve_order` the items come out in iteration order; without it they
    /// are pushed one by one and come out reversed.
    pub fn push_front_many<I>(&mut self, items: I, preserve_order: bool)
    where
        I: IntoIterator<Item = QueueItem>,
    {
        if preserve_order {
            let items: Vec<_> = items.into_iter().collect();
            for item in items.into_iter().rev() {
                self.items.push_front(item);
            }
        } else {
            for item in items {
                self.items.push_front(item);
            }
        }
    }

    pub fn pop_front(&mut self) -> Option<QueueItem> {
        self.items.pop_front()
    }

    pub fn peek_front(&self) -> Option<&QueueItem> {
        self.items.front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drop items from the front until a depth marker is at the front.
    ///
    /// The marker itself stays queued. Returns how many items were dropped.
    pub fn discard_until_marker(&mut self) -> usize {
        let mut discarded = 0;
        while let Some(item) = self.items.front() {
            if *item == QueueItem::DepthMarker {
                break;
            }
            self.items.pop_front();
            discarded += 1;
        }
        discarded
    }
}
