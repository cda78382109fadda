use crate::error::QueueError;
use crate::queue::{connect, next_of, prev_of, value_of, Link, Queue};
use std::hash::{Hash, Hasher};
use std::ptr::NonNull;

mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Clone for Queue {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for elt in self {
            elt.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Deletes the middle element, the one at index ⌊*n* / 2⌋ (0-based).
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to delete.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue: Queue = ["1", "2", "3", "4", "5", "6"].iter().collect();
    /// queue.delete_mid().unwrap();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["1", "2", "3", "5", "6"]);
    /// ```
    pub fn delete_mid(&mut self) -> Result<(), QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let ghost = self.ghost_node();
        let (mut slow, mut fast) = (self.front_node(), self.front_node());
        // SAFETY: `fast` only moves forward while neither it nor its successor is
        // the ghost node, so every dereferenced node belongs to the queue.
        unsafe {
            while fast != ghost && next_of(fast) != ghost {
                slow = next_of(slow);
                fast = next_of(next_of(fast));
            }
            self.detach_node(slow).release();
        }
        tracing::debug!("deleted middle element");
        Ok(())
    }

    /// Deletes every string that appears more than once in a row, keeping only
    /// the strings whose run has a single element.
    ///
    /// The queue is expected to be sorted, which makes equal strings adjacent.
    /// On an unsorted queue only adjacent repeats are found; the queue stays
    /// well formed either way.
    ///
    /// Returns [`QueueError::Empty`] on an empty queue.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue: Queue = ["a", "a", "b", "c", "c", "c"].iter().collect();
    /// queue.delete_dup().unwrap();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["b"]);
    /// ```
    pub fn delete_dup(&mut self) -> Result<(), QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }
        let ghost = self.ghost_node();
        let mut deleted = 0_usize;
        let mut start = self.front_node();
        // SAFETY: `start..run_end` is always a range of element nodes of the queue.
        unsafe {
            while start != ghost {
                let mut run_end = next_of(start);
                while run_end != ghost && value_of(run_end) == value_of(start) {
                    run_end = next_of(run_end);
                }
                if next_of(start) != run_end {
                    while start != run_end {
                        let next = next_of(start);
                        self.detach_node(start).release();
                        deleted += 1;
                        start = next;
                    }
                }
                start = run_end;
            }
        }
        tracing::debug!(deleted, "deleted duplicated elements");
        Ok(())
    }

    /// Swaps every two adjacent elements: the 1st with the 2nd, the 3rd with
    /// the 4th, and so on. With an odd number of elements the last one stays
    /// in place.
    ///
    /// Only links are rewritten; no element is allocated or freed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue: Queue = ["1", "2", "3", "4", "5"].iter().collect();
    /// queue.swap();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn swap(&mut self) {
        let ghost = self.ghost_node();
        let mut first = self.front_node();
        // SAFETY: `first` and `second` are adjacent element nodes of the queue.
        unsafe {
            while first != ghost && next_of(first) != ghost {
                let second = next_of(first);
                move_before(second, first);
                first = next_of(first);
            }
        }
    }

    /// Reverses the queue in place by swapping `next` and `prev` of every node,
    /// the ghost node included.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue: Queue = ["a", "b", "c"].iter().collect();
    /// queue.reverse();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        if self.is_empty() {
            return;
        }
        let ghost = self.ghost_node();
        let mut node = ghost;
        loop {
            // SAFETY: `node` walks the original `next` chain, which visits every
            // node of the queue exactly once before coming back to the ghost.
            unsafe {
                let link = node.as_mut();
                std::mem::swap(&mut link.next, &mut link.prev);
                node = link.prev;
            }
            if node == ghost {
                break;
            }
        }
    }
}

/// Move the node `node` right before `to`.
///
/// It is unsafe because `node` and `to` must be distinct element nodes of the
/// same well-formed list.
unsafe fn move_before(node: NonNull<Link>, to: NonNull<Link>) {
    connect(prev_of(node), next_of(node));
    connect(prev_of(to), node);
    connect(node, to);
}
