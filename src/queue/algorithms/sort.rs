use crate::queue::{connect, next_of, value_of, Link, Queue};
use std::ptr::NonNull;

impl Queue {
    /// Sorts the strings in ascending byte-wise order.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time. No element
    /// is allocated or freed.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort. While sorting, the
    /// `prev` links are ignored and the elements form a singly-linked chain
    /// through `next`, terminated by the ghost node. Once the chain is sorted,
    /// the `prev` links are rebuilt in a single forward pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue: Queue = ["b", "a", "c"].iter().collect();
    /// queue.sort();
    /// assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
    /// ```
    pub fn sort(&mut self) {
        let (front, ghost) = (self.front_node(), self.ghost_node());
        // Empty, or a single element.
        if front == ghost || front == self.back_node() {
            return;
        }
        // SAFETY: the `next` chain from `front` visits every element once and
        // ends at the ghost node, which only serves as the terminator until
        // it is re-attached below.
        unsafe {
            let sorted = merge_sort(front, ghost);
            relink(ghost, sorted);
        }
        tracing::debug!("sorted queue");
    }
}

/// Sort the chain `head..end` and return its new head.
unsafe fn merge_sort(head: NonNull<Link>, end: NonNull<Link>) -> NonNull<Link> {
    if head == end || next_of(head) == end {
        return head;
    }
    let (mut slow, mut fast) = (head, next_of(head));
    while fast != end && next_of(fast) != end {
        slow = next_of(slow);
        fast = next_of(next_of(fast));
    }
    let right = next_of(slow);
    slow.as_mut().next = end;

    let left = merge_sort(head, end);
    let right = merge_sort(right, end);
    merge(left, right, end)
}

/// Merge two sorted chains terminated by `end`. On equal strings the node of
/// `left` comes first.
unsafe fn merge(
    mut left: NonNull<Link>,
    mut right: NonNull<Link>,
    end: NonNull<Link>,
) -> NonNull<Link> {
    let mut head = end;
    let mut tail: Option<NonNull<Link>> = None;
    while left != end && right != end {
        let taken = if value_of(right) < value_of(left) {
            right
        } else {
            left
        };
        if taken == right {
            right = next_of(right);
        } else {
            left = next_of(left);
        }
        match tail {
            Some(mut tail) => tail.as_mut().next = taken,
            None => head = taken,
        }
        tail = Some(taken);
    }
    let rest = if left != end { left } else { right };
    match tail {
        Some(mut tail) => tail.as_mut().next = rest,
        None => head = rest,
    }
    head
}

/// Re-attach the sorted chain starting at `front` to the ghost node and
/// rebuild every `prev` link.
unsafe fn relink(ghost: NonNull<Link>, front: NonNull<Link>) {
    let (mut prev, mut current) = (ghost, front);
    while current != ghost {
        connect(prev, current);
        prev = current;
        current = next_of(current);
    }
    connect(prev, ghost);
}
