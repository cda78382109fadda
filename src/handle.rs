//! The operation table offered to an external driver, with nullable queue
//! handles.
//!
//! A driver may hold no queue at all (`None`). Every operation accepts that
//! and answers with the same neutral result it gives for an empty queue:
//! `false`, `None`, `0`, or nothing. Allocation failures are folded into the
//! same flags. Use the [`Queue`] methods directly to get a [`QueueError`]
//! instead.
//!
//! # Examples
//!
//! ```
//! use cyclic_queue::handle;
//!
//! let mut q = handle::new_queue();
//! assert!(handle::insert_tail(q.as_mut(), "b"));
//! assert!(handle::insert_tail(q.as_mut(), "a"));
//! handle::sort(q.as_mut());
//!
//! let mut buf = [0_u8; 8];
//! let e = handle::remove_head(q.as_mut(), Some(&mut buf[..])).unwrap();
//! assert_eq!(&buf[..2], b"a\0");
//! handle::release_element(e);
//! assert_eq!(handle::size(q.as_ref()), 1);
//!
//! handle::free_queue(q);
//!
//! // Nothing happens on an absent queue.
//! assert!(!handle::insert_head(None, "x"));
//! assert_eq!(handle::size(None), 0);
//! ```

use crate::error::QueueError;
use crate::queue::{Element, Queue};

/// Turn an absent handle into [`QueueError::Absent`].
pub fn require<Q>(q: Option<Q>) -> Result<Q, QueueError> {
    q.ok_or_else(|| {
        tracing::trace!("operation on an absent queue");
        QueueError::Absent
    })
}

/// Create an empty queue, or `None` if the ghost node cannot be allocated.
pub fn new_queue() -> Option<Queue> {
    Queue::try_new().ok()
}

/// Destroy every element of `q`, then `q` itself.
pub fn free_queue(q: Option<Queue>) {
    drop(q)
}

/// Copy `s` into a new first element. `false` if `q` is absent or an
/// allocation fails.
pub fn insert_head(q: Option<&mut Queue>, s: &str) -> bool {
    require(q).and_then(|q| q.insert_head(s)).is_ok()
}

/// Copy `s` into a new last element. `false` if `q` is absent or an
/// allocation fails.
pub fn insert_tail(q: Option<&mut Queue>, s: &str) -> bool {
    require(q).and_then(|q| q.insert_tail(s)).is_ok()
}

/// Unlink the first element and hand it over. When an element is removed
/// and `out` is given, its string is copied into `out`, truncated and
/// NUL-terminated.
pub fn remove_head(q: Option<&mut Queue>, out: Option<&mut [u8]>) -> Option<Element> {
    let element = require(q).ok()?.remove_head()?;
    if let Some(out) = out {
        element.copy_into(out);
    }
    Some(element)
}

/// See [`remove_head`].
pub fn remove_tail(q: Option<&mut Queue>, out: Option<&mut [u8]>) -> Option<Element> {
    let element = require(q).ok()?.remove_tail()?;
    if let Some(out) = out {
        element.copy_into(out);
    }
    Some(element)
}

/// Destroy an element handed over by [`remove_head`] or [`remove_tail`].
pub fn release_element(e: Element) {
    e.release()
}

/// Number of elements, `0` for an absent queue.
pub fn size(q: Option<&Queue>) -> usize {
    require(q).map(Queue::size).unwrap_or(0)
}

/// Destroy the element at index ⌊n / 2⌋. `false` if `q` is absent or empty.
pub fn delete_mid(q: Option<&mut Queue>) -> bool {
    require(q).and_then(Queue::delete_mid).is_ok()
}

/// Destroy every element whose string repeats in a row. The queue is
/// expected to be sorted. `false` if `q` is absent or empty.
pub fn delete_dup(q: Option<&mut Queue>) -> bool {
    require(q).and_then(Queue::delete_dup).is_ok()
}

/// Swap every two adjacent elements.
pub fn swap_adjacent(q: Option<&mut Queue>) {
    if let Ok(q) = require(q) {
        q.swap();
    }
}

/// Reverse the order of the elements.
pub fn reverse(q: Option<&mut Queue>) {
    if let Ok(q) = require(q) {
        q.reverse();
    }
}

/// Sort the elements in ascending byte-wise order.
pub fn sort(q: Option<&mut Queue>) {
    if let Ok(q) = require(q) {
        q.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::fail_after;

    fn values(q: &Option<Queue>) -> Vec<&str> {
        q.as_ref().map(|q| q.iter().collect()).unwrap_or_default()
    }

    #[test]
    fn absent_queue_is_a_no_op() {
        assert!(!insert_head(None, "a"));
        assert!(!insert_tail(None, "a"));
        let mut buf = [b'x'; 4];
        assert!(remove_head(None, Some(&mut buf[..])).is_none());
        assert!(remove_tail(None, Some(&mut buf[..])).is_none());
        assert_eq!(&buf, b"xxxx");
        assert_eq!(size(None), 0);
        assert!(!delete_mid(None));
        assert!(!delete_dup(None));
        swap_adjacent(None);
        reverse(None);
        sort(None);
        free_queue(None);
        assert_eq!(require::<&Queue>(None).unwrap_err(), QueueError::Absent);
    }

    #[test]
    fn empty_queue_answers_like_absent() {
        let mut q = new_queue();
        assert!(remove_head(q.as_mut(), None).is_none());
        assert!(remove_tail(q.as_mut(), None).is_none());
        assert!(!delete_mid(q.as_mut()));
        assert!(!delete_dup(q.as_mut()));
        swap_adjacent(q.as_mut());
        reverse(q.as_mut());
        sort(q.as_mut());
        assert_eq!(size(q.as_ref()), 0);
        assert!(q.as_ref().map_or(false, Queue::is_well_formed));
        free_queue(q);
    }

    #[test]
    fn driver_session() {
        let mut q = new_queue();
        for s in &["b", "a", "c"] {
            assert!(insert_tail(q.as_mut(), s));
        }
        assert_eq!(size(q.as_ref()), 3);
        sort(q.as_mut());
        assert_eq!(values(&q), ["a", "b", "c"]);

        reverse(q.as_mut());
        assert_eq!(values(&q), ["c", "b", "a"]);

        assert!(insert_head(q.as_mut(), "d"));
        swap_adjacent(q.as_mut());
        assert_eq!(values(&q), ["c", "d", "a", "b"]);

        assert!(delete_mid(q.as_mut()));
        assert_eq!(values(&q), ["c", "d", "b"]);

        let mut buf = [0_u8; 4];
        let e = remove_tail(q.as_mut(), Some(&mut buf[..])).unwrap();
        assert_eq!(&buf[..2], b"b\0");
        release_element(e);

        let e = remove_head(q.as_mut(), None).unwrap();
        assert_eq!(e.value(), "c");
        release_element(e);
        assert_eq!(size(q.as_ref()), 1);
        free_queue(q);
    }

    #[test]
    fn allocation_failure_reports_false() {
        let mut q = new_queue();
        assert!(insert_head(q.as_mut(), "a"));
        fail_after(1);
        assert!(!insert_head(q.as_mut(), "b"));
        assert_eq!(values(&q), ["a"]);

        fail_after(0);
        assert!(new_queue().is_none());
    }

    #[test]
    fn delete_dup_on_sorted_queue() {
        let mut q = new_queue();
        for s in &["c", "a", "c", "b", "a", "c"] {
            assert!(insert_head(q.as_mut(), s));
        }
        sort(q.as_mut());
        assert!(delete_dup(q.as_mut()));
        assert_eq!(values(&q), ["b"]);
    }
}
