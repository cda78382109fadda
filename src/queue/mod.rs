use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::alloc;
use crate::error::QueueError;
use crate::Iter;

pub mod iterator;

mod algorithms;

/// A queue of strings, built on an intrusive doubly-linked list implemented
/// as a cyclic list.
///
/// Inserting or removing at either end takes constant time. The number of
/// elements is not cached: [`Queue::size`] walks the whole list.
///
/// The `Queue` contains a single pointer `ghost` to the ghost node, a bare
/// pair of links without payload. `ghost.next` is the first element and
/// `ghost.prev` the last one; in an empty queue both point back to the ghost.
///
/// # Naming Conventions
///
/// - `front..=back`: a closed range of list nodes, both inclusive;
/// - `start..end`: a half-open range of list nodes, left inclusive and right
///   exclusive (probably the ghost node).
pub struct Queue {
    ghost: NonNull<Link>,
    _marker: PhantomData<Box<Node>>,
}

/// The link fields shared by the ghost node and every element node.
#[repr(C)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// An element node. `link` must stay the first field: a `NonNull<Link>` of a
/// non-ghost node is cast back to its `Node`.
#[repr(C)]
pub(crate) struct Node {
    #[allow(dead_code)] // only reached through casts of `NonNull<Link>`
    pub(crate) link: Link,
    pub(crate) value: String,
}

/// An element unlinked from a [`Queue`].
///
/// The caller owns it exclusively. Dropping it, or calling
/// [`Element::release`], frees both the node and its string.
pub struct Element {
    node: Box<Node>,
}

impl Link {
    /// Links of a node that is not in any list yet. They are never read
    /// before being overwritten.
    fn dangling() -> Self {
        Link {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

pub(crate) unsafe fn connect(mut prev: NonNull<Link>, mut next: NonNull<Link>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

/// Borrow the string of a non-ghost node.
///
/// It is unsafe because `link` must be an element node (never the ghost)
/// that outlives `'a`.
pub(crate) unsafe fn value_of<'a>(link: NonNull<Link>) -> &'a str {
    &(*link.cast::<Node>().as_ptr()).value
}

pub(crate) unsafe fn next_of(link: NonNull<Link>) -> NonNull<Link> {
    link.as_ref().next
}

pub(crate) unsafe fn prev_of(link: NonNull<Link>) -> NonNull<Link> {
    link.as_ref().prev
}

// private methods
impl Queue {
    fn with_ghost(mut ghost: NonNull<Link>) -> Self {
        // SAFETY: `ghost` was just allocated and is exclusively owned here.
        unsafe {
            ghost.as_mut().next = ghost;
            ghost.as_mut().prev = ghost;
        }
        Self {
            ghost,
            _marker: PhantomData,
        }
    }

    pub(crate) fn ghost_node(&self) -> NonNull<Link> {
        self.ghost
    }
    pub(crate) fn front_node(&self) -> NonNull<Link> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first
        // element in the queue).
        unsafe { next_of(self.ghost) }
    }
    pub(crate) fn back_node(&self) -> NonNull<Link> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last
        // element in the queue).
        unsafe { prev_of(self.ghost) }
    }

    /// Detach a single node `node` from the queue, and return it as an element.
    ///
    /// It is unsafe because it does not check whether `node` belongs to the queue,
    /// or whether it is the ghost node.
    pub(crate) unsafe fn detach_node(&mut self, node: NonNull<Link>) -> Element {
        connect(prev_of(node), next_of(node));
        Element {
            node: Box::from_raw(node.cast::<Node>().as_ptr()),
        }
    }

    /// Attach a single node `node` to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        node: NonNull<Link>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, node);
        connect(node, next);
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, node);
            assert_adjacent(node, next);
        }
    }

    /// Allocate a node holding a copy of `s` and attach it between the
    /// adjacent nodes `prev` and `next`.
    ///
    /// The queue is only touched once both allocations succeeded.
    unsafe fn insert_between(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        s: &str,
    ) -> Result<(), QueueError> {
        let slot = alloc::try_alloc::<Node>()?;
        let value = match alloc::try_dup(s) {
            Ok(value) => value,
            Err(err) => {
                alloc::dealloc(slot);
                return Err(err);
            }
        };
        let node = slot.cast::<Node>();
        node.as_ptr().write(Node {
            link: Link::dangling(),
            value,
        });
        self.attach_node(prev, next, node.cast());
        Ok(())
    }
}

impl Queue {
    /// Create an empty `Queue`.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let ghost = NonNull::from(Box::leak(Box::new(Link::dangling())));
        Self::with_ghost(ghost)
    }

    /// Create an empty `Queue`, reporting a failed allocation of the ghost
    /// node instead of aborting.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::try_new().unwrap();
    /// assert_eq!(queue.size(), 0);
    /// ```
    pub fn try_new() -> Result<Self, QueueError> {
        let ghost = alloc::try_alloc::<Link>()?.cast::<Link>();
        // SAFETY: `ghost` is freshly allocated storage for a `Link`.
        unsafe { ghost.as_ptr().write(Link::dangling()) };
        Ok(Self::with_ghost(ghost))
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_node() == self.ghost_node()
    }

    /// Returns the number of elements, counted by walking the whole list.
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
    /// let mut queue = Queue::new();
    /// assert_eq!(queue.size(), 0);
    ///
    /// queue.insert_tail("a").unwrap();
    /// queue.insert_head("b").unwrap();
    /// assert_eq!(queue.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Destroys all elements of the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn clear(&mut self) {
        while let Some(element) = self.remove_head() {
            element.release();
        }
    }

    /// Provides the first string, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the last string, or `None` if the queue is empty.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Copies `s` into a new element placed first in the queue.
    ///
    /// On an allocation failure the queue is left exactly as it was.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("dolphin").unwrap();
    /// queue.insert_head("bear").unwrap();
    /// assert_eq!(queue.front(), Some("bear"));
    /// ```
    pub fn insert_head(&mut self, s: &str) -> Result<(), QueueError> {
        // SAFETY: the ghost node and its next node are always adjacent.
        unsafe { self.insert_between(self.ghost_node(), self.front_node(), s) }
    }

    /// Copies `s` into a new element placed last in the queue.
    ///
    /// On an allocation failure the queue is left exactly as it was.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("dolphin").unwrap();
    /// queue.insert_tail("bear").unwrap();
    /// assert_eq!(queue.back(), Some("bear"));
    /// ```
    pub fn insert_tail(&mut self, s: &str) -> Result<(), QueueError> {
        // SAFETY: the last node and the ghost node are always adjacent.
        unsafe { self.insert_between(self.back_node(), self.ghost_node(), s) }
    }

    /// Unlinks the first element and hands it to the caller, or returns
    /// `None` if the queue is empty. The element is not destroyed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert!(queue.remove_head().is_none());
    ///
    /// queue.insert_tail("gerbil").unwrap();
    /// let element = queue.remove_head().unwrap();
    /// assert_eq!(element.value(), "gerbil");
    /// assert!(queue.is_empty());
    /// ```
    pub fn remove_head(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the front node is an element.
        Some(unsafe { self.detach_node(self.front_node()) })
    }

    /// Unlinks the last element and hands it to the caller, or returns
    /// `None` if the queue is empty. The element is not destroyed.
    pub fn remove_tail(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the back node is an element.
        Some(unsafe { self.detach_node(self.back_node()) })
    }

    /// Like [`Queue::remove_head`], and also copies the removed string into
    /// `buf` (see [`Element::copy_into`]). `buf` is untouched when nothing is
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("meerkat").unwrap();
    ///
    /// let mut buf = [0xff_u8; 5];
    /// let element = queue.remove_head_into(&mut buf).unwrap();
    /// assert_eq!(&buf, b"meer\0");
    /// assert_eq!(element.value(), "meerkat");
    /// ```
    pub fn remove_head_into(&mut self, buf: &mut [u8]) -> Option<Element> {
        let element = self.remove_head()?;
        element.copy_into(buf);
        Some(element)
    }

    /// Like [`Queue::remove_tail`], and also copies the removed string into
    /// `buf` (see [`Element::copy_into`]).
    pub fn remove_tail_into(&mut self, buf: &mut [u8]) -> Option<Element> {
        let element = self.remove_tail()?;
        element.copy_into(buf);
        Some(element)
    }

    /// Provides a forward iterator over the strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue: Queue = ["a", "b"].iter().collect();
    /// let mut iter = queue.iter();
    /// assert_eq!(iter.next(), Some("a"));
    /// assert_eq!(iter.next(), Some("b"));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Checks the structural invariants of the queue: walking `next` from the
    /// ghost node comes back to it, every `a.next == b` has `b.prev == a`, and
    /// walking `prev` visits as many nodes as walking `next`.
    pub fn is_well_formed(&self) -> bool {
        let ghost = self.ghost_node();
        let (mut forward, mut node) = (0_usize, ghost);
        loop {
            // SAFETY: every node reachable from the ghost node is owned by the queue.
            let (next, back) = unsafe { (next_of(node), prev_of(next_of(node))) };
            if back != node {
                return false;
            }
            node = next;
            if node == ghost {
                break;
            }
            forward += 1;
        }
        let (mut backward, mut node) = (0_usize, ghost);
        loop {
            node = unsafe { prev_of(node) };
            if node == ghost {
                break;
            }
            backward += 1;
        }
        forward == backward
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node has the layout of a `Box<Link>`, and no
        // element refers to it any more.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

impl Element {
    /// The string held by the element.
    #[inline]
    pub fn value(&self) -> &str {
        &self.node.value
    }

    /// Destroys the node and hands its string to the caller.
    pub fn into_value(self) -> String {
        let node = *self.node;
        node.value
    }

    /// Copies up to `buf.len() - 1` bytes of the string into `buf`, followed
    /// by a NUL byte, and returns the number of string bytes copied. An empty
    /// `buf` receives nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("vulture").unwrap();
    /// let element = queue.remove_head().unwrap();
    ///
    /// let mut buf = [0_u8; 16];
    /// assert_eq!(element.copy_into(&mut buf), 7);
    /// assert_eq!(&buf[..8], b"vulture\0");
    /// assert_eq!(element.copy_into(&mut buf[..3]), 2);
    /// assert_eq!(&buf[..3], b"vu\0");
    /// ```
    pub fn copy_into(&self, buf: &mut [u8]) -> usize {
        let room = match buf.len().checked_sub(1) {
            Some(room) => room,
            None => return 0,
        };
        let len = room.min(self.node.value.len());
        buf[..len].copy_from_slice(&self.node.value.as_bytes()[..len]);
        buf[len] = 0;
        len
    }

    /// Destroys the element, freeing its string and its node.
    #[inline]
    pub fn release(self) {
        drop(self)
    }
}

impl Deref for Element {
    type Target = str;

    fn deref(&self) -> &str {
        self.value()
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

#[cfg(test)]
mod tests {
    use crate::alloc::fail_after;
    use crate::{Queue, QueueError};

    fn assert_queue(queue: &Queue, expected: &[&str]) {
        assert!(queue.is_well_formed());
        assert_eq!(queue.iter().collect::<Vec<_>>(), expected);
        assert_eq!(queue.iter().rev().collect::<Vec<_>>(), {
            let mut rev = expected.to_vec();
            rev.reverse();
            rev
        });
        assert_eq!(queue.size(), expected.len());
    }

    #[test]
    fn queue_create() {
        let mut queue = Queue::new();
        assert!(queue.is_empty());
        assert!(queue.is_well_formed());
        queue.insert_tail("a").unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.remove_tail().unwrap().value(), "a");
        assert!(queue.is_empty());

        let queue = Queue::try_new().unwrap();
        assert_queue(&queue, &[]);
    }

    #[test]
    fn queue_insert_and_remove() {
        let mut queue = Queue::new();
        assert!(queue.remove_head().is_none());
        assert!(queue.remove_tail().is_none());
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);

        queue.insert_head("b").unwrap();
        queue.insert_head("a").unwrap();
        queue.insert_tail("c").unwrap();
        assert_queue(&queue, &["a", "b", "c"]);
        assert_eq!(queue.front(), Some("a"));
        assert_eq!(queue.back(), Some("c"));

        assert_eq!(queue.remove_tail().unwrap().into_value(), "c");
        assert_queue(&queue, &["a", "b"]);
        assert_eq!(queue.remove_head().unwrap().into_value(), "a");
        assert_queue(&queue, &["b"]);
        assert_eq!(queue.remove_head().unwrap().into_value(), "b");
        assert_queue(&queue, &[]);
        assert!(queue.remove_head().is_none());
        assert_queue(&queue, &[]);
    }

    #[test]
    fn queue_insert_head_then_remove_head() {
        let mut queue = Queue::new();
        queue.insert_head("").unwrap();
        queue.insert_head("hello world").unwrap();
        let element = queue.remove_head().unwrap();
        assert_eq!(&*element, "hello world");
        element.release();
        assert_eq!(queue.remove_head().unwrap().value(), "");
        assert_eq!(queue.size(), 0);
    }

    #[test]
    fn queue_remove_into_buffer() {
        let mut queue: Queue = ["alpha", "beta"].iter().collect();

        let mut buf = [b'x'; 8];
        let element = queue.remove_tail_into(&mut buf).unwrap();
        assert_eq!(&buf[..5], b"beta\0");
        assert_eq!(element.value(), "beta");

        let mut small = [b'x'; 3];
        let element = queue.remove_head_into(&mut small).unwrap();
        assert_eq!(&small, b"al\0");
        assert_eq!(element.value(), "alpha");

        let mut empty: [u8; 0] = [];
        queue.insert_tail("gamma").unwrap();
        assert_eq!(queue.remove_head_into(&mut empty).unwrap().value(), "gamma");

        let mut untouched = [b'x'; 4];
        assert!(queue.remove_head_into(&mut untouched).is_none());
        assert_eq!(&untouched, b"xxxx");
    }

    #[test]
    fn queue_allocation_failure_leaves_queue_unchanged() {
        let mut queue: Queue = ["a", "b"].iter().collect();

        // The node allocation fails.
        fail_after(0);
        let err = queue.insert_head("c").unwrap_err();
        assert!(matches!(err, QueueError::AllocationFailure { .. }));
        assert_queue(&queue, &["a", "b"]);

        // The node succeeds, the string duplication fails.
        fail_after(1);
        let err = queue.insert_tail("long string").unwrap_err();
        assert!(matches!(err, QueueError::AllocationFailure { layout } if layout.size() == 11));
        assert_queue(&queue, &["a", "b"]);

        queue.insert_tail("c").unwrap();
        assert_queue(&queue, &["a", "b", "c"]);

        fail_after(0);
        assert!(Queue::try_new().is_err());
    }

    #[test]
    fn queue_clear() {
        let mut queue: Queue = ["x", "y", "z"].iter().collect();
        queue.clear();
        assert_queue(&queue, &[]);
        queue.clear();
        queue.insert_head("w").unwrap();
        assert_queue(&queue, &["w"]);
    }

    #[test]
    fn queue_debug() {
        let queue: Queue = ["a", "b"].iter().collect();
        assert_eq!(format!("{:?}", queue), r#"["a", "b"]"#);
        let mut queue = queue;
        let element = queue.remove_head().unwrap();
        assert_eq!(format!("{:?}", element), r#"Element("a")"#);
    }
}
