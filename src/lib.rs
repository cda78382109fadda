//! This crate provides a queue of strings built on an intrusive doubly-linked
//! list, implemented as a cyclic list.
//!
//! The [`Queue`] allows inserting and removing strings at both ends in
//! constant time, and offers a few in-place transformations that only rewrite
//! links: [`reverse`], [`swap`], [`sort`]. [`delete_mid`] and [`delete_dup`]
//! destroy the elements they remove.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//!
//! let mut queue = Queue::new();
//! queue.insert_tail("b").unwrap();
//! queue.insert_tail("a").unwrap();
//! queue.insert_tail("c").unwrap();
//!
//! queue.sort();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), ["a", "b", "c"]);
//!
//! let element = queue.remove_head().unwrap(); // the caller owns it now
//! assert_eq!(element.value(), "a");
//! element.release();
//! assert_eq!(queue.size(), 2);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Link    │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║  String   ║           ║  String   ║                           ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                           │   │
//! │      Node 0                  Node 1                              │   │
//! └──────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                          │
//! ║   ghost   ║ ─────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` only contains a pointer `ghost` to the ghost node. There is no
//! length field: [`Queue::size`] counts the elements on demand.
//!
//! Each element node is allocated on heap, and contains:
//! - the `next` pointer that points to the next element (or the ghost node if
//!   it is the last element in the queue);
//! - the `prev` pointer that points to the previous element (or the ghost node
//!   if it is the first element in the queue);
//! - the `String` payload, a copy of the inserted string.
//!
//! The ghost node is only a pair of links, with *NO* payload.
//!
//! Initially, the `next` and `prev` pointer of the ghost node point to itself.
//!
//! # Ownership
//!
//! The queue owns all of its nodes. Removing an element hands an [`Element`]
//! to the caller, which frees the node and its string when dropped (or
//! [`released`]).
//!
//! # Allocation Failures
//!
//! Allocations go through the global allocator without aborting: a failed
//! insertion returns [`QueueError::AllocationFailure`] and leaves the queue
//! exactly as it was. With the `fault-injection` feature, `alloc::fail_after`
//! makes a chosen allocation fail.
//!
//! # Driver Surface
//!
//! The [`handle`] module exposes every operation over nullable queue handles
//! (`Option<&mut Queue>`), returning flags instead of errors.
//!
//! [`Queue`]: crate::Queue
//! [`Element`]: crate::Element
//! [`reverse`]: crate::Queue::reverse
//! [`swap`]: crate::Queue::swap
//! [`sort`]: crate::Queue::sort
//! [`delete_mid`]: crate::Queue::delete_mid
//! [`delete_dup`]: crate::Queue::delete_dup
//! [`released`]: crate::Element::release

#[doc(inline)]
pub use error::QueueError;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::{Element, Queue};

#[cfg(not(any(test, feature = "fault-injection")))]
mod alloc;
#[cfg(any(test, feature = "fault-injection"))]
pub mod alloc;
mod error;
pub mod handle;
pub mod queue;
