//! Checks that every operation which destroys elements gives their memory
//! back: each element is one node plus one string allocation, and a queue
//! adds its ghost node.

use cyclic_queue::{handle, Queue};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

struct CountingAlloc;

thread_local! {
    // Live allocations made by the current thread.
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

fn track(delta: isize) {
    let _ = LIVE.try_with(|live| live.set(live.get() + delta));
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            track(1);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        track(-1);
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn live() -> isize {
    LIVE.with(Cell::get)
}

fn queue_of(items: &[&str]) -> Queue {
    let mut queue = Queue::new();
    for item in items {
        queue.insert_tail(item).unwrap();
    }
    queue
}

// Event callsites register themselves the first time they fire.
fn warm_up() {
    let mut queue = queue_of(&["b", "a", "a"]);
    queue.sort();
    queue.delete_dup().unwrap();
    queue.delete_mid().unwrap();
}

#[test]
fn queue_drop() {
    let before = live();
    let queue = queue_of(&["a", "b", "c"]);
    assert_eq!(live() - before, 1 + 3 * 2);
    drop(queue);
    assert_eq!(live(), before);

    let before = live();
    let queue = handle::new_queue();
    assert_eq!(live() - before, 1);
    handle::free_queue(queue);
    assert_eq!(live(), before);
}

#[test]
fn free_queue_destroys_elements_then_ghost() {
    warm_up();
    let before = live();
    let mut queue = queue_of(&["d", "b", "a", "c"]);
    queue.sort();
    queue.reverse();
    queue.swap();
    assert_eq!(live() - before, 1 + 4 * 2);
    handle::free_queue(Some(queue));
    assert_eq!(live(), before);
}

#[test]
fn clear_destroys_elements_only() {
    let mut queue = queue_of(&["a", "b"]);
    let before = live();
    queue.clear();
    assert_eq!(before - live(), 2 * 2);
    assert!(queue.is_empty());
}

#[test]
fn delete_mid_destroys_one_element() {
    warm_up();
    let mut queue = queue_of(&["1", "2", "3", "4", "5", "6"]);
    let before = live();
    assert!(handle::delete_mid(Some(&mut queue)));
    assert_eq!(before - live(), 2);

    let mut queue = queue_of(&["only"]);
    let before = live();
    queue.delete_mid().unwrap();
    assert_eq!(before - live(), 2);
    assert!(queue.is_empty());
}

#[test]
fn delete_dup_destroys_every_repeated_element() {
    warm_up();
    let mut queue = queue_of(&["a", "a", "b", "c", "c", "c"]);
    let before = live();
    assert!(handle::delete_dup(Some(&mut queue)));
    assert_eq!(before - live(), 5 * 2);
    assert_eq!(queue.front(), Some("b"));
}

#[test]
fn remove_hands_over_without_freeing() {
    let mut queue = queue_of(&["gerbil", "meerkat"]);
    let before = live();
    let head = queue.remove_head().unwrap();
    let mut buf = [0_u8; 4];
    let tail = handle::remove_tail(Some(&mut queue), Some(&mut buf[..])).unwrap();
    assert_eq!(live(), before);

    handle::release_element(head);
    assert_eq!(before - live(), 2);
    tail.release();
    assert_eq!(before - live(), 4);
}

#[test]
fn relinking_neither_allocates_nor_frees() {
    warm_up();
    let mut queue = queue_of(&["c", "a", "b", "a"]);
    let before = live();
    queue.sort();
    queue.reverse();
    queue.swap();
    assert_eq!(live(), before);
}

#[test]
fn into_value_frees_the_node_only() {
    let mut queue = queue_of(&["a"]);
    let before = live();
    let value = queue.remove_head().unwrap().into_value();
    assert_eq!(before - live(), 1);
    drop(value);
    assert_eq!(before - live(), 2);
}
