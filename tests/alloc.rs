//! Checks that reused sets stop allocating.
//!
//! Allocations are counted per thread so tests running in parallel do not
//! see each other's allocations.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::hint::black_box;

use visitset::{Dense, Set, SetParams};

struct Counting;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn bump() {
    let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        bump();
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        bump();
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        bump();
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn allocations<F: FnOnce()>(f: F) -> usize {
    let before = ALLOCATIONS.with(Cell::get);
    f();
    ALLOCATIONS.with(Cell::get) - before
}

#[test]
fn counter_sees_allocations() {
    assert!(allocations(|| drop(black_box(Vec::<u64>::with_capacity(16)))) >= 1);
}

#[test]
fn new_sets_do_not_allocate() {
    let n = allocations(|| {
        let s = black_box(Set::new());
        assert!(!s.contains(1));
        assert_eq!(s.keys(), None);
        let d = black_box(Dense::new());
        assert!(!d.contains(1));
    });
    assert_eq!(n, 0);
}

#[test]
fn set_reset_reuses_lists() {
    let mut s = Set::new();
    s.extend(0..4096);
    assert!(s.bucket_count() > 1);

    for _ in 0..3 {
        s.reset();
        let n = allocations(|| {
            for k in 0..4096 {
                assert!(s.add(k));
            }
        });
        assert_eq!(n, 0, "repopulating after reset allocated");
    }

    s.reset();
    let n = allocations(|| {
        for k in 0..1000 {
            assert!(s.add(k));
        }
    });
    assert_eq!(n, 0, "smaller repopulation after reset allocated");
}

#[test]
fn set_reset_reuses_lists_with_params() {
    let mut s = Set::with_params(SetParams {
        min_diff: 4,
        list_capacity: 2,
    });
    let keys: Vec<usize> = (0..2048).map(|i| i * 64).collect();
    s.extend(keys.iter().copied());
    s.reset();
    let n = allocations(|| s.extend(keys.iter().copied()));
    assert_eq!(n, 0);
}

#[test]
fn set_probes_do_not_allocate() {
    let s: Set = (0..512).collect();
    let n = allocations(|| {
        for k in 0..1024 {
            black_box(s.contains(k));
        }
        for k in s.iter() {
            black_box(k);
        }
    });
    assert_eq!(n, 0);
}

#[test]
fn dense_grow_then_add() {
    let mut d = Dense::new();
    d.grow(10_000);
    let n = allocations(|| {
        for k in 0..=10_000 {
            d.add(k);
        }
    });
    assert_eq!(n, 0);
    assert_eq!(d.count(), 10_001);
}

#[test]
fn dense_reset_reuses_words() {
    let mut d = Dense::new();
    for k in 0..5000 {
        d.add(k);
    }
    for _ in 0..3 {
        d.reset();
        let n = allocations(|| {
            for k in (0..5000).rev() {
                assert!(!d.contains(k));
                d.add(k);
            }
        });
        assert_eq!(n, 0, "repopulating after reset allocated");
    }
}

#[test]
fn dense_contains_past_end_does_not_allocate() {
    let mut d = Dense::new();
    d.add(1);
    let n = allocations(|| {
        assert!(!d.contains(1 << 30));
    });
    assert_eq!(n, 0);
}

#[test]
fn cloned_set_reuses_lists() {
    let mut s = Set::new();
    s.extend(0..4096);
    s.reset();

    let mut c = s.clone();
    let n = allocations(|| c.extend(0..4096));
    assert_eq!(n, 0, "repopulating a clone allocated");
}
