//! Allocation accounting for the produce/release pairs.
//!
//! A counting global allocator tracks live blocks per thread, so tests
//! running in parallel do not see each other's allocations. Each test warms
//! its path up once so lazily initialised statics are not counted.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ffi::c_char;
use std::ptr;

use wirewizard::{
    config_response, freeConfig, freeInterfacesName, freeStats, freeString, generate_keys_with,
    interfaces_response, stats_response,
};
use wirewizard_core::SearchPaths;

mod support;
use support::*;

struct Counting;

thread_local! {
    static BLOCKS: Cell<isize> = const { Cell::new(0) };
    static BYTES: Cell<isize> = const { Cell::new(0) };
}

fn adjust(blocks: isize, bytes: isize) {
    let _ = BLOCKS.try_with(|c| c.set(c.get() + blocks));
    let _ = BYTES.try_with(|c| c.set(c.get() + bytes));
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let block = unsafe { System.alloc(layout) };
        if !block.is_null() {
            adjust(1, layout.size() as isize);
        }
        block
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let block = unsafe { System.alloc_zeroed(layout) };
        if !block.is_null() {
            adjust(1, layout.size() as isize);
        }
        block
    }

    unsafe fn dealloc(&self, block: *mut u8, layout: Layout) {
        unsafe { System.dealloc(block, layout) };
        adjust(-1, -(layout.size() as isize));
    }

    unsafe fn realloc(&self, block: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let moved = unsafe { System.realloc(block, layout, new_size) };
        if !moved.is_null() {
            adjust(0, new_size as isize - layout.size() as isize);
        }
        moved
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn live() -> (isize, isize) {
    (BLOCKS.with(Cell::get), BYTES.with(Cell::get))
}

/// Produce, check that something is held, release, check nothing is left.
fn assert_balanced<T>(produce: impl Fn() -> *mut T, release: impl Fn(*mut T)) {
    release(produce());

    let before = live();
    let result = produce();
    assert!(!result.is_null(), "expected a record");
    assert!(live().0 > before.0, "record should own allocations");
    release(result);
    assert_eq!(live(), before, "allocation leaked or double-released");
}

fn fixture_dirs() -> (tempfile::TempDir, SearchPaths) {
    let tmp = tempfile::tempdir().unwrap();
    let etc = tmp.path().join("etc");
    let local = tmp.path().join("local");
    write_conf(&etc, "wg0", "Address = 10.0.0.2/32\nDNS = 1.1.1.1\nPresharedKey = cHNr\n");
    write_conf(&local, "wg1", "PersistentKeepalive = 25\n");
    write_conf(
        &local,
        "office",
        &format!("PrivateKey = {ALICE_PRIVATE}\nPublicKey = {BOB_PUBLIC}\n"),
    );
    let paths = SearchPaths::new(vec![etc, local]);
    (tmp, paths)
}

#[test]
fn interface_names_release_everything() {
    let (_tmp, paths) = fixture_dirs();
    assert_balanced(
        || interfaces_response(&paths),
        |r| unsafe { freeInterfacesName(r) },
    );
}

#[test]
fn live_config_releases_everything() {
    let (_tmp, paths) = fixture_dirs();
    assert_balanced(
        || config_response::<LiveClient>(&paths, "wg0"),
        |r| unsafe { freeConfig(r) },
    );
}

#[test]
fn fallback_config_releases_everything() {
    let (_tmp, paths) = fixture_dirs();
    assert_balanced(
        || config_response::<EmptyClient>(&paths, "office"),
        |r| unsafe { freeConfig(r) },
    );
}

#[test]
fn stats_release_everything() {
    assert_balanced(|| stats_response::<LiveClient>("wg0"), |r| unsafe { freeStats(r) });
}

#[test]
fn generated_keys_release_everything() {
    let generate = || {
        let mut priv_key: *mut c_char = ptr::null_mut();
        let mut pub_key: *mut c_char = ptr::null_mut();
        let err = unsafe { generate_keys_with(&mut rand::rngs::OsRng, &mut priv_key, &mut pub_key) };
        assert!(err.is_null());
        (priv_key, pub_key)
    };

    let (p, q) = generate();
    unsafe {
        freeString(p);
        freeString(q);
    }

    let before = live();
    let (priv_key, pub_key) = generate();
    assert_eq!(live().0, before.0 + 2);
    unsafe {
        freeString(priv_key);
        freeString(pub_key);
    }
    assert_eq!(live(), before);
}

#[test]
fn failure_message_releases_everything() {
    assert_balanced(
        || {
            let mut priv_key: *mut c_char = ptr::null_mut();
            let mut pub_key: *mut c_char = ptr::null_mut();
            unsafe { generate_keys_with(&mut BrokenRng, &mut priv_key, &mut pub_key) }
        },
        |r| unsafe { freeString(r) },
    );
}

#[test]
fn absent_results_hold_nothing() {
    let (_tmp, paths) = fixture_dirs();
    config_response::<EmptyClient>(&paths, "ghost");

    let before = live();
    let cfg = config_response::<EmptyClient>(&paths, "ghost");
    assert!(cfg.is_null());
    unsafe { freeConfig(cfg) };
    assert_eq!(live(), before);
}
