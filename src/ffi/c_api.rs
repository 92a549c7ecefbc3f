//! C-compatible FFI bindings.
//!
//! Graph handles are opaque pointers to a [`GraphHandle`]: a [`TreeGraph`]
//! together with the [`AttributeCaches`] shared by every count on that graph.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cache::AttributeCaches;
use crate::engine::TrueBCounter;
use crate::facade::CacheConfig;
use crate::format::{TreeReader, TreeWriter};
use crate::graph::{populate, TreeGraph, TreeShape};
use crate::types::TrvError;

const TTRAV_OK: i32 = 0;
const TTRAV_ERR_IO: i32 = -2;
const TTRAV_ERR_INVALID: i32 = -3;
const TTRAV_ERR_NOT_FOUND: i32 = -4;
const TTRAV_ERR_EXISTS: i32 = -5;
const TTRAV_ERR_NULL_PTR: i32 = -6;

/// A graph and its attribute caches. Cache entries are keyed by node id, so
/// they never outlive or cross the graph they were filled from.
pub struct GraphHandle {
    graph: TreeGraph,
    caches: AttributeCaches,
}

impl GraphHandle {
    fn new(graph: TreeGraph) -> Self {
        Self {
            graph,
            caches: AttributeCaches::new(),
        }
    }

    fn into_raw(self) -> *mut std::ffi::c_void {
        Box::into_raw(Box::new(self)) as *mut std::ffi::c_void
    }
}

fn error_code(err: &TrvError) -> i32 {
    match err {
        TrvError::Io(_) => TTRAV_ERR_IO,
        TrvError::NodeNotFound(_)
        | TrvError::InvalidEdgeTarget(_)
        | TrvError::PropertyNotFound { .. } => TTRAV_ERR_NOT_FOUND,
        TrvError::TreeExists { .. } => TTRAV_ERR_EXISTS,
        _ => TTRAV_ERR_INVALID,
    }
}

/// Borrow an optional C string; NULL maps to `Ok(None)`.
unsafe fn opt_str<'a>(s: *const c_char) -> Result<Option<&'a str>, i32> {
    if s.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(s) }
        .to_str()
        .map(Some)
        .map_err(|_| TTRAV_ERR_INVALID)
}

/// Create a new empty graph. Returns handle or NULL on failure.
#[no_mangle]
pub extern "C" fn ttrav_graph_new() -> *mut std::ffi::c_void {
    std::panic::catch_unwind(|| GraphHandle::new(TreeGraph::new()).into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Load a graph from a .ttree file. Returns handle or NULL on failure.
///
/// # Safety
///
/// `path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ttrav_graph_open(path: *const c_char) -> *mut std::ffi::c_void {
    std::panic::catch_unwind(|| {
        let path = match unsafe { opt_str(path) } {
            Ok(Some(p)) => p,
            _ => return std::ptr::null_mut(),
        };
        match TreeReader::read_from_file(Path::new(path)) {
            Ok(graph) => GraphHandle::new(graph).into_raw(),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Save a graph to a .ttree file. Returns TTRAV_OK or error code.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library; `path` must be NULL
/// or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ttrav_graph_save(graph: *mut std::ffi::c_void, path: *const c_char) -> i32 {
    std::panic::catch_unwind(|| {
        if graph.is_null() {
            return TTRAV_ERR_NULL_PTR;
        }
        let path = match unsafe { opt_str(path) } {
            Ok(Some(p)) => p,
            Ok(None) => return TTRAV_ERR_NULL_PTR,
            Err(code) => return code,
        };
        let handle = unsafe { &*(graph as *const GraphHandle) };
        match TreeWriter::new().write_to_file(&handle.graph, Path::new(path)) {
            Ok(()) => TTRAV_OK,
            Err(e) => error_code(&e),
        }
    })
    .unwrap_or(TTRAV_ERR_IO)
}

/// Free a graph handle.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library not freed before.
#[no_mangle]
pub unsafe extern "C" fn ttrav_graph_free(graph: *mut std::ffi::c_void) {
    if !graph.is_null() {
        let _ = std::panic::catch_unwind(|| unsafe {
            drop(Box::from_raw(graph as *mut GraphHandle));
        });
    }
}

/// Get node count.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library.
#[no_mangle]
pub unsafe extern "C" fn ttrav_graph_node_count(graph: *mut std::ffi::c_void) -> u64 {
    std::panic::catch_unwind(|| {
        if graph.is_null() {
            return 0;
        }
        let handle = unsafe { &*(graph as *const GraphHandle) };
        handle.graph.node_count() as u64
    })
    .unwrap_or(0)
}

/// Generate a tree into the graph. Returns the node count or a negative error code.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library, not used concurrently.
#[no_mangle]
pub unsafe extern "C" fn ttrav_populate(
    graph: *mut std::ffi::c_void,
    depth: u32,
    fanout: u32,
    seed: u64,
) -> i64 {
    std::panic::catch_unwind(|| {
        if graph.is_null() {
            return TTRAV_ERR_NULL_PTR as i64;
        }
        let handle = unsafe { &mut *(graph as *mut GraphHandle) };
        let mut rng = StdRng::seed_from_u64(seed);
        match populate(&mut handle.graph, TreeShape::new(depth, fanout), &mut rng) {
            Ok(report) => report.total_nodes as i64,
            Err(e) => error_code(&e) as i64,
        }
    })
    .unwrap_or(TTRAV_ERR_IO as i64)
}

/// Count the true B nodes. `cache` selects what to memoize ("label",
/// "property", "label,property"; NULL for none) in the handle's caches.
/// Returns the count, -1 when the graph has no root, or an error code below -1.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library; `cache` must be NULL
/// or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ttrav_count(
    graph: *mut std::ffi::c_void,
    depth_first: bool,
    cache: *const c_char,
) -> i64 {
    std::panic::catch_unwind(|| {
        if graph.is_null() {
            return TTRAV_ERR_NULL_PTR as i64;
        }
        let selector = match unsafe { opt_str(cache) } {
            Ok(s) => s,
            Err(code) => return code as i64,
        };
        let handle = unsafe { &*(graph as *const GraphHandle) };
        let attrs = handle.caches.facade(CacheConfig::parse(selector));
        match TrueBCounter::new(&handle.graph, attrs).count(depth_first) {
            Ok(count) => count,
            Err(e) => error_code(&e) as i64,
        }
    })
    .unwrap_or(TTRAV_ERR_IO as i64)
}

/// Clear the attribute caches of a graph handle. Returns TTRAV_OK or error code.
///
/// # Safety
///
/// `graph` must be NULL or a handle from this library.
#[no_mangle]
pub unsafe extern "C" fn ttrav_clear_cache(graph: *mut std::ffi::c_void) -> i32 {
    std::panic::catch_unwind(|| {
        if graph.is_null() {
            return TTRAV_ERR_NULL_PTR;
        }
        let handle = unsafe { &*(graph as *const GraphHandle) };
        handle.caches.clear();
        TTRAV_OK
    })
    .unwrap_or(TTRAV_ERR_IO)
}
