//! Phase 4 tests: CLI integration, C ABI and end-to-end flows.

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::{tempdir, NamedTempFile};

use tree_traversal::cache::AttributeCaches;
use tree_traversal::engine::TrueBCounter;
use tree_traversal::facade::CacheConfig;
use tree_traversal::ffi::c_api::{
    ttrav_clear_cache, ttrav_count, ttrav_graph_free, ttrav_graph_new, ttrav_graph_node_count,
    ttrav_graph_open, ttrav_graph_save, ttrav_populate,
};
use tree_traversal::format::{TreeReader, TreeWriter};
use tree_traversal::graph::{populate, TreeGraph, TreeShape};

// ==================== CLI Helpers ====================

/// Locate the `ttrav` binary built alongside test binaries.
fn ttrav_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("ttrav");
    path
}

/// Run the `ttrav` CLI with the given arguments and return the output.
fn run_ttrav(args: &[&str]) -> Output {
    Command::new(ttrav_bin())
        .args(args)
        .output()
        .expect("Failed to run ttrav")
}

/// Helper: assert a command succeeded, printing stderr on failure.
fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "ttrav failed with status {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

/// Helper: get stdout as a string from an Output.
fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Populate a fresh file with depth 2, fanout 2 and return the expected count.
fn populate_file(path: &Path) -> i64 {
    let output = run_ttrav(&[
        "--format",
        "json",
        "populate",
        path.to_str().unwrap(),
        "--depth",
        "2",
        "--fanout",
        "2",
        "--seed",
        "11",
    ]);
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    assert_eq!(report["total_nodes"], 31);
    report["true_b_nodes"].as_i64().unwrap()
}

// ==================== CLI Tests ====================

#[test]
fn test_cli_populate_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");

    let output = run_ttrav(&[
        "populate",
        path.to_str().unwrap(),
        "--depth",
        "1",
        "--fanout",
        "3",
    ]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert_eq!(stdout.lines().next(), Some("13"));
    assert!(stdout.contains("depth 1, fanout 3"));
    assert!(path.exists());
}

#[test]
fn test_cli_populate_twice_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    populate_file(&path);

    let output = run_ttrav(&["populate", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));
}

#[test]
fn test_cli_traverse_bfs_and_dfs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    let expected = populate_file(&path);
    let file = path.to_str().unwrap();

    let bfs = run_ttrav(&["traverse", file]);
    assert_success(&bfs);
    assert_eq!(stdout_str(&bfs).trim(), expected.to_string());

    let dfs = run_ttrav(&["traverse", file, "--depth-first"]);
    assert_success(&dfs);
    assert_eq!(stdout_str(&dfs).trim(), expected.to_string());
}

#[test]
fn test_cli_traverse_cached_repeat() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    let expected = populate_file(&path);

    let output = run_ttrav(&[
        "traverse",
        path.to_str().unwrap(),
        "--cache",
        "label,property",
        "--repeat",
        "3",
    ]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    for run in 1..=3 {
        assert!(
            stdout.contains(&format!("Run {}: {} (", run, expected)),
            "missing run {} in:\n{}",
            run,
            stdout
        );
    }
    assert!(stdout.contains("Hit ratio (labels) = "));
    assert!(stdout.contains("Hit ratio (properties) = "));
}

#[test]
fn test_cli_traverse_json_clear_between() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    let expected = populate_file(&path);

    let output = run_ttrav(&[
        "--format",
        "json",
        "traverse",
        path.to_str().unwrap(),
        "--cache",
        "all",
        "--repeat",
        "2",
        "--clear-between",
    ]);
    assert_success(&output);
    let result: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();

    assert_eq!(result["order"], "breadth_first");
    assert_eq!(result["cache"], "label,property");
    let runs = result["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 2);
    for run in runs {
        assert_eq!(run["count"].as_i64(), Some(expected));
        assert_eq!(run["visited"], 31);
    }
    // Counters were reset before the second run, which saw only misses.
    assert_eq!(result["cache_report"]["labels"]["misses"], 31);
    assert_eq!(result["cache_report"]["labels"]["entries"], 31);
}

#[test]
fn test_cli_traverse_uncached_has_no_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    populate_file(&path);

    let output = run_ttrav(&["--format", "json", "traverse", path.to_str().unwrap()]);
    assert_success(&output);
    let result: serde_json::Value = serde_json::from_str(&stdout_str(&output)).unwrap();
    assert_eq!(result["cache"], "none");
    assert!(result["cache_report"].is_null());
}

#[test]
fn test_cli_traverse_empty_file_prints_no_root() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.ttree");
    TreeWriter::new()
        .write_to_file(&TreeGraph::new(), &path)
        .unwrap();

    let output = run_ttrav(&["traverse", path.to_str().unwrap()]);
    assert_success(&output);
    assert_eq!(stdout_str(&output).trim(), "-1");
}

#[test]
fn test_cli_info() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tree.ttree");
    populate_file(&path);

    let output = run_ttrav(&["info", path.to_str().unwrap()]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("Nodes: 31"));
    assert!(stdout.contains("Edges: 30"));
    assert!(stdout.contains("Roots: [0]"));
    assert!(stdout.contains("  B: 10"));
    assert!(stdout.contains("  HAS_A: 20"));

    let json = run_ttrav(&["--format", "json", "info", path.to_str().unwrap()]);
    assert_success(&json);
    let info: serde_json::Value = serde_json::from_str(&stdout_str(&json)).unwrap();
    assert_eq!(info["labels"]["A"], 21);
    assert_eq!(info["relations"]["HAS_B"], 10);
}

#[test]
fn test_cli_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.ttree");

    let output = run_ttrav(&["traverse", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_cli_garbage_file() {
    let tmp = NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), vec![0xAB; 128]).unwrap();

    let output = run_ttrav(&["traverse", tmp.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
}

// ==================== C ABI Tests ====================

#[test]
fn test_ffi_populate_and_count() {
    let graph = ttrav_graph_new();
    assert!(!graph.is_null());

    unsafe {
        assert_eq!(ttrav_count(graph, false, std::ptr::null()), -1);
        assert_eq!(ttrav_populate(graph, 2, 2, 42), 31);
        assert_eq!(ttrav_graph_node_count(graph), 31);

        let bfs = ttrav_count(graph, false, std::ptr::null());
        let dfs = ttrav_count(graph, true, std::ptr::null());
        assert!(bfs >= 0);
        assert_eq!(bfs, dfs);

        // Second populate is refused.
        assert_eq!(ttrav_populate(graph, 2, 2, 42), -5);

        ttrav_graph_free(graph);
    }
}

#[test]
fn test_ffi_null_handles() {
    unsafe {
        assert_eq!(ttrav_graph_node_count(std::ptr::null_mut()), 0);
        assert_eq!(ttrav_count(std::ptr::null_mut(), false, std::ptr::null()), -6);
        assert_eq!(ttrav_populate(std::ptr::null_mut(), 1, 1, 0), -6);
        assert!(ttrav_graph_open(std::ptr::null()).is_null());
        ttrav_graph_free(std::ptr::null_mut());
    }
}

#[test]
fn test_ffi_save_and_open() {
    let dir = tempdir().unwrap();
    let path = CString::new(dir.path().join("ffi.ttree").to_str().unwrap()).unwrap();
    let missing = CString::new(dir.path().join("missing.ttree").to_str().unwrap()).unwrap();

    unsafe {
        let graph = ttrav_graph_new();
        assert_eq!(ttrav_populate(graph, 1, 3, 9), 13);
        let expected = ttrav_count(graph, false, std::ptr::null());
        assert_eq!(ttrav_graph_save(graph, path.as_ptr()), 0);
        ttrav_graph_free(graph);

        let opened = ttrav_graph_open(path.as_ptr());
        assert!(!opened.is_null());
        assert_eq!(ttrav_graph_node_count(opened), 13);
        assert_eq!(ttrav_count(opened, true, std::ptr::null()), expected);
        ttrav_graph_free(opened);

        assert!(ttrav_graph_open(missing.as_ptr()).is_null());
    }
}

#[test]
fn test_ffi_count_with_cache_selector() {
    // The C ABI seeds the same generator, so the library run predicts its tree.
    let mut graph = TreeGraph::new();
    let report = populate(&mut graph, TreeShape::new(2, 2), &mut StdRng::seed_from_u64(8)).unwrap();
    let selector = CString::new("label,property").unwrap();

    unsafe {
        let handle = ttrav_graph_new();
        assert_eq!(ttrav_populate(handle, 2, 2, 8), report.total_nodes as i64);
        let count = ttrav_count(handle, false, selector.as_ptr());
        assert_eq!(count, report.true_b_nodes as i64);
        assert_eq!(ttrav_count(handle, true, selector.as_ptr()), count);

        assert_eq!(ttrav_clear_cache(handle), 0);
        assert_eq!(ttrav_count(handle, false, selector.as_ptr()), count);
        ttrav_graph_free(handle);

        assert_eq!(ttrav_clear_cache(std::ptr::null_mut()), -6);
    }
}

#[test]
fn test_ffi_handles_keep_separate_caches() {
    let selector = CString::new("label,property").unwrap();

    unsafe {
        let first = ttrav_graph_new();
        let second = ttrav_graph_new();
        assert_eq!(ttrav_populate(first, 2, 3, 1), 121);
        assert_eq!(ttrav_populate(second, 2, 3, 99), 121);

        let first_uncached = ttrav_count(first, false, std::ptr::null());
        let second_uncached = ttrav_count(second, false, std::ptr::null());
        assert_ne!(first_uncached, second_uncached);

        // Same node ids, different values: each handle must answer from its own graph.
        assert_eq!(ttrav_count(first, false, selector.as_ptr()), first_uncached);
        assert_eq!(ttrav_count(second, false, selector.as_ptr()), second_uncached);
        assert_eq!(ttrav_count(first, true, selector.as_ptr()), first_uncached);
        assert_eq!(ttrav_count(second, true, selector.as_ptr()), second_uncached);

        ttrav_graph_free(first);
        ttrav_graph_free(second);
    }
}

// ==================== End-to-End Library Tests ====================

#[test]
fn test_populate_save_load_count() {
    let mut graph = TreeGraph::new();
    let report = populate(&mut graph, TreeShape::new(3, 2), &mut StdRng::seed_from_u64(99)).unwrap();

    let tmp = NamedTempFile::new().unwrap();
    TreeWriter::new().write_to_file(&graph, tmp.path()).unwrap();
    let loaded = TreeReader::read_from_file(tmp.path()).unwrap();

    let caches = AttributeCaches::new();
    let counter = TrueBCounter::new(&loaded, caches.facade(CacheConfig::ALL));
    assert_eq!(counter.count(false).unwrap(), report.true_b_nodes as i64);
    assert_eq!(counter.count(true).unwrap(), report.true_b_nodes as i64);

    let report = caches.report();
    assert_eq!(report.labels.entries, loaded.node_count());
    assert!(report.labels.hit_ratio.unwrap() >= 0.5);
}

#[test]
fn test_clear_between_runs_keeps_count() {
    let mut graph = TreeGraph::new();
    let report = populate(&mut graph, TreeShape::new(2, 3), &mut StdRng::seed_from_u64(4)).unwrap();

    let caches = AttributeCaches::new();
    let counter = TrueBCounter::new(&graph, caches.facade(CacheConfig::ALL));
    for _ in 0..3 {
        assert_eq!(counter.count(false).unwrap(), report.true_b_nodes as i64);
        caches.clear();
        assert!(caches.labels().is_empty());
        assert!(caches.properties().is_empty());
    }
}
