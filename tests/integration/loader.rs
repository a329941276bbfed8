#![allow(missing_docs)]

use std::fs;

use grafito::{load_path, GrafitoError};
use tempfile::tempdir;

#[test]
fn loads_from_disk_with_interned_dictionaries() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("graph.lg");
    fs::write(
        &path,
        "# authors\nv 0 person\nv 1 paper\ne 0 1 writes\n",
    )
    .expect("write sample");

    let loaded = load_path(&path).expect("file parses");
    assert_eq!(loaded.index.store().vertex_count(), 2);
    assert_eq!(loaded.index.store().edge_count(), 1);
    assert_eq!(loaded.vertex_labels.resolve(0), Some("person"));
    assert_eq!(loaded.edge_labels.resolve(0), Some("writes"));
}

#[test]
fn malformed_file_aborts_with_line_number() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.lg");
    fs::write(&path, "#\nv 0 a\nv 5 b\n").expect("write sample");

    match load_path(&path) {
        Err(GrafitoError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn missing_file_surfaces_io_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.lg");
    assert!(matches!(load_path(&path), Err(GrafitoError::Io(_))));
}
