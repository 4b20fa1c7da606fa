//! Integration tests for archives whose process died before shutdown
//!
//! A crash is simulated by leaking the recorder so neither the tar nor the
//! gzip trailer is ever written.

use std::fs::File;

use debug_archive::recorder::runtime::open_session_file;
use debug_archive::{read_archive, recover_archive, EntryKind};

/// Every entry written before the "crash" is recoverable from disk
#[test]
fn test_unfinished_file_archive_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    let (debug, path) = open_session_file(dir.path()).unwrap();

    debug.set_phase("apply");
    for i in 0..5 {
        debug
            .write_file(&format!("hook-{i}"), format!("event {i}").as_bytes())
            .unwrap();
    }
    std::mem::forget(debug);

    assert!(read_archive(File::open(&path).unwrap()).is_err());

    let recovered = recover_archive(File::open(&path).unwrap());
    assert!(!recovered.complete);

    let dirs = recovered
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::Directory)
        .count();
    assert_eq!(dirs, 2);

    let files: Vec<_> = recovered
        .entries
        .iter()
        .filter(|e| e.kind == EntryKind::File)
        .collect();
    assert_eq!(files.len(), 5);
    for (i, entry) in files.iter().enumerate() {
        assert_eq!(entry.step(), Some(i as u64));
        assert_eq!(entry.data, format!("event {i}").as_bytes());
        assert!(entry.path.ends_with(&format!("-apply-hook-{i}")));
    }
}

/// Cutting the stream anywhere never yields a partially written entry
#[test]
fn test_truncation_never_yields_partial_entries() {
    let dir = tempfile::tempdir().unwrap();
    let (debug, path) = open_session_file(dir.path()).unwrap();
    let payloads: Vec<Vec<u8>> = (0..4u8).map(|i| vec![b'a' + i; 700 * (i as usize + 1)]).collect();
    for (i, data) in payloads.iter().enumerate() {
        debug.write_file(&format!("blob{i}"), data).unwrap();
    }
    std::mem::forget(debug);

    let bytes = std::fs::read(&path).unwrap();
    let mut last_count = 0;
    for cut in (0..=bytes.len()).step_by(7) {
        let recovered = recover_archive(&bytes[..cut]);
        let files: Vec<_> = recovered
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .collect();
        for (i, entry) in files.iter().enumerate() {
            assert_eq!(entry.data, payloads[i], "cut at {cut}");
        }
        assert!(files.len() >= last_count, "cut at {cut}");
        last_count = files.len();
    }

    let full = recover_archive(bytes.as_slice());
    assert_eq!(
        full.entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .count(),
        payloads.len()
    );
}

/// A properly shut down archive reads back as complete
#[test]
fn test_finalized_archive_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    let (debug, path) = open_session_file(dir.path()).unwrap();
    debug.write_file("only", b"1").unwrap();
    debug.close().unwrap();

    let recovered = recover_archive(File::open(&path).unwrap());
    assert!(recovered.complete);
    assert_eq!(recovered.entries.len(), 3);
}
