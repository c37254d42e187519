//! Command tests against real files.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tinfoc::commands::{
    check_files, copy_types, dump_file, roundtrip_file, CliError, CliOptions,
};
use tinfo_types::{decode, DecodeOptions, FormatFlags, FormatVersion, TypeRef};

/// Int, Bool, (Int -> Bool), Cool = Int, List<Cool>
const SAMPLE: &[u8] = &[
    0, 1, 4, 5, //
    8, //
    10, //
    2, 2, 0, 1, //
    3, 4, b'C', b'o', b'o', b'l', 0, //
    6, 3,
];

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn options(args: &[&str]) -> CliOptions {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    CliOptions::parse(&args).unwrap()
}

#[test]
fn dump_prints_every_node() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sample.tinfo", SAMPLE);

    let out = dump_file(&path, &options(&[])).unwrap();
    assert_eq!(
        out,
        "type count: 5\n0: Int\n1: Bool\n2: (Int -> Bool)\n3: Cool\n4: List<Cool>\n"
    );

    let expanded = dump_file(&path, &options(&["--expand-aliases"])).unwrap();
    assert!(expanded.ends_with("4: List<Cool => Int>\n"));
}

#[test]
fn dump_mentions_trailing_octets() {
    let dir = TempDir::new().unwrap();
    let mut bytes = SAMPLE.to_vec();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    let path = write(&dir, "padded.tinfo", &bytes);

    let out = dump_file(&path, &options(&[])).unwrap();
    assert!(out.ends_with("(2 trailing octets)\n"));
}

#[test]
fn missing_file() {
    let dir = TempDir::new().unwrap();
    let err = dump_file(&dir.path().join("absent.tinfo"), &options(&[])).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
}

#[test]
fn version_option_applies_to_reading() {
    let dir = TempDir::new().unwrap();
    let mut bytes = SAMPLE.to_vec();
    bytes[2] = 2;
    let path = write(&dir, "old.tinfo", &bytes);

    let err = dump_file(&path, &options(&[])).unwrap_err();
    assert!(matches!(err, CliError::Decode { .. }));
    assert!(err.to_string().contains("expected 0.1.4, found 0.1.2"));

    assert!(dump_file(&path, &options(&["--version=0.1.2"])).is_ok());
}

#[test]
fn roundtrip_is_identical() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sample.tinfo", SAMPLE);

    let report = roundtrip_file(&path, &options(&[])).unwrap();
    assert_eq!(report.nodes, 5);
    assert_eq!(report.octets, SAMPLE.len());
    assert!(report.identical);
    assert_eq!(report.first_difference, None);
}

#[test]
fn check_reports_each_file_in_order() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.tinfo", SAMPLE);
    let bad = write(&dir, "bad.tinfo", &[0, 1, 4, 1, 6, 7]);
    let copy = write(&dir, "copy.tinfo", SAMPLE);

    let reports = check_files(&[good.clone(), bad.clone(), copy.clone()], &options(&[]));
    let paths: Vec<&Path> = reports.iter().map(|r| r.path.as_path()).collect();
    assert_eq!(paths, vec![good.as_path(), bad.as_path(), copy.as_path()]);

    let good = reports[0].outcome.as_ref().unwrap();
    let copy = reports[2].outcome.as_ref().unwrap();
    assert_eq!(good.nodes, 5);
    assert_eq!(good.fingerprint, copy.fingerprint);
    assert_eq!(good.fingerprint, tinfo_types::fnv::fnv1a(SAMPLE));
    assert!(matches!(reports[1].outcome, Err(CliError::Decode { .. })));
}

#[test]
fn copy_extracts_reachable_nodes() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sample.tinfo", SAMPLE);
    let out = dir.path().join("out.tinfo");
    let opts = options(&["-o", out.to_str().unwrap()]);

    let indices = ["4".to_string(), "2".to_string()];
    let report = copy_types(&path, &indices, &opts).unwrap();

    // Int, Cool, List<Cool>, Bool, (Int -> Bool)
    assert_eq!(report.chunk.len(), 5);
    assert_eq!(report.roots, vec![TypeRef::new(2), TypeRef::new(4)]);

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(report.written, Some(bytes.len()));
    let decoded = decode(&bytes, &DecodeOptions::default()).unwrap().chunk;
    assert_eq!(decoded.format_type(TypeRef::new(2)), "List<Cool>");
    assert_eq!(decoded.format_type(TypeRef::new(4)), "(Int -> Bool)");
}

#[test]
fn copy_without_output_keeps_chunk_in_memory() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sample.tinfo", SAMPLE);

    let report = copy_types(&path, &["1".to_string()], &options(&[])).unwrap();
    assert_eq!(report.written, None);
    assert_eq!(report.chunk.dump(FormatFlags::empty()), "type count: 1\n0: Bool\n");
}

#[test]
fn copy_rejects_bad_indices() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "sample.tinfo", SAMPLE);

    let err = copy_types(&path, &["x".to_string()], &options(&[])).unwrap_err();
    assert!(matches!(err, CliError::BadIndex { index } if index == "x"));

    let err = copy_types(&path, &["9".to_string()], &options(&[])).unwrap_err();
    assert!(matches!(err, CliError::NoSuchNode { index: 9, count: 5 }));
}

#[test]
fn copy_keeps_requested_version() {
    let dir = TempDir::new().unwrap();
    let mut bytes = SAMPLE.to_vec();
    bytes[2] = 2;
    let path = write(&dir, "old.tinfo", &bytes);
    let out = dir.path().join("copy.tinfo");
    let opts = options(&["--version=0.1.2", "-o", out.to_str().unwrap()]);

    copy_types(&path, &["0".to_string()], &opts).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), vec![0, 1, 2, 1, 8]);
    assert_eq!(opts.version, FormatVersion::new(0, 1, 2));
}
