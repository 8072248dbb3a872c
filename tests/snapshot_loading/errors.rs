//! Load failures surface as typed errors

use crate::common::*;
use fakespec::{ContainerError, LoadError};
use std::fs;
use std::io::Write;

#[test]
fn test_missing_path() {
    let dir = TempDir::new().unwrap();
    let err = quiet_loader(LoaderConfig::default())
        .load(dir.path().join("nope"), ParticleRange::all())
        .unwrap_err();
    match err {
        LoadError::ContainerOpen { path, source } => {
            assert!(path.ends_with("nope"));
            assert!(matches!(source, ContainerError::MissingFile { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unrecognized_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage");
    fs::write(&path, b"this is not a snapshot file at all").unwrap();

    let err = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::ContainerOpen {
            source: ContainerError::UnrecognizedFormat { .. },
            ..
        }
    ));
}

#[test]
fn test_truncated_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();

    let err = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(err, LoadError::ContainerOpen { .. }));
}

#[test]
fn test_trailing_bytes_after_last_record() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    fs::OpenOptions::new()
        .append(true)
        .open(&path)
        .unwrap()
        .write_all(&[1, 2, 3])
        .unwrap();

    let err = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(err, LoadError::ContainerOpen { .. }));
}

#[test]
fn test_missing_part_of_multi_file_snapshot() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_multi");
    let written = builder(header(), legacy_blocks()).files(3).write(&base).unwrap();
    fs::remove_file(&written[2]).unwrap();

    let err = quiet_loader(LoaderConfig::default())
        .load(&base, ParticleRange::all())
        .unwrap_err();
    match err {
        LoadError::ContainerOpen {
            source: ContainerError::MissingFile { path },
            ..
        } => assert_eq!(path, written[2]),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_required_block() {
    let blocks: Vec<_> = legacy_blocks()
        .into_iter()
        .filter(|(tag, _)| *tag != BlockTag::HSML)
        .collect();
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), blocks));

    let err = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(err, LoadError::BlockMissing { tag } if tag == BlockTag::HSML));

    // Dark matter never reads gas blocks
    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::DarkMatter));
    assert_eq!(loader.load(&path, ParticleRange::all()).unwrap().count, N_DM as u64);
}

#[test]
fn test_block_with_wrong_size() {
    let mut blocks = legacy_blocks();
    for (tag, data) in blocks.iter_mut() {
        if *tag == BlockTag::U {
            // Three values per gas particle: neither f32 nor f64 scalars
            *data = ramp(3 * N_GAS, 0.0, 1.0);
        }
    }
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), blocks));

    let err = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Container(ContainerError::BlockSizeMismatch { tag, .. }) if tag == BlockTag::U
    ));
}

#[test]
fn test_invalid_config() {
    let config = LoaderConfig::default().with_block_order(vec![BlockTag::HEAD, BlockTag::U, BlockTag::U]);
    assert!(matches!(
        SnapshotLoader::new(config),
        Err(LoadError::InvalidConfig(_))
    ));
}
