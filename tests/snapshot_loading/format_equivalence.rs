//! Every file flavour of the same snapshot loads to the same buffer

use crate::common::*;
use fakespec::{BlockContainer, GadgetSnapshot, HeliumTracking, MemoryContainer, SnapFormat};

fn reference(ptype: ParticleType) -> ParticleBuffer {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    load_all(&quiet_loader(LoaderConfig::default().with_particle_type(ptype)), &path)
}

#[test]
fn test_tagged_and_unnamed_load_identically() {
    let dir = TempDir::new().unwrap();
    let unnamed = write(&dir, "unnamed", &builder(header(), legacy_blocks()).unnamed());

    let snapshot = GadgetSnapshot::open(&unnamed).unwrap();
    assert_eq!(snapshot.format(), SnapFormat::Unnamed);

    for ptype in [ParticleType::Gas, ParticleType::DarkMatter, ParticleType::Stars] {
        let loader = quiet_loader(LoaderConfig::default().with_particle_type(ptype));
        assert_same(&load_all(&loader, &unnamed), &reference(ptype));
    }
}

#[test]
fn test_big_and_little_endian_load_identically() {
    let dir = TempDir::new().unwrap();
    let loader = quiet_loader(LoaderConfig::default());
    for (name, b) in [
        ("tagged_be", builder(header(), legacy_blocks()).endian(Endian::Big)),
        (
            "unnamed_be",
            builder(header(), legacy_blocks()).unnamed().endian(Endian::Big),
        ),
    ] {
        let path = write(&dir, name, &b);
        assert_eq!(GadgetSnapshot::open(&path).unwrap().endian(), Endian::Big);
        assert_same(&load_all(&loader, &path), &reference(ParticleType::Gas));
    }
}

#[test]
fn test_double_precision_loads_identically() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "double",
        &builder(header(), legacy_blocks()).precision(Precision::Double),
    );
    for ptype in [ParticleType::Gas, ParticleType::Stars] {
        let loader = quiet_loader(LoaderConfig::default().with_particle_type(ptype));
        assert_same(&load_all(&loader, &path), &reference(ptype));
    }
}

#[test]
fn test_multi_file_loads_identically() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_multi");
    let written = builder(header(), legacy_blocks()).files(3).write(&base).unwrap();
    assert_eq!(written.len(), 3);
    assert!(!base.exists());

    let snapshot = GadgetSnapshot::open(&base).unwrap();
    assert_eq!(snapshot.file_count(), 3);
    assert_eq!(snapshot.header().particle_count(ParticleType::Gas), N_GAS as u64);

    for ptype in [ParticleType::Gas, ParticleType::DarkMatter, ParticleType::Stars] {
        let loader = quiet_loader(LoaderConfig::default().with_particle_type(ptype));
        assert_same(&load_all(&loader, &base), &reference(ptype));
    }
}

#[test]
fn test_unnamed_big_endian_double_multi_file() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_mixed");
    builder(header(), legacy_blocks())
        .unnamed()
        .endian(Endian::Big)
        .precision(Precision::Double)
        .files(2)
        .write(&base)
        .unwrap();

    let loader = quiet_loader(LoaderConfig::default().with_helium(HeliumTracking::On));
    let tagged = write(&dir, "tagged", &builder(header(), legacy_blocks()));
    assert_same(&load_all(&loader, &base), &load_all(&loader, &tagged));
}

#[test]
fn test_file_matches_memory_container() {
    let mut memory = legacy_blocks()
        .into_iter()
        .fold(MemoryContainer::new(header()), |c, (tag, data)| c.with_block(tag, data));

    let loader = quiet_loader(LoaderConfig::default().with_helium(HeliumTracking::On));
    let from_memory = loader
        .load_from(&mut memory, ParticleRange::all())
        .unwrap()
        .buffer
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    assert_same(&load_all(&loader, &path), &from_memory);
}

#[test]
fn test_combined_electron_fraction_unnamed() {
    let dir = TempDir::new().unwrap();
    let tagged = write(&dir, "tagged", &builder(header(), combined_blocks()));
    let unnamed = write(&dir, "unnamed", &builder(header(), combined_blocks()).unnamed());

    let loader = quiet_loader(LoaderConfig::combined_electron_fraction());
    let a = load_all(&loader, &tagged);
    let b = load_all(&loader, &unnamed);
    assert_same(&a, &b);
    assert_eq!(a.electron_fraction(), ramp(N_GAS, 1.0, 0.125).as_slice());
    assert_eq!(a.neutral_hydrogen(), ramp(N_GAS, 0.25, -0.03125).as_slice());
}

#[test]
fn test_first_file_of_set_loads_whole_set() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_multi");
    let written = builder(header(), legacy_blocks()).files(3).write(&base).unwrap();

    for ptype in [ParticleType::Gas, ParticleType::DarkMatter, ParticleType::Stars] {
        let loader = quiet_loader(LoaderConfig::default().with_particle_type(ptype));
        assert_same(&load_all(&loader, &written[0]), &reference(ptype));
    }
}

#[test]
fn test_later_file_of_set_is_rejected() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_multi");
    let written = builder(header(), legacy_blocks()).files(3).write(&base).unwrap();

    let err = quiet_loader(LoaderConfig::default())
        .load(&written[1], ParticleRange::all())
        .unwrap_err();
    assert!(matches!(
        err,
        fakespec::LoadError::ContainerOpen {
            source: fakespec::ContainerError::IncompleteSnapshot { num_files: 3, .. },
            ..
        }
    ));
}

#[test]
fn test_unnamed_without_cooling_loads_like_tagged() {
    let mut h = header();
    h.cooling_flag = false;
    let blocks: Vec<_> = legacy_blocks()
        .into_iter()
        .filter(|(tag, _)| !tag.needs_cooling())
        .collect();

    let dir = TempDir::new().unwrap();
    let tagged = write(&dir, "tagged", &builder(h.clone(), blocks.clone()));
    let unnamed = write(&dir, "unnamed", &builder(h, blocks).unnamed());

    let loader = quiet_loader(LoaderConfig::default());
    let a = load_all(&loader, &tagged);
    let b = load_all(&loader, &unnamed);
    assert_same(&a, &b);
    assert_eq!(a.len(), N_GAS);
    assert_eq!(b.smoothing_length(), ramp(N_GAS, 4.0, 0.5).as_slice());
    assert!(b.electron_fraction().iter().all(|x| *x == 0.0));
}
