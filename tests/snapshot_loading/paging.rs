//! Paged loads concatenate to a single load

use crate::common::*;
use proptest::prelude::*;

/// Concatenate pages field by field
fn concat(pages: &[ParticleBuffer]) -> [Vec<f32>; 6] {
    let mut out: [Vec<f32>; 6] = Default::default();
    for p in pages {
        out[0].extend_from_slice(p.positions());
        out[1].extend_from_slice(p.velocities());
        out[2].extend_from_slice(p.masses());
        out[3].extend_from_slice(p.internal_energy());
        out[4].extend_from_slice(p.electron_fraction());
        out[5].extend_from_slice(p.smoothing_length());
    }
    out
}

fn fields(b: &ParticleBuffer) -> [Vec<f32>; 6] {
    concat(std::slice::from_ref(b))
}

#[test]
fn test_two_halves_equal_whole() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    let loader = quiet_loader(LoaderConfig::default());

    let first = loader.load(&path, ParticleRange::new(0, 4)).unwrap();
    let second = loader.load(&path, ParticleRange::new(4, 4)).unwrap();
    assert_eq!(first.count, 4);
    assert_eq!(second.count, (N_GAS - 4) as u64);

    let pages = [first.buffer.unwrap(), second.buffer.unwrap()];
    assert_eq!(concat(&pages), fields(&load_all(&loader, &path)));
}

#[test]
fn test_pages_iterator_crosses_file_boundaries() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("snapshot_multi");
    builder(header(), legacy_blocks()).files(2).write(&base).unwrap();
    let single = write(&dir, "snapshot_single", &builder(header(), legacy_blocks()));

    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::Stars));
    let pages: Vec<ParticleBuffer> = loader
        .pages(&base, 2)
        .map(|outcome| outcome.unwrap().buffer.unwrap())
        .collect();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].len(), 2);
    assert_eq!(pages[1].len(), 1);
    assert_eq!(concat(&pages), fields(&load_all(&loader, &single)));
}

#[test]
fn test_start_at_or_past_end_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::DarkMatter));

    for start in [N_DM as u64, N_DM as u64 + 1, u64::MAX] {
        let outcome = loader.load(&path, ParticleRange::new(start, 10)).unwrap();
        assert_eq!(outcome.count, 0);
        assert!(outcome.buffer.is_none());
        assert!((outcome.scalars.hubble_rate - 70.0).abs() < 1e-9);
    }
}

#[test]
fn test_absent_type_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), legacy_blocks()));
    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::Bulge));
    assert!(loader.load(&path, ParticleRange::all()).unwrap().is_empty());
    assert_eq!(loader.pages(&path, 3).count(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_any_page_size_reassembles(page_size in 1u64..=8, files in 1usize..=3, ptype_index in 0usize..3) {
        let ptype = [ParticleType::Gas, ParticleType::DarkMatter, ParticleType::Stars][ptype_index];
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("snapshot");
        builder(header(), legacy_blocks()).files(files).write(&base).unwrap();

        let loader = quiet_loader(LoaderConfig::default().with_particle_type(ptype));
        let whole = load_all(&loader, &base);
        let pages: Vec<ParticleBuffer> = loader
            .pages(&base, page_size)
            .map(|outcome| outcome.unwrap().buffer.unwrap())
            .collect();

        prop_assert!(pages.iter().all(|p| p.len() as u64 <= page_size));
        prop_assert_eq!(concat(&pages), fields(&whole));
    }
}
