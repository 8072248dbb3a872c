//! Masses, electron fraction and cosmological scalars computed on load

use crate::common::*;
use fakespec::{FormatVersion, HeliumTracking, LoadError};

fn gas_snapshot(dir: &TempDir) -> std::path::PathBuf {
    write(dir, "snapshot_000", &builder(header(), legacy_blocks()))
}

#[test]
fn test_scalars() {
    let dir = TempDir::new().unwrap();
    let path = gas_snapshot(&dir);
    let outcome = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap();

    let s = outcome.scalars;
    assert!((s.hubble_rate - 70.0).abs() < 1e-9);
    assert_eq!(s.box_size, 20000.0);
    assert_eq!(s.hubble_param, 0.7);
    assert_eq!(s.expansion_factor, 1.0);

    // 0.125 / (0.125 + 0.875) * 0.3
    let ob = s.omega_baryon.unwrap();
    assert!((ob - 0.0375).abs() < 1e-12, "omega_b = {}", ob);
}

#[test]
fn test_hubble_rate_at_high_redshift() {
    let mut h = header();
    h.expansion_factor = 0.5;
    h.redshift = 1.0;
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_z1", &builder(h, legacy_blocks()));

    let s = quiet_loader(LoaderConfig::default())
        .load(&path, ParticleRange::all())
        .unwrap()
        .scalars;
    let expected = 70.0 * (1.0f64 + 0.3 * 1.0 + 0.7 * (0.25 - 1.0)).sqrt() / 0.5;
    assert!((s.hubble_rate - expected).abs() < 1e-9);
    assert_eq!(s.redshift, 1.0);
}

#[test]
fn test_header_mass_fills_every_particle() {
    let dir = TempDir::new().unwrap();
    let path = gas_snapshot(&dir);
    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::DarkMatter));
    let buffer = load_all(&loader, &path);
    assert_eq!(buffer.len(), N_DM);
    assert!(buffer.masses().iter().all(|m| *m == DM_MASS as f32));
}

#[test]
fn test_per_particle_masses_for_stars() {
    let dir = TempDir::new().unwrap();
    let path = gas_snapshot(&dir);
    let loader = quiet_loader(LoaderConfig::default().with_particle_type(ParticleType::Stars));
    let buffer = load_all(&loader, &path);
    assert_eq!(buffer.masses(), &[STAR_MASS; N_STARS]);
    // Stars follow gas and dark matter in the position block
    assert_eq!(buffer.position(0)[0], (3 * (N_GAS + N_DM)) as f32 * 1.5);
}

#[test]
fn test_electron_fraction_sums_ionisation_states() {
    let mut blocks = legacy_blocks();
    for (tag, data) in blocks.iter_mut() {
        if *tag == BlockTag::NHP {
            *data = vec![0.1; N_GAS];
        } else if *tag == BlockTag::NHEP {
            *data = vec![0.05; N_GAS];
        } else if *tag == BlockTag::NHEQ {
            *data = vec![0.02; N_GAS];
        }
    }
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), blocks));

    let buffer = load_all(&quiet_loader(LoaderConfig::legacy()), &path);
    for ne in buffer.electron_fraction() {
        assert!((ne - 0.19).abs() < 1e-6, "Ne = {}", ne);
    }
    // The scratch use of the smoothing length field leaves no trace
    assert_eq!(buffer.smoothing_length(), ramp(N_GAS, 4.0, 0.5).as_slice());
}

#[test]
fn test_helium_tracking_on_and_off() {
    let dir = TempDir::new().unwrap();
    let path = gas_snapshot(&dir);

    let off = load_all(&quiet_loader(LoaderConfig::default()), &path);
    assert!(off.helium().is_none());

    let on = load_all(
        &quiet_loader(LoaderConfig::default().with_helium(HeliumTracking::On)),
        &path,
    );
    assert_eq!(on.helium().unwrap(), &[0.5; N_GAS][..]);
    assert_eq!(on.electron_fraction(), off.electron_fraction());
    assert!(on.heap_bytes() > off.heap_bytes());
}

#[test]
fn test_corrupt_mass_block() {
    let mut blocks = legacy_blocks();
    for (tag, data) in blocks.iter_mut() {
        if *tag == BlockTag::MASS {
            data[5] = 0.25;
        }
    }
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "snapshot_000", &builder(header(), blocks));
    let loader = quiet_loader(LoaderConfig::default());

    let err = loader.load(&path, ParticleRange::all()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::CorruptMassData { index: 5, expected, found }
            if expected == GAS_MASS && found == 0.25
    ));

    // Index is relative to the loaded window
    let err = loader.load(&path, ParticleRange::new(2, 0)).unwrap_err();
    assert!(matches!(err, LoadError::CorruptMassData { index: 3, .. }));

    // A window before the bad particle loads fine
    assert_eq!(loader.load(&path, ParticleRange::new(0, 5)).unwrap().count, 5);
}

#[test]
fn test_format_version_selects_blocks() {
    let dir = TempDir::new().unwrap();
    let legacy = gas_snapshot(&dir);
    let combined = write(&dir, "snapshot_ne", &builder(header(), combined_blocks()));

    let loader = quiet_loader(
        LoaderConfig::default().with_format_version(FormatVersion::CombinedElectronFraction),
    );
    let err = loader.load(&legacy, ParticleRange::all()).unwrap_err();
    assert!(matches!(err, LoadError::BlockMissing { tag } if tag == BlockTag::NE));

    let err = quiet_loader(LoaderConfig::legacy())
        .load(&combined, ParticleRange::all())
        .unwrap_err();
    assert!(matches!(err, LoadError::BlockMissing { tag } if tag == BlockTag::NHP));
}
