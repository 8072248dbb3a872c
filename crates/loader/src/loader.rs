//! Snapshot particle loader
//!
//! Loads one window of one particle type into a freshly allocated
//! [`ParticleBuffer`]. Each call is independent: paging is repeated calls
//! with an advancing start index.
//!
//! # Load sequence
//!
//! 1. Open the container and read the header
//! 2. Resolve the window; an empty window returns without allocating
//! 3. Allocate the buffer
//! 4. Read positions and velocities
//! 5. Fill masses from the header or read the MASS block, then check that
//!    they are identical
//! 6. Gas only: internal energy, electron fraction, neutral hydrogen,
//!    helium (when tracked) and smoothing length
//!
//! Any failure drops the partially filled buffer and returns the error.

use crate::buffer::ParticleBuffer;
use crate::config::{FormatVersion, LoaderConfig};
use crate::diagnostics;
use crate::error::{LoadError, LoadResult};
use fakespec_core::{omega_baryon, ParticleRange, ParticleType, SnapshotScalars, TypeMask};
use fakespec_format::{BlockContainer, BlockTag, GadgetSnapshot};
use std::path::{Path, PathBuf};

/// Result of one load call
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// Particles loaded
    pub count: u64,
    /// Loaded fields, `None` exactly when `count` is zero
    pub buffer: Option<ParticleBuffer>,
    /// Cosmological scalars of the snapshot
    pub scalars: SnapshotScalars,
}

impl LoadOutcome {
    /// Whether the window held no particles
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Loads particle windows from Gadget snapshots
#[derive(Debug, Clone, Default)]
pub struct SnapshotLoader {
    config: LoaderConfig,
}

impl SnapshotLoader {
    /// Create a loader, rejecting an invalid config
    pub fn new(config: LoaderConfig) -> LoadResult<Self> {
        config.validate()?;
        Ok(SnapshotLoader { config })
    }

    /// Active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a window from the snapshot at `path`
    ///
    /// `path` is a single file, the base name of a multi-file snapshot
    /// (`path.0`, `path.1`, ...), or the first file of such a set.
    pub fn load(&self, path: impl AsRef<Path>, range: ParticleRange) -> LoadResult<LoadOutcome> {
        let path = path.as_ref();
        let mut snapshot = GadgetSnapshot::open_with(path, &self.config.gadget_options())
            .map_err(|source| LoadError::ContainerOpen {
                path: path.to_path_buf(),
                source,
            })?;
        self.load_from(&mut snapshot, range)
    }

    /// Load a window from an already open container
    pub fn load_from<C>(&self, container: &mut C, range: ParticleRange) -> LoadResult<LoadOutcome>
    where
        C: BlockContainer + ?Sized,
    {
        let header = container.header().clone();
        let mut scalars = SnapshotScalars::from_header(&header);
        let ptype = self.config.particle_type;

        let available = container.particle_count(ptype);
        let count = range.resolve(available);
        if count == 0 {
            tracing::debug!(
                particle_type = %ptype,
                start = range.start,
                available,
                "Empty window, nothing to load"
            );
            return Ok(LoadOutcome {
                count: 0,
                buffer: None,
                scalars,
            });
        }

        let report = self.reports(range, count);
        if report {
            diagnostics::log_header(&header, &scalars);
        }

        tracing::info!(
            particle_type = %ptype,
            start = range.start,
            end = range.start + count,
            available,
            "Loading particles"
        );

        let mut buffer = ParticleBuffer::allocate(count, self.config.helium)?;
        let start = range.start;
        let skip = TypeMask::all_except(ptype);

        read(container, BlockTag::POS, &mut buffer.position, count, start, skip)?;
        read(container, BlockTag::VEL, &mut buffer.velocity, count, start, skip)?;

        if header.has_uniform_mass(ptype) {
            buffer.mass.fill(header.mass(ptype) as f32);
        } else {
            let mut mass_skip = skip;
            for t in header.uniform_mass_types().iter() {
                mass_skip = mass_skip.without(t);
            }
            read(container, BlockTag::MASS, &mut buffer.mass, count, start, mass_skip)?;
        }
        check_uniform_mass(&buffer.mass)?;

        scalars.omega_baryon = omega_baryon(
            f64::from(buffer.mass[0]),
            header.mass(ParticleType::DarkMatter),
            header.omega0,
        );
        if scalars.omega_baryon.is_none() {
            tracing::warn!(
                "Dark matter has no header mass, baryon fraction is undefined"
            );
        }

        if ptype.is_gas() {
            self.load_gas_fields(container, &mut buffer, header.cooling_flag, count, start)?;
        }

        if report {
            diagnostics::log_particles(&buffer, &scalars, ptype);
        }

        Ok(LoadOutcome {
            count,
            buffer: Some(buffer),
            scalars,
        })
    }

    /// Iterate over consecutive windows of `page_size` particles
    ///
    /// Every page reopens the snapshot. Iteration ends after the first empty
    /// window or the first error.
    pub fn pages(&self, path: impl AsRef<Path>, page_size: u64) -> Pages<'_> {
        let max_count = i64::try_from(page_size).unwrap_or(i64::MAX);
        Pages {
            loader: self,
            path: path.as_ref().to_path_buf(),
            next: Some(ParticleRange::new(0, max_count)),
        }
    }

    /// Whether a load of `count` particles from `range` logs summaries
    ///
    /// Only the first non-empty page reports.
    fn reports(&self, range: ParticleRange, count: u64) -> bool {
        self.config.diagnostics && range.start == 0 && count > 0
    }

    fn load_gas_fields<C>(
        &self,
        container: &mut C,
        buffer: &mut ParticleBuffer,
        cooling: bool,
        count: u64,
        start: u64,
    ) -> LoadResult<()>
    where
        C: BlockContainer + ?Sized,
    {
        // Gas-only blocks hold nothing but gas, so nothing is skipped
        let skip = TypeMask::NONE;

        read(container, BlockTag::U, &mut buffer.internal_energy, count, start, skip)?;

        if cooling {
            match self.config.format_version {
                FormatVersion::Legacy => {
                    // Ne = N_HII + N_HeII + 2 N_HeIII, using the smoothing
                    // length field as scratch until HSML is read
                    read(container, BlockTag::NHP, &mut buffer.electron_fraction, count, start, skip)?;
                    read(container, BlockTag::NHEP, &mut buffer.smoothing_length, count, start, skip)?;
                    for (ne, x) in buffer.electron_fraction.iter_mut().zip(&buffer.smoothing_length) {
                        *ne += x;
                    }
                    read(container, BlockTag::NHEQ, &mut buffer.smoothing_length, count, start, skip)?;
                    for (ne, x) in buffer.electron_fraction.iter_mut().zip(&buffer.smoothing_length) {
                        *ne += 2.0 * x;
                    }
                }
                FormatVersion::CombinedElectronFraction => {
                    read(container, BlockTag::NE, &mut buffer.electron_fraction, count, start, skip)?;
                }
            }

            if let Some(helium) = buffer.helium.as_mut() {
                read(container, BlockTag::NHE, helium, count, start, skip)?;
            }

            read(container, BlockTag::NH, &mut buffer.neutral_hydrogen, count, start, skip)?;
        }

        read(container, BlockTag::HSML, &mut buffer.smoothing_length, count, start, skip)?;
        Ok(())
    }
}

fn read<C>(
    container: &mut C,
    tag: BlockTag,
    dest: &mut [f32],
    count: u64,
    start: u64,
    skip: TypeMask,
) -> LoadResult<()>
where
    C: BlockContainer + ?Sized,
{
    tracing::debug!(tag = %tag, count, start, skip = ?skip, "Reading block");
    container.read_block(tag, dest, count, start, skip)?;
    Ok(())
}

/// Every mass must be bit-identical to the first
fn check_uniform_mass(masses: &[f32]) -> LoadResult<()> {
    let Some(&expected) = masses.first() else {
        return Ok(());
    };
    match masses
        .iter()
        .position(|m| m.to_bits() != expected.to_bits())
    {
        Some(index) => Err(LoadError::CorruptMassData {
            index: index as u64,
            expected,
            found: masses[index],
        }),
        None => Ok(()),
    }
}

/// Iterator over consecutive windows of one snapshot
#[derive(Debug)]
pub struct Pages<'a> {
    loader: &'a SnapshotLoader,
    path: PathBuf,
    next: Option<ParticleRange>,
}

impl Iterator for Pages<'_> {
    type Item = LoadResult<LoadOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.next.take()?;
        match self.loader.load(&self.path, range) {
            Ok(outcome) if outcome.is_empty() => None,
            Ok(outcome) => {
                self.next = Some(range.next_page(outcome.count));
                Some(Ok(outcome))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
