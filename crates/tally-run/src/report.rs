//! Report generation: reduce a merged tally into a printable snapshot.
//!
//! [`RunReport::generate`] is the only place in the workspace that divides
//! by the event count. It reads the accumulated state, computes every
//! per-event quantity into an owned [`RunReport`], instructs the analysis
//! sink to normalize the longitudinal profile histogram, and then clears
//! the tally's per-report tables. The raw sums are never modified, so
//! generating a report, accumulating more events, and generating again
//! yields correct numbers both times.
//!
//! The snapshot implements `Display`, rendering the classic multi-section
//! run summary: run conditions, process call frequencies, per-layer and
//! whole-stack mean deposits, per-layer and emerging species listings, and
//! primary-fate percentages.

use std::error::Error;
use std::fmt;

use tally_core::species::ParticleStats;
use tally_core::units::{Density, Energy, Length, MEV, MM};
use tally_core::{Extrema, Location, PrimaryFate, TallyError};
use tally_hist::{AnalysisSink, HistError, HistId};
use tally_stack::{LayerSpec, StackProfile};

use crate::run::{Primary, RunTally};

// ── ReportOptions ──────────────────────────────────────────────────

/// Knobs for report generation.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportOptions {
    /// Per-layer species listings keep only species with
    /// `count > species_cutoff`. The emerging listing ignores the cutoff.
    /// Default: 100.
    pub species_cutoff: u64,
    /// Histogram holding the longitudinal energy-deposit profile, to be
    /// rescaled to per-event linear density. `None` skips the sink
    /// entirely. Default: `None`.
    pub profile: Option<HistId>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            species_cutoff: 100,
            profile: None,
        }
    }
}

// ── ReportError ────────────────────────────────────────────────────

/// Errors from [`RunReport::generate`].
///
/// On any error the tally is left exactly as it was: the volatile clear
/// only happens after every fallible step has succeeded.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportError {
    /// The tally and the stack profile disagree on the layer count.
    LayerMismatch {
        /// Layers the tally was sized for.
        tally: u32,
        /// Layers the profile describes.
        profile: u32,
    },
    /// An accumulator read failed.
    Tally(TallyError),
    /// The analysis sink rejected a histogram operation.
    Hist(HistError),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerMismatch { tally, profile } => {
                write!(
                    f,
                    "tally sized for {tally} layers but profile describes {profile}"
                )
            }
            Self::Tally(e) => write!(f, "tally: {e}"),
            Self::Hist(e) => write!(f, "analysis sink: {e}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tally(e) => Some(e),
            Self::Hist(e) => Some(e),
            Self::LayerMismatch { .. } => None,
        }
    }
}

impl From<TallyError> for ReportError {
    fn from(e: TallyError) -> Self {
        Self::Tally(e)
    }
}

impl From<HistError> for ReportError {
    fn from(e: HistError) -> Self {
        Self::Hist(e)
    }
}

// ── Report rows ────────────────────────────────────────────────────

/// One process entry: name and total calls.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRow {
    /// Process name.
    pub name: String,
    /// Total invocations across the run.
    pub calls: u64,
}

/// Mean energy deposit at one scoring site.
#[derive(Clone, Debug, PartialEq)]
pub struct DepositRow {
    /// Deposit per event (`sum / events`).
    pub mean: f64,
    /// Smallest and largest single deposit, or `None` if the site never
    /// saw one.
    pub extrema: Option<Extrema>,
}

/// One species entry in a particle listing.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesRow {
    /// Species name.
    pub species: String,
    /// Particles observed.
    pub count: u64,
    /// Mean kinetic energy (`energy_sum / count`).
    pub mean_energy: f64,
    /// Smallest observed kinetic energy.
    pub min_energy: f64,
    /// Largest observed kinetic energy.
    pub max_energy: f64,
    /// Whole particles per event (`count / events`, truncated).
    pub per_event: u64,
}

// ── RunReport ──────────────────────────────────────────────────────

/// An owned, read-only snapshot of everything a run summary displays.
///
/// Built by [`generate`](RunReport::generate); rendered by its `Display`
/// impl. Holding the numbers here rather than printing straight from the
/// accumulator is what lets normalization be pure: the division by the
/// event count happens while filling this struct, never in place.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Events reduced into the report.
    pub events: u64,
    /// Primary description, if one was configured.
    pub primary: Option<Primary>,
    /// Geometry rows, one per absorber layer in beam order.
    pub stack: Vec<LayerSpec>,
    /// Process call frequencies, sorted by process name.
    pub processes: Vec<ProcessRow>,
    /// Mean deposits, one row per layer in beam order.
    pub deposits: Vec<DepositRow>,
    /// Whole-stack mean deposit. Present only for stacks of more than
    /// one layer; for a single layer it would repeat the layer row.
    pub stack_deposit: Option<DepositRow>,
    /// Species produced per layer (cutoff applied), sorted by name.
    pub produced: Vec<Vec<SpeciesRow>>,
    /// Species emerging from the stack (no cutoff), sorted by name.
    pub emerged: Vec<SpeciesRow>,
    /// Percentage of events whose primary was absorbed.
    pub absorbed_percent: f64,
    /// Percentage of events whose primary was transmitted.
    pub transmitted_percent: f64,
    /// The cutoff the produced listings were filtered with.
    pub species_cutoff: u64,
    /// Scale factor applied to the profile histogram, if one was named.
    pub profile_scale: Option<f64>,
}

impl RunReport {
    /// Reduce `tally` against `profile` into a report snapshot.
    ///
    /// With zero events the report carries only the run-conditions header
    /// (primary and geometry): nothing is divided, the sink is not
    /// touched, and the tally is left untouched. Otherwise, after the
    /// snapshot is complete and the profile histogram (if any) has been
    /// rescaled by `(MM / MEV) / (events * bin_width * axis_unit)`, the
    /// tally's process and particle tables are cleared; they are
    /// per-report listings. Deposits, outcomes, events, and the primary
    /// survive for cumulative reporting.
    pub fn generate(
        tally: &mut RunTally,
        profile: &StackProfile,
        sink: &mut dyn AnalysisSink,
        options: &ReportOptions,
    ) -> Result<Self, ReportError> {
        if tally.layer_count() != profile.layer_count() {
            return Err(ReportError::LayerMismatch {
                tally: tally.layer_count(),
                profile: profile.layer_count(),
            });
        }
        let stack: Vec<LayerSpec> = profile.iter().map(|(_, spec)| spec.clone()).collect();
        let events = tally.events();
        if events == 0 {
            return Ok(Self {
                events: 0,
                primary: tally.primary().cloned(),
                stack,
                processes: Vec::new(),
                deposits: Vec::new(),
                stack_deposit: None,
                produced: Vec::new(),
                emerged: Vec::new(),
                absorbed_percent: 0.0,
                transmitted_percent: 0.0,
                species_cutoff: options.species_cutoff,
                profile_scale: None,
            });
        }
        let events_f = events as f64;

        let mut processes: Vec<ProcessRow> = tally
            .processes()
            .iter()
            .map(|(name, calls)| ProcessRow {
                name: name.to_owned(),
                calls,
            })
            .collect();
        processes.sort_by(|a, b| a.name.cmp(&b.name));

        let deposits: Vec<DepositRow> = tally
            .deposits()
            .iter()
            .map(|(_, site)| DepositRow {
                mean: site.sum() / events_f,
                extrema: site.extrema(),
            })
            .collect();
        let stack_deposit = if tally.layer_count() > 1 {
            let site = tally.deposits().stack();
            Some(DepositRow {
                mean: site.sum() / events_f,
                extrema: site.extrema(),
            })
        } else {
            None
        };

        let mut produced = Vec::with_capacity(tally.layer_count() as usize);
        for layer in 1..=tally.layer_count() {
            let entries = tally.particles().species_at(Location::Layer(layer))?;
            produced.push(species_rows(entries, events, Some(options.species_cutoff)));
        }
        let emerged = species_rows(tally.particles().species_at(Location::Emerged)?, events, None);

        let outcomes = tally.outcomes();
        let absorbed_percent = 100.0 * outcomes.count(PrimaryFate::Absorbed) as f64 / events_f;
        let transmitted_percent =
            100.0 * outcomes.count(PrimaryFate::Transmitted) as f64 / events_f;

        // Turn the accumulated profile into a per-event linear density
        // (MeV/mm): one count of weight w in a bin of width
        // `bin_width * axis_unit` internal units becomes
        // w / (events * width) MeV per mm.
        let profile_scale = match options.profile {
            Some(id) => {
                let width = sink.bin_width(id)?;
                let unit = sink.unit_scale(id)?;
                let factor = (MM / MEV) / (events_f * width * unit);
                sink.scale(id, factor)?;
                Some(factor)
            }
            None => None,
        };

        // Every fallible step is done; the per-report tables can go.
        tally.clear_volatile();

        Ok(Self {
            events,
            primary: tally.primary().cloned(),
            stack,
            processes,
            deposits,
            stack_deposit,
            produced,
            emerged,
            absorbed_percent,
            transmitted_percent,
            species_cutoff: options.species_cutoff,
            profile_scale,
        })
    }
}

fn species_rows<'a, I>(entries: I, events: u64, cutoff: Option<u64>) -> Vec<SpeciesRow>
where
    I: Iterator<Item = (&'a str, &'a ParticleStats)>,
{
    let mut rows: Vec<SpeciesRow> = entries
        .filter(|(_, stats)| cutoff.is_none_or(|c| stats.count() > c))
        .map(|(species, stats)| SpeciesRow {
            species: species.to_owned(),
            count: stats.count(),
            mean_energy: stats.mean_energy(),
            min_energy: stats.energy_min(),
            max_energy: stats.energy_max(),
            per_event: stats.count() / events,
        })
        .collect();
    rows.sort_by(|a, b| a.species.cmp(&b.species));
    rows
}

// ── Rendering ──────────────────────────────────────────────────────

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, " ======================== run summary =====================")?;
        writeln!(f)?;
        match &self.primary {
            Some(primary) => writeln!(
                f,
                " The run is {} {} of {} through {} absorber layers:",
                self.events,
                primary.species,
                Energy(primary.kinetic_energy),
                self.stack.len()
            )?,
            None => writeln!(
                f,
                " The run is {} events through {} absorber layers:",
                self.events,
                self.stack.len()
            )?,
        }
        for (i, layer) in self.stack.iter().enumerate() {
            writeln!(
                f,
                "{:>5} {:>10} of {} (density: {:.3})",
                i + 1,
                format!("{:.3}", Length(layer.thickness)),
                layer.material,
                Density(layer.density)
            )?;
        }
        if self.events == 0 {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, " Process calls frequency:")?;
        for (i, row) in self.processes.iter().enumerate() {
            write!(f, " {:>20} = {:>7}", row.name, row.calls)?;
            // A report line holds three process entries.
            if (i + 1) % 3 == 0 {
                writeln!(f)?;
            }
        }
        writeln!(f)?;

        if !self.deposits.is_empty() {
            writeln!(f)?;
            for (i, row) in self.deposits.iter().enumerate() {
                write_deposit_line(f, format_args!("absorber layer {}", i + 1), row)?;
            }
        }
        if let Some(row) = &self.stack_deposit {
            writeln!(f)?;
            write_deposit_line(f, format_args!("all absorber layers"), row)?;
        }

        for (k, rows) in self.produced.iter().enumerate() {
            writeln!(f)?;
            writeln!(
                f,
                " List of particles produced in absorber layer {} (count > {}):",
                k + 1,
                self.species_cutoff
            )?;
            for row in rows {
                write_species_line(f, row, "Produced")?;
            }
        }

        writeln!(f)?;
        writeln!(f, " List of particles emerging from the stack:")?;
        for row in &self.emerged {
            write_species_line(f, row, "Emerging")?;
        }

        writeln!(f)?;
        writeln!(
            f,
            " Nb of events with primary absorbed = {:.2} %, transmitted = {:.2} %",
            self.absorbed_percent, self.transmitted_percent
        )
    }
}

fn write_deposit_line(
    f: &mut fmt::Formatter<'_>,
    site: fmt::Arguments<'_>,
    row: &DepositRow,
) -> fmt::Result {
    match row.extrema {
        Some(x) => writeln!(
            f,
            " Edep in {site} = {:.3}\t({:.3}-->{:.3})",
            Energy(row.mean),
            Energy(x.min()),
            Energy(x.max())
        ),
        None => writeln!(f, " Edep in {site} = {:.3}\t(no deposits)", Energy(row.mean)),
    }
}

fn write_species_line(f: &mut fmt::Formatter<'_>, row: &SpeciesRow, verb: &str) -> fmt::Result {
    writeln!(
        f,
        "  {:>13}: {:>7}  Emean = {:>10}\t( {:.3} --> {:.3} ) Mean Number of Particles {verb} {}",
        row.species,
        row.count,
        format!("{:.3}", Energy(row.mean_energy)),
        Energy(row.min_energy),
        Energy(row.max_energy),
        row.per_event
    )
}
