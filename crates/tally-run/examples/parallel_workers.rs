//! Parallel reduction quickstart: worker tallies, one master, one report.
//!
//! Demonstrates:
//!   1. Describing the absorber stack (three lead-glass layers)
//!   2. Filling one `RunTally` per worker thread with a toy transport model
//!   3. Reducing the workers into a master over a bounded channel
//!   4. Booking a longitudinal deposit profile and normalizing it per event
//!   5. Rendering the end-of-run summary
//!
//! Run with:
//!   cargo run --example parallel_workers

use std::thread;

use tally_core::units::{CM, G_PER_CM3, MEV};
use tally_core::{Length, Location, PrimaryFate, TallyError};
use tally_hist::HistogramBook;
use tally_run::{merge_from_channel, ReportOptions, RunReport, RunTally};
use tally_stack::{LayerSpec, StackProfile};

// ─── Run parameters ─────────────────────────────────────────────

const WORKERS: u64 = 4;
const EVENTS_PER_WORKER: u64 = 2_500;
const LAYERS: u32 = 3;
const LAYER_THICKNESS: f64 = 2.0 * CM;
const PRIMARY_ENERGY: f64 = 1.0 * MEV;

// ─── Toy transport model ────────────────────────────────────────
//
// A deterministic stand-in for a real event loop: the primary sheds a
// fixed fraction of its energy per layer, every fifth primary stops in
// layer 2, every seventeenth backscatters, and bremsstrahlung gammas
// appear on a fixed cadence. Event index `n` is global across workers
// so every worker sees a different slice of the pattern.

fn simulate_event(n: u64, tally: &mut RunTally) -> Result<(), TallyError> {
    tally.record_event();

    let fraction = 0.30 + 0.02 * (n % 7) as f64;
    let stops_in = if n % 5 == 0 { Some(2) } else { None };
    let mut energy = PRIMARY_ENERGY;
    let mut total = 0.0;

    for layer in 1..=LAYERS {
        tally.count_process("msc");
        tally.count_process("eIoni");

        let edep = if stops_in == Some(layer) {
            energy
        } else {
            energy * fraction
        };
        tally.add_edep(layer, edep)?;
        total += edep;
        energy -= edep;

        if (n + u64::from(layer)) % 3 == 0 {
            tally.count_process("eBrem");
            tally.count_particle(Location::Layer(layer), "gamma", 0.1 + 0.05 * (n % 4) as f64)?;
        }
        if energy <= 0.0 {
            break;
        }
    }
    tally.add_stack_edep(total);

    if stops_in.is_some() {
        tally.record_outcome(PrimaryFate::Absorbed);
    } else if n % 17 == 0 {
        tally.record_outcome(PrimaryFate::Other);
    } else {
        tally.record_outcome(PrimaryFate::Transmitted);
        tally.count_particle(Location::Emerged, "e-", energy)?;
    }
    if n % 3 == 2 {
        tally.count_particle(Location::Emerged, "gamma", 0.2 + 0.0125 * (n % 8) as f64)?;
    }
    Ok(())
}

fn fill_worker_tally(worker: u64) -> Result<RunTally, TallyError> {
    let mut tally = RunTally::new(LAYERS);
    tally.set_primary("e-", PRIMARY_ENERGY);
    for i in 0..EVENTS_PER_WORKER {
        simulate_event(worker * EVENTS_PER_WORKER + i, &mut tally)?;
    }
    Ok(tally)
}

// ─── Main ───────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tally parallel reduction ===\n");

    // 1. Describe the absorber stack.
    let profile = StackProfile::uniform(
        LAYERS,
        LayerSpec::new(LAYER_THICKNESS, "PbGlass", 6.22 * G_PER_CM3),
    )?;
    println!(
        "Stack: {} layers of PbGlass, {:.1} in total",
        LAYERS,
        Length(profile.total_thickness()),
    );

    // 2. Fill one tally per worker, each on its own thread.
    let (tx, rx) = crossbeam_channel::bounded(WORKERS as usize);
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let tx = tx.clone();
            thread::spawn(move || tx.send(fill_worker_tally(worker).unwrap()).unwrap())
        })
        .collect();
    drop(tx);

    // 3. Reduce into the master as workers finish.
    let mut master = RunTally::new(LAYERS);
    let merged = merge_from_channel(&mut master, rx)?;
    for handle in handles {
        handle.join().unwrap();
    }
    println!(
        "Merged {} workers: {} events, {} primary fates recorded",
        merged,
        master.events(),
        master.outcomes().total(),
    );

    // 4. Book the longitudinal profile and fill it from the run totals.
    let mut book = HistogramBook::new();
    let profile_id = book.book("Edep along the stack", 30, 0.0, 6.0, CM)?;
    for (layer, edep) in master.deposits().iter() {
        let center = (f64::from(layer) - 0.5) * LAYER_THICKNESS;
        book.fill(profile_id, center, edep.sum())?;
    }

    // 5. Generate the report. Normalizes the profile to MeV/mm per event
    //    and clears the per-run process and particle listings.
    let options = ReportOptions {
        profile: Some(profile_id),
        ..ReportOptions::default()
    };
    let report = RunReport::generate(&mut master, &profile, &mut book, &options)?;
    print!("{report}");

    // 6. Inspect the normalized profile.
    let hist = book.histogram(profile_id)?;
    println!("\n {} (MeV/mm per event):", hist.title());
    for idx in 0..hist.bin_count() {
        let content = hist.bin_content(idx).unwrap_or(0.0);
        if content > 0.0 {
            println!(
                "  depth {:>4.1} cm: {:.5}",
                hist.bin_center(idx).unwrap_or(0.0),
                content,
            );
        }
    }

    println!("\nDone.");
    Ok(())
}
