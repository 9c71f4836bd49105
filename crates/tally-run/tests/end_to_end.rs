//! Whole-pipeline scenarios: workers accumulate, a master reduces, a
//! report is generated, and the numbers printed are checked against the
//! hand-computed statistics of the inputs.

use std::thread;

use tally_core::units::{CM, G_PER_CM3};
use tally_core::{Location, PrimaryFate};
use tally_hist::HistId;
use tally_run::{merge_all, merge_from_channel, ReportOptions, RunReport, RunTally};
use tally_stack::{LayerSpec, StackProfile};
use tally_test_utils::{seeded_worker, RecordingSink};

fn pb_glass_profile(layers: u32) -> StackProfile {
    StackProfile::uniform(layers, LayerSpec::new(2.0 * CM, "PbGlass", 6.22 * G_PER_CM3)).unwrap()
}

/// Two workers observe the same emerging species with known statistics;
/// the merged ledger must report the combined count, sum, and widened
/// extrema, and the mean must come out of the merged sums.
#[test]
fn two_worker_species_statistics_combine_exactly() {
    // Worker A: 40 gammas, energies summing to 80.0, range [0.5, 3.0].
    let mut a = RunTally::new(1);
    a.count_particle(Location::Emerged, "gamma", 0.5).unwrap();
    a.count_particle(Location::Emerged, "gamma", 3.0).unwrap();
    for _ in 0..37 {
        a.count_particle(Location::Emerged, "gamma", 2.0).unwrap();
    }
    a.count_particle(Location::Emerged, "gamma", 2.5).unwrap();

    // Worker B: 45 gammas, energies summing to 99.0, range [0.4, 2.5].
    let mut b = RunTally::new(1);
    b.count_particle(Location::Emerged, "gamma", 0.4).unwrap();
    b.count_particle(Location::Emerged, "gamma", 2.5).unwrap();
    let filler = (99.0 - 0.4 - 2.5) / 43.0;
    for _ in 0..43 {
        b.count_particle(Location::Emerged, "gamma", filler).unwrap();
    }

    let mut master = RunTally::new(1);
    merge_all(&mut master, vec![a, b]).unwrap();

    let gamma = master.particles().stats(Location::Emerged, "gamma").unwrap();
    assert_eq!(gamma.count(), 85);
    // Extrema are copies of recorded samples, never arithmetic results.
    assert_eq!(gamma.energy_min(), 0.4);
    assert_eq!(gamma.energy_max(), 3.0);
    // Sums carry float rounding from the non-dyadic filler.
    assert!((gamma.energy_sum() - 179.0).abs() < 1e-12 * 179.0);
    assert!((gamma.mean_energy() - 179.0 / 85.0).abs() < 1e-12);
}

/// Reduce seeded workers over a channel, then check the report's
/// normalized numbers against the surviving raw sums.
#[test]
fn channel_reduction_and_report_agree_with_raw_sums() {
    let layers = 3;
    let (tx, rx) = crossbeam_channel::bounded(4);
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let tx = tx.clone();
            thread::spawn(move || tx.send(seeded_worker(seed, 3, 250)).unwrap())
        })
        .collect();
    drop(tx);

    let mut master = RunTally::new(layers);
    let merged = merge_from_channel(&mut master, rx).unwrap();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(merged, 4);
    assert_eq!(master.events(), 1000);
    assert_eq!(master.outcomes().total(), 1000);

    let events = master.events() as f64;
    let layer1_sum = master.deposits().layer(1).unwrap().sum();
    let stack_sum = master.deposits().stack().sum();

    let mut sink = RecordingSink::new(0.5, 10.0);
    let report = RunReport::generate(
        &mut master,
        &pb_glass_profile(layers),
        &mut sink,
        &ReportOptions::default(),
    )
    .unwrap();

    assert_eq!(report.events, 1000);
    assert_eq!(report.deposits[0].mean, layer1_sum / events);
    assert_eq!(report.stack_deposit.as_ref().unwrap().mean, stack_sum / events);
    assert!(report.absorbed_percent + report.transmitted_percent <= 100.0);
    // Raw sums survived report generation.
    assert_eq!(master.deposits().layer(1).unwrap().sum(), layer1_sum);
}

/// A run with zero events renders the conditions header and nothing
/// else, and never reaches the analysis sink.
#[test]
fn zero_event_run_renders_header_only() {
    let mut sink = RecordingSink::new(0.5, 10.0);
    let mut tally = RunTally::new(2);
    tally.set_primary("e-", 1000.0);

    let report = RunReport::generate(
        &mut tally,
        &pb_glass_profile(2),
        &mut sink,
        &ReportOptions {
            profile: Some(HistId(7)),
            ..ReportOptions::default()
        },
    )
    .unwrap();

    assert!(sink.scale_calls.is_empty());
    let text = report.to_string();
    assert!(text.contains("The run is 0 e-"));
    assert!(text.contains("PbGlass"));
    assert!(!text.contains("Process calls frequency"));
    assert!(!text.contains("emerging from the stack"));
}

/// The same workers folded in opposite orders must render to the same
/// text, byte for byte.
#[test]
fn rendered_report_is_merge_order_independent() {
    let workers = [
        seeded_worker(11, 2, 300),
        seeded_worker(22, 2, 300),
        seeded_worker(33, 2, 300),
    ];

    let render = |order: Vec<RunTally>| {
        let mut master = RunTally::new(2);
        merge_all(&mut master, order).unwrap();
        let mut sink = RecordingSink::new(0.5, 10.0);
        RunReport::generate(
            &mut master,
            &pb_glass_profile(2),
            &mut sink,
            &ReportOptions::default(),
        )
        .unwrap()
        .to_string()
    };

    let forward = render(workers.to_vec());
    let backward = render(workers.iter().rev().cloned().collect());
    assert_eq!(forward, backward);
}

/// Default cutoff boundary: a species needs strictly more than 100
/// particles to make a layer listing; emerging species always appear.
#[test]
fn default_cutoff_boundary_at_one_hundred() {
    let mut tally = RunTally::new(1);
    tally.set_primary("e-", 1000.0);
    for _ in 0..10 {
        tally.record_event();
    }
    for _ in 0..100 {
        tally.count_particle(Location::Layer(1), "gamma", 1.0).unwrap();
    }
    for _ in 0..101 {
        tally.count_particle(Location::Layer(1), "e+", 0.5).unwrap();
    }
    tally.count_particle(Location::Emerged, "e-", 2.0).unwrap();

    let mut sink = RecordingSink::new(0.5, 10.0);
    let report = RunReport::generate(
        &mut tally,
        &pb_glass_profile(1),
        &mut sink,
        &ReportOptions::default(),
    )
    .unwrap();

    let listed: Vec<&str> = report.produced[0]
        .iter()
        .map(|row| row.species.as_str())
        .collect();
    assert_eq!(listed, ["e+"]);
    assert_eq!(report.produced[0][0].per_event, 10); // 101 / 10 truncated
    assert_eq!(report.emerged.len(), 1);
    assert_eq!(report.emerged[0].species, "e-");
}

/// Reporting clears the listings but not the run totals; a later report
/// covers the union of both accumulation phases; `reset` starts over.
#[test]
fn volatile_clear_then_reset_lifecycle() {
    let profile = pb_glass_profile(2);
    let mut sink = RecordingSink::new(0.5, 10.0);
    let mut tally = RunTally::new(2);
    tally.set_primary("e-", 1000.0);
    for _ in 0..4 {
        tally.record_event();
        tally.add_edep(1, 0.5).unwrap();
        tally.count_process("eIoni");
        tally.count_particle(Location::Layer(1), "gamma", 1.0).unwrap();
        tally.record_outcome(PrimaryFate::Transmitted);
    }

    let first =
        RunReport::generate(&mut tally, &profile, &mut sink, &ReportOptions::default()).unwrap();
    assert_eq!(first.deposits[0].mean, 0.5);
    assert!(tally.processes().is_empty());
    assert!(tally.particles().is_empty());
    assert_eq!(tally.events(), 4);

    // Keep accumulating into the same run.
    for _ in 0..4 {
        tally.record_event();
        tally.add_edep(1, 1.5).unwrap();
        tally.count_process("compt");
    }
    let second =
        RunReport::generate(&mut tally, &profile, &mut sink, &ReportOptions::default()).unwrap();
    // (4 * 0.5 + 4 * 1.5) / 8.
    assert_eq!(second.deposits[0].mean, 1.0);
    assert_eq!(second.events, 8);
    // Only the processes seen since the first report are listed.
    assert_eq!(second.processes.len(), 1);
    assert_eq!(second.processes[0].name, "compt");
    // Fate percentages still cover the whole run.
    assert_eq!(second.transmitted_percent, 50.0);

    tally.reset();
    assert_eq!(tally, RunTally::new(2));
}
