//! End-of-run reduction of worker tallies into a master tally.
//!
//! Two shapes of the same fold. [`merge_all`] takes the tallies as an
//! iterator, for callers that joined their workers first and have the
//! results in hand. [`merge_from_channel`] drains a crossbeam channel
//! until every sender has hung up, for callers that want workers to
//! ship their tally the moment they finish instead of waiting on join
//! order. Merge is commutative and associative, so both produce the
//! same master no matter how worker completion interleaves.

use crossbeam_channel::Receiver;

use tally_core::TallyError;

use crate::run::RunTally;

/// Fold `workers` into `master` in iteration order.
///
/// Stops at the first merge failure; contributions already folded stay
/// in `master`, so treat it as tainted after an error.
pub fn merge_all<I>(master: &mut RunTally, workers: I) -> Result<(), TallyError>
where
    I: IntoIterator<Item = RunTally>,
{
    for worker in workers {
        master.merge(&worker)?;
    }
    Ok(())
}

/// Drain `workers` into `master` until all senders disconnect.
///
/// Blocks between arrivals. Returns how many tallies were merged. As
/// with [`merge_all`], an error leaves `master` holding whatever was
/// merged before the failing contribution.
pub fn merge_from_channel(
    master: &mut RunTally,
    workers: Receiver<RunTally>,
) -> Result<usize, TallyError> {
    let mut merged = 0;
    for worker in workers {
        master.merge(&worker)?;
        merged += 1;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use tally_core::{Location, PrimaryFate};

    fn worker_tally(layer_edep: f64, emerged: u32) -> RunTally {
        let mut tally = RunTally::new(2);
        tally.record_event();
        tally.add_edep(1, layer_edep).unwrap();
        tally.add_stack_edep(layer_edep);
        tally.record_outcome(PrimaryFate::Transmitted);
        tally.count_process("eIoni");
        for _ in 0..emerged {
            tally.count_particle(Location::Emerged, "e-", 1.0).unwrap();
        }
        tally
    }

    #[test]
    fn merge_all_folds_every_worker() {
        let mut master = RunTally::new(2);
        merge_all(
            &mut master,
            vec![worker_tally(1.0, 1), worker_tally(2.0, 2), worker_tally(4.0, 0)],
        )
        .unwrap();
        assert_eq!(master.events(), 3);
        assert_eq!(master.deposits().layer(1).unwrap().sum(), 7.0);
        assert_eq!(master.processes().get("eIoni"), 3);
        assert_eq!(
            master
                .particles()
                .stats(Location::Emerged, "e-")
                .unwrap()
                .count(),
            3
        );
    }

    #[test]
    fn fold_order_does_not_change_the_master() {
        let workers = [worker_tally(1.0, 1), worker_tally(2.0, 4), worker_tally(0.5, 2)];

        let mut forward = RunTally::new(2);
        merge_all(&mut forward, workers.to_vec()).unwrap();

        let mut backward = RunTally::new(2);
        merge_all(&mut backward, workers.iter().rev().cloned()).unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn merge_all_stops_at_a_mismatched_worker() {
        let mut master = RunTally::new(2);
        let err = merge_all(
            &mut master,
            vec![worker_tally(1.0, 0), RunTally::new(3)],
        )
        .unwrap_err();
        match err {
            TallyError::LayerCountMismatch { target: 2, source: 3 } => {}
            other => panic!("expected LayerCountMismatch, got {other:?}"),
        }
        // The first worker landed before the failure.
        assert_eq!(master.events(), 1);
    }

    #[test]
    fn channel_reduction_waits_for_all_workers() {
        let (tx, rx) = crossbeam_channel::bounded(4);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let tx = tx.clone();
                thread::spawn(move || {
                    let tally = worker_tally(f64::from(i) + 1.0, i);
                    tx.send(tally).unwrap();
                })
            })
            .collect();
        // Reduction only finishes once every sender is gone.
        drop(tx);

        let mut master = RunTally::new(2);
        let merged = merge_from_channel(&mut master, rx).unwrap();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(merged, 4);
        assert_eq!(master.events(), 4);
        // 1 + 2 + 3 + 4.
        assert_eq!(master.deposits().layer(1).unwrap().sum(), 10.0);
        assert_eq!(master.outcomes().count(PrimaryFate::Transmitted), 4);
    }
}
