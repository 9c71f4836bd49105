//! Property tests for the merge algebra.
//!
//! Tallies are built from random update scripts and compared with full
//! structural equality, so these properties cover every component at
//! once (events, deposits, outcomes, processes, particles). Energies
//! are dyadic rationals (`k / 256`), which keeps every floating-point
//! sum exact and lets commutativity and associativity be asserted with
//! `==` instead of a tolerance.

use proptest::prelude::*;

use tally_core::{Location, PrimaryFate};
use tally_run::RunTally;

const LAYERS: u32 = 3;

#[derive(Clone, Debug)]
enum Update {
    Event,
    Edep { layer: u32, value: f64 },
    StackEdep { value: f64 },
    Outcome(PrimaryFate),
    Process(&'static str),
    Particle {
        location: Location,
        species: &'static str,
        energy: f64,
    },
}

fn apply(tally: &mut RunTally, update: &Update) {
    match update {
        Update::Event => tally.record_event(),
        Update::Edep { layer, value } => tally.add_edep(*layer, *value).unwrap(),
        Update::StackEdep { value } => tally.add_stack_edep(*value),
        Update::Outcome(fate) => tally.record_outcome(*fate),
        Update::Process(name) => tally.count_process(name),
        Update::Particle {
            location,
            species,
            energy,
        } => tally.count_particle(*location, species, *energy).unwrap(),
    }
}

/// Dyadic rational in `(0, 4]`.
fn arb_energy() -> impl Strategy<Value = f64> {
    (1u32..=1024).prop_map(|k| f64::from(k) / 256.0)
}

fn arb_fate() -> impl Strategy<Value = PrimaryFate> {
    prop_oneof![
        Just(PrimaryFate::Absorbed),
        Just(PrimaryFate::Transmitted),
        Just(PrimaryFate::Other),
    ]
}

fn arb_location() -> impl Strategy<Value = Location> {
    prop_oneof![
        Just(Location::Emerged),
        (1u32..=LAYERS).prop_map(Location::Layer),
    ]
}

fn arb_update() -> impl Strategy<Value = Update> {
    prop_oneof![
        Just(Update::Event),
        (1u32..=LAYERS, arb_energy()).prop_map(|(layer, value)| Update::Edep { layer, value }),
        arb_energy().prop_map(|value| Update::StackEdep { value }),
        arb_fate().prop_map(Update::Outcome),
        prop::sample::select(vec!["msc", "eIoni", "eBrem", "compt", "phot"])
            .prop_map(Update::Process),
        (
            arb_location(),
            prop::sample::select(vec!["gamma", "e-", "e+"]),
            arb_energy(),
        )
            .prop_map(|(location, species, energy)| Update::Particle {
                location,
                species,
                energy,
            }),
    ]
}

/// A worker tally built from a random update script. Every worker
/// carries the same primary configuration, as real workers do.
fn arb_tally() -> impl Strategy<Value = RunTally> {
    prop::collection::vec(arb_update(), 0..40).prop_map(|updates| {
        let mut tally = RunTally::new(LAYERS);
        tally.set_primary("e-", 1000.0);
        for update in &updates {
            apply(&mut tally, update);
        }
        tally
    })
}

fn merged(mut target: RunTally, source: &RunTally) -> RunTally {
    target.merge(source).unwrap();
    target
}

proptest! {
    #[test]
    fn merge_is_commutative(a in arb_tally(), b in arb_tally()) {
        let ab = merged(a.clone(), &b);
        let ba = merged(b, &a);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn merge_is_associative(a in arb_tally(), b in arb_tally(), c in arb_tally()) {
        let left = merged(merged(a.clone(), &b), &c);
        let right = merged(a, &merged(b, &c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn fresh_tally_is_the_merge_identity(a in arb_tally()) {
        let fresh = RunTally::new(LAYERS);
        prop_assert_eq!(&merged(a.clone(), &fresh), &a);
        prop_assert_eq!(&merged(fresh, &a), &a);
    }

    #[test]
    fn merge_adds_totals_without_loss(a in arb_tally(), b in arb_tally()) {
        let m = merged(a.clone(), &b);
        prop_assert_eq!(m.events(), a.events() + b.events());
        prop_assert_eq!(m.outcomes().total(), a.outcomes().total() + b.outcomes().total());
        prop_assert_eq!(
            m.deposits().stack().sum(),
            a.deposits().stack().sum() + b.deposits().stack().sum()
        );
        for layer in 1..=LAYERS {
            prop_assert_eq!(
                m.deposits().layer(layer).unwrap().sum(),
                a.deposits().layer(layer).unwrap().sum()
                    + b.deposits().layer(layer).unwrap().sum()
            );
        }
    }

    #[test]
    fn non_positive_deposits_are_no_ops(
        a in arb_tally(),
        layer in 1u32..=LAYERS,
        value in -4.0f64..=0.0,
    ) {
        let mut touched = a.clone();
        touched.add_edep(layer, value).unwrap();
        touched.add_stack_edep(value);
        prop_assert_eq!(touched, a);
    }

    #[test]
    fn recorded_extrema_stay_ordered(a in arb_tally(), b in arb_tally()) {
        let m = merged(a, &b);
        for layer in 1..=LAYERS {
            if let Some(x) = m.deposits().layer(layer).unwrap().extrema() {
                prop_assert!(x.min() <= x.max());
                prop_assert!(x.min() > 0.0);
            }
        }
    }
}
