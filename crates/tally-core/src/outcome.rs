//! Primary-track fate counters.
//!
//! Every simulated event ends with its primary track in exactly one of
//! three states: absorbed inside the stack, transmitted through the far
//! face, or anything else (reflected, decayed in flight, killed by a
//! cut). [`OutcomeCounts`] holds one counter per fate; the percentages
//! printed in a run report are derived from these at report time.

use std::fmt;

use crate::error::TallyError;

/// What became of an event's primary track.
///
/// The discriminants are stable and double as the raw slot indices used
/// by callers that receive the fate as an integer from the tracking
/// layer; use [`PrimaryFate::try_from`] for that path so out-of-range
/// slots fail instead of counting silently into the wrong bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimaryFate {
    /// The primary stopped inside the absorber stack.
    Absorbed = 0,
    /// The primary left through the downstream face.
    Transmitted = 1,
    /// Any other end: backscattered, decayed, killed.
    Other = 2,
}

impl PrimaryFate {
    /// All fates, in slot order.
    pub const ALL: [PrimaryFate; 3] = [
        PrimaryFate::Absorbed,
        PrimaryFate::Transmitted,
        PrimaryFate::Other,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for PrimaryFate {
    type Error = TallyError;

    fn try_from(slot: usize) -> Result<Self, Self::Error> {
        match slot {
            0 => Ok(PrimaryFate::Absorbed),
            1 => Ok(PrimaryFate::Transmitted),
            2 => Ok(PrimaryFate::Other),
            _ => Err(TallyError::InvalidOutcome { slot }),
        }
    }
}

impl fmt::Display for PrimaryFate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimaryFate::Absorbed => "absorbed",
            PrimaryFate::Transmitted => "transmitted",
            PrimaryFate::Other => "other",
        };
        f.write_str(name)
    }
}

/// One counter per [`PrimaryFate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    counts: [u64; 3],
}

impl OutcomeCounts {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event ending in `fate`.
    pub fn record(&mut self, fate: PrimaryFate) {
        self.counts[fate.slot()] += 1;
    }

    /// Events counted for `fate`.
    pub fn count(&self, fate: PrimaryFate) -> u64 {
        self.counts[fate.slot()]
    }

    /// Sum over all fates.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Add another set of counters into this one, slot by slot.
    pub fn merge(&mut self, other: &OutcomeCounts) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}
