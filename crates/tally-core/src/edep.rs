//! Energy-deposit tallies: running sum plus explicit-empty extrema.
//!
//! An [`EdepTally`] accumulates strictly positive deposit values. The
//! positivity floor is deliberate: transport steps report a deposit for
//! every step, most of them zero, and a zero must not become the minimum
//! (nor inflate the sample set). Extrema live behind an `Option` so that a
//! tally which never saw a deposit says so explicitly instead of carrying
//! an "infinitely large minimum" sentinel.
//!
//! [`DepositTable`] groups one tally per absorber layer (1-based) with one
//! extra tally for the whole stack, mirroring how a layered-absorber run
//! scores energy twice: once in the layer the step occurred in and once
//! against the stack total.

use smallvec::SmallVec;

use crate::error::TallyError;

/// Running minimum and maximum over recorded deposits.
///
/// Only exists once at least one deposit has been recorded; see
/// [`EdepTally::extrema`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extrema {
    min: f64,
    max: f64,
}

impl Extrema {
    fn from_sample(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    fn record(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn merge(&mut self, other: &Extrema) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
    }

    /// Smallest recorded deposit.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded deposit.
    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Energy-deposit accumulator for one scoring site.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdepTally {
    sum: f64,
    extrema: Option<Extrema>,
}

impl EdepTally {
    /// A tally with no recorded deposits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one deposit. Values `<= 0` (and NaN) are ignored entirely;
    /// they contribute to neither the sum nor the extrema.
    pub fn record(&mut self, value: f64) {
        if value > 0.0 {
            self.sum += value;
            match &mut self.extrema {
                Some(extrema) => extrema.record(value),
                None => self.extrema = Some(Extrema::from_sample(value)),
            }
        }
    }

    /// Combine another tally into this one. An empty tally is the identity.
    pub fn merge(&mut self, other: &EdepTally) {
        self.sum += other.sum;
        match (&mut self.extrema, other.extrema) {
            (Some(extrema), Some(theirs)) => extrema.merge(&theirs),
            (None, Some(theirs)) => self.extrema = Some(theirs),
            (_, None) => {}
        }
    }

    /// Sum of all recorded deposits.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Extrema of recorded deposits, or `None` if nothing was recorded.
    pub fn extrema(&self) -> Option<Extrema> {
        self.extrema
    }

    /// `true` if no deposit has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.extrema.is_none()
    }
}

/// Per-layer deposit tallies plus the whole-stack aggregate.
///
/// Layer indices are 1-based to match the geometry convention everywhere
/// else in the workspace; the stack aggregate is addressed through
/// [`stack`](DepositTable::stack) rather than a magic index. Stacks up to
/// 8 layers keep their tallies inline; deeper stacks spill to the heap
/// transparently.
#[derive(Clone, Debug, PartialEq)]
pub struct DepositTable {
    layers: SmallVec<[EdepTally; 8]>,
    stack: EdepTally,
}

impl DepositTable {
    /// A table sized for `layers` absorber layers, all tallies empty.
    pub fn new(layers: u32) -> Self {
        Self {
            layers: SmallVec::from_elem(EdepTally::new(), layers as usize),
            stack: EdepTally::new(),
        }
    }

    /// Number of layers this table was sized for.
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// Record a deposit in `layer` (1-based).
    ///
    /// The index is validated before the positivity floor is applied: an
    /// out-of-range layer is an error even for a zero deposit, because it
    /// signals a geometry/accumulator mismatch.
    pub fn record(&mut self, layer: u32, value: f64) -> Result<(), TallyError> {
        let tally = self.layer_mut(layer)?;
        tally.record(value);
        Ok(())
    }

    /// Record a deposit against the whole-stack aggregate.
    pub fn record_stack(&mut self, value: f64) {
        self.stack.record(value);
    }

    /// The tally for `layer` (1-based).
    pub fn layer(&self, layer: u32) -> Result<&EdepTally, TallyError> {
        if layer == 0 || layer > self.layer_count() {
            return Err(TallyError::LayerOutOfRange {
                layer,
                layers: self.layer_count(),
            });
        }
        Ok(&self.layers[(layer - 1) as usize])
    }

    fn layer_mut(&mut self, layer: u32) -> Result<&mut EdepTally, TallyError> {
        if layer == 0 || layer > self.layer_count() {
            return Err(TallyError::LayerOutOfRange {
                layer,
                layers: self.layer_count(),
            });
        }
        Ok(&mut self.layers[(layer - 1) as usize])
    }

    /// The whole-stack tally.
    pub fn stack(&self) -> &EdepTally {
        &self.stack
    }

    /// Iterate `(layer, tally)` pairs in layer order, 1-based.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &EdepTally)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, tally)| (i as u32 + 1, tally))
    }

    /// Combine another table into this one, layer by layer.
    pub fn merge(&mut self, other: &DepositTable) -> Result<(), TallyError> {
        if self.layer_count() != other.layer_count() {
            return Err(TallyError::LayerCountMismatch {
                target: self.layer_count(),
                source: other.layer_count(),
            });
        }
        for (mine, theirs) in self.layers.iter_mut().zip(other.layers.iter()) {
            mine.merge(theirs);
        }
        self.stack.merge(&other.stack);
        Ok(())
    }
}
