//! Analysis-sink interface and in-memory histogram book.
//!
//! Run reports hand their normalization commands to an [`AnalysisSink`]
//! rather than to a concrete plotting backend: the sink answers what a
//! histogram's bin width and declared axis unit are, and applies a scale
//! factor on request. [`HistogramBook`] is the in-memory implementation,
//! enough to test report normalization end to end and to serve as the
//! backing store for a longitudinal energy-deposit profile without
//! dragging in a plotting stack.
//!
//! Validation happens once, when a histogram is booked. Fill and scale are
//! treated as hot paths and only check that the id exists.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;

// ── HistId ─────────────────────────────────────────────────────────

/// Identifies a histogram within a book.
///
/// Books assign sequential ids starting at 0; `HistId(n)` is the n-th
/// histogram booked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistId(pub u32);

impl fmt::Display for HistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for HistId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

// ── HistError ──────────────────────────────────────────────────────

/// Errors from booking and addressing histograms.
#[derive(Clone, Debug, PartialEq)]
pub enum HistError {
    /// No histogram with this id exists in the book.
    UnknownHistogram {
        /// The offending id.
        id: HistId,
    },
    /// A histogram was booked with zero bins.
    ZeroBins,
    /// Axis bounds are non-finite or not strictly increasing.
    InvalidRange {
        /// Lower axis bound.
        lo: f64,
        /// Upper axis bound.
        hi: f64,
    },
    /// The declared axis unit is NaN, infinite, zero, or negative.
    InvalidUnit {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for HistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownHistogram { id } => write!(f, "no histogram with id {id}"),
            Self::ZeroBins => write!(f, "histogram must have at least one bin"),
            Self::InvalidRange { lo, hi } => {
                write!(f, "axis range [{lo}, {hi}) is not finite and increasing")
            }
            Self::InvalidUnit { value } => {
                write!(f, "axis unit must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for HistError {}

// ── AnalysisSink ───────────────────────────────────────────────────

/// The narrow surface a run report needs from an analysis backend.
///
/// `bin_width` and `unit_scale` describe a histogram's axis as booked:
/// the width is in axis units, the unit is the internal-units-per-axis-unit
/// factor it was declared with. `scale` multiplies every accumulated
/// content by `factor`. All three fail with
/// [`HistError::UnknownHistogram`] for an id the backend has never seen.
pub trait AnalysisSink {
    /// Bin width of `id`, in its axis units.
    fn bin_width(&self, id: HistId) -> Result<f64, HistError>;

    /// Declared axis unit of `id` (internal units per axis unit).
    fn unit_scale(&self, id: HistId) -> Result<f64, HistError>;

    /// Multiply every content of `id` by `factor`.
    fn scale(&mut self, id: HistId, factor: f64) -> Result<(), HistError>;
}

// ── Histogram1D ────────────────────────────────────────────────────

/// A fixed-binning 1-D histogram with under/overflow tracking.
///
/// The axis covers `[lo, hi)` in axis units; fills arrive in internal
/// units and are divided by the declared unit before binning, so a
/// histogram booked in centimetres can be filled straight from
/// millimetre-valued track positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram1D {
    title: String,
    lo: f64,
    hi: f64,
    unit: f64,
    bins: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
}

impl Histogram1D {
    /// Build a histogram with `bins` equal-width bins over `[lo, hi)` in
    /// axis units, where one axis unit is `unit` internal units.
    pub fn new(
        title: impl Into<String>,
        bins: u32,
        lo: f64,
        hi: f64,
        unit: f64,
    ) -> Result<Self, HistError> {
        if bins == 0 {
            return Err(HistError::ZeroBins);
        }
        if !lo.is_finite() || !hi.is_finite() || hi <= lo {
            return Err(HistError::InvalidRange { lo, hi });
        }
        if !unit.is_finite() || unit <= 0.0 {
            return Err(HistError::InvalidUnit { value: unit });
        }
        Ok(Self {
            title: title.into(),
            lo,
            hi,
            unit,
            bins: vec![0.0; bins as usize],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        })
    }

    /// Add `weight` at position `x` (internal units).
    pub fn fill(&mut self, x: f64, weight: f64) {
        self.entries += 1;
        let axis = x / self.unit;
        if axis < self.lo {
            self.underflow += weight;
            return;
        }
        let idx = ((axis - self.lo) / self.bin_width()) as usize;
        if idx >= self.bins.len() {
            self.overflow += weight;
        } else {
            self.bins[idx] += weight;
        }
    }

    /// Multiply every content (bins, underflow, overflow) by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for bin in &mut self.bins {
            *bin *= factor;
        }
        self.underflow *= factor;
        self.overflow *= factor;
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of bins.
    pub fn bin_count(&self) -> u32 {
        self.bins.len() as u32
    }

    /// Width of one bin, in axis units.
    pub fn bin_width(&self) -> f64 {
        (self.hi - self.lo) / self.bins.len() as f64
    }

    /// Declared axis unit (internal units per axis unit).
    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Content of bin `idx`, or `None` past the last bin.
    pub fn bin_content(&self, idx: u32) -> Option<f64> {
        self.bins.get(idx as usize).copied()
    }

    /// Center of bin `idx` in axis units, or `None` past the last bin.
    pub fn bin_center(&self, idx: u32) -> Option<f64> {
        if (idx as usize) < self.bins.len() {
            Some(self.lo + (idx as f64 + 0.5) * self.bin_width())
        } else {
            None
        }
    }

    /// Weight that fell below the axis.
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Weight that fell at or above the axis upper bound.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fill calls, in or out of range. Unaffected by scaling.
    pub fn entries(&self) -> u64 {
        self.entries
    }
}

// ── HistogramBook ──────────────────────────────────────────────────

/// An ordered collection of [`Histogram1D`] addressed by [`HistId`].
///
/// ```
/// use tally_hist::{AnalysisSink, HistogramBook};
/// use tally_core::units::CM;
///
/// let mut book = HistogramBook::new();
/// let id = book.book("Edep profile", 100, 0.0, 20.0, CM).unwrap();
/// book.fill(id, 15.0, 0.125).unwrap();   // 15 mm -> 1.5 cm -> bin 7
/// assert_eq!(book.histogram(id).unwrap().bin_content(7), Some(0.125));
/// assert_eq!(book.bin_width(id).unwrap(), 0.2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistogramBook {
    histograms: Vec<Histogram1D>,
}

impl HistogramBook {
    /// An empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book a histogram and return its id. Ids are sequential from 0.
    pub fn book(
        &mut self,
        title: impl Into<String>,
        bins: u32,
        lo: f64,
        hi: f64,
        unit: f64,
    ) -> Result<HistId, HistError> {
        let hist = Histogram1D::new(title, bins, lo, hi, unit)?;
        let id = HistId(self.histograms.len() as u32);
        self.histograms.push(hist);
        Ok(id)
    }

    /// Add `weight` at position `x` (internal units) to histogram `id`.
    pub fn fill(&mut self, id: HistId, x: f64, weight: f64) -> Result<(), HistError> {
        self.get_mut(id)?.fill(x, weight);
        Ok(())
    }

    /// The histogram behind `id`.
    pub fn histogram(&self, id: HistId) -> Result<&Histogram1D, HistError> {
        self.histograms
            .get(id.0 as usize)
            .ok_or(HistError::UnknownHistogram { id })
    }

    /// Number of histograms booked.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// `true` if no histogram has been booked.
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    fn get_mut(&mut self, id: HistId) -> Result<&mut Histogram1D, HistError> {
        self.histograms
            .get_mut(id.0 as usize)
            .ok_or(HistError::UnknownHistogram { id })
    }
}

impl AnalysisSink for HistogramBook {
    fn bin_width(&self, id: HistId) -> Result<f64, HistError> {
        Ok(self.histogram(id)?.bin_width())
    }

    fn unit_scale(&self, id: HistId) -> Result<f64, HistError> {
        Ok(self.histogram(id)?.unit())
    }

    fn scale(&mut self, id: HistId, factor: f64) -> Result<(), HistError> {
        self.get_mut(id)?.scale(factor);
        Ok(())
    }
}
