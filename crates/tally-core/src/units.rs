//! Numeric unit conventions and best-unit display formatting.
//!
//! Statistics are accumulated in a fixed internal system: energies are
//! multiples of [`MEV`], lengths are multiples of [`MM`]. Densities are an
//! independent reporting-only scale with [`G_PER_CM3`] as the base. Code
//! that feeds the accumulator multiplies by the constant for the unit it
//! has (`3.5 * KEV`, `2.0 * CM`); code that displays values wraps them in
//! [`Energy`], [`Length`], or [`Density`], whose `Display` impls pick the
//! largest unit that keeps the magnitude at or above one.
//!
//! ```
//! use tally_core::units::{Energy, KEV, MEV};
//!
//! assert_eq!(format!("{}", Energy(2500.0 * MEV)), "2.5000 GeV");
//! assert_eq!(format!("{:.1}", Energy(3.5 * KEV)), "3.5 keV");
//! ```

use std::fmt;

// ── Energy (base: MeV) ───────────────────────────────────────────────

/// Mega-electronvolt, the internal energy unit.
pub const MEV: f64 = 1.0;
/// Electronvolt.
pub const EV: f64 = 1e-6 * MEV;
/// Kilo-electronvolt.
pub const KEV: f64 = 1e-3 * MEV;
/// Giga-electronvolt.
pub const GEV: f64 = 1e3 * MEV;
/// Tera-electronvolt.
pub const TEV: f64 = 1e6 * MEV;
/// Joule (1 J = 6.241509074e12 MeV).
pub const JOULE: f64 = 6.241_509_074e12 * MEV;

// ── Length (base: mm) ────────────────────────────────────────────────

/// Millimetre, the internal length unit.
pub const MM: f64 = 1.0;
/// Micrometre.
pub const UM: f64 = 1e-3 * MM;
/// Nanometre.
pub const NM: f64 = 1e-6 * MM;
/// Centimetre.
pub const CM: f64 = 10.0 * MM;
/// Metre.
pub const M: f64 = 1e3 * MM;
/// Kilometre.
pub const KM: f64 = 1e6 * MM;

// ── Density (base: g/cm3, reporting only) ────────────────────────────

/// Gram per cubic centimetre, the density reporting unit.
pub const G_PER_CM3: f64 = 1.0;
/// Milligram per cubic centimetre.
pub const MG_PER_CM3: f64 = 1e-3 * G_PER_CM3;

/// Pick the largest unit from `table` (ordered large to small) that keeps
/// `|value|` at or above one, falling back to the smallest entry. Returns
/// the scaled value and the unit symbol.
fn best_unit(value: f64, table: &[(f64, &'static str)]) -> (f64, &'static str) {
    for &(unit, symbol) in table {
        if value.abs() >= unit {
            return (value / unit, symbol);
        }
    }
    let &(unit, symbol) = table.last().expect("unit table is never empty");
    (value / unit, symbol)
}

fn fmt_quantity(
    f: &mut fmt::Formatter<'_>,
    value: f64,
    table: &[(f64, &'static str)],
) -> fmt::Result {
    let (scaled, symbol) = best_unit(value, table);
    match f.precision() {
        Some(p) => write!(f, "{scaled:.p$} {symbol}"),
        None => write!(f, "{scaled:.4} {symbol}"),
    }
}

/// An energy value (internal units) displayed with its best unit.
///
/// Honors the formatter precision; defaults to four decimals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Energy(pub f64);

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TABLE: &[(f64, &'static str)] = &[
            (TEV, "TeV"),
            (GEV, "GeV"),
            (MEV, "MeV"),
            (KEV, "keV"),
            (EV, "eV"),
        ];
        fmt_quantity(f, self.0, TABLE)
    }
}

/// A length value (internal units) displayed with its best unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Length(pub f64);

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TABLE: &[(f64, &'static str)] = &[
            (KM, "km"),
            (M, "m"),
            (CM, "cm"),
            (MM, "mm"),
            (UM, "um"),
            (NM, "nm"),
        ];
        fmt_quantity(f, self.0, TABLE)
    }
}

/// A density value displayed with its best unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Density(pub f64);

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TABLE: &[(f64, &'static str)] = &[(G_PER_CM3, "g/cm3"), (MG_PER_CM3, "mg/cm3")];
        fmt_quantity(f, self.0, TABLE)
    }
}
