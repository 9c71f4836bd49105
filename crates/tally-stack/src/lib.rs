//! Layered-absorber stack description.
//!
//! A [`StackProfile`] is the immutable geometry summary a run report needs:
//! how many absorber layers the beam traverses and, per layer, its
//! thickness, material name, and density. It is validated once at
//! construction and then only read; accumulators never hold one (they
//! capture just the layer count), so a profile built for the report cannot
//! drift out of sync with live statistics mid-run.
//!
//! Thickness values are in the internal length units of
//! [`tally_core::units`] (`MM = 1.0`); densities use the reporting scale
//! (`G_PER_CM3 = 1.0`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::error::Error;
use std::fmt;

// ── LayerSpec ──────────────────────────────────────────────────────

/// One absorber layer: thickness, material name, density.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    /// Thickness along the beam axis, internal length units.
    pub thickness: f64,
    /// Material name as it should appear in reports.
    pub material: String,
    /// Density on the `G_PER_CM3` reporting scale.
    pub density: f64,
}

impl LayerSpec {
    /// Convenience constructor taking any `Into<String>` material name.
    pub fn new(thickness: f64, material: impl Into<String>, density: f64) -> Self {
        Self {
            thickness,
            material: material.into(),
            density,
        }
    }
}

// ── StackError ─────────────────────────────────────────────────────

/// Errors detected while validating a [`StackProfile`].
#[derive(Clone, Debug, PartialEq)]
pub enum StackError {
    /// A layer thickness is NaN, infinite, zero, or negative.
    InvalidThickness {
        /// The offending layer (1-based).
        layer: u32,
        /// The invalid value.
        value: f64,
    },
    /// A layer density is NaN, infinite, zero, or negative.
    InvalidDensity {
        /// The offending layer (1-based).
        layer: u32,
        /// The invalid value.
        value: f64,
    },
    /// A layer has an empty material name.
    EmptyMaterial {
        /// The offending layer (1-based).
        layer: u32,
    },
    /// More layers than a `u32` layer index can address.
    LayerCountOverflow {
        /// The configured layer count.
        count: usize,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThickness { layer, value } => {
                write!(
                    f,
                    "layer {layer}: thickness must be finite and positive, got {value}"
                )
            }
            Self::InvalidDensity { layer, value } => {
                write!(
                    f,
                    "layer {layer}: density must be finite and positive, got {value}"
                )
            }
            Self::EmptyMaterial { layer } => {
                write!(f, "layer {layer}: material name is empty")
            }
            Self::LayerCountOverflow { count } => {
                write!(f, "layer count {count} exceeds u32::MAX")
            }
        }
    }
}

impl Error for StackError {}

// ── StackProfile ───────────────────────────────────────────────────

/// Validated, immutable description of a layered absorber stack.
///
/// Layers are addressed 1-based, matching the accumulator convention. An
/// empty stack is legal: a run with no absorbers still counts events and
/// primary fates.
#[derive(Clone, Debug, PartialEq)]
pub struct StackProfile {
    layers: Vec<LayerSpec>,
}

impl StackProfile {
    /// Validate `layers` and build a profile.
    pub fn new(layers: Vec<LayerSpec>) -> Result<Self, StackError> {
        // 1. Layer indices must fit in u32.
        if u32::try_from(layers.len()).is_err() {
            return Err(StackError::LayerCountOverflow {
                count: layers.len(),
            });
        }
        // 2. Per-layer invariants, reported with 1-based indices.
        for (i, layer) in layers.iter().enumerate() {
            let index = i as u32 + 1;
            if !layer.thickness.is_finite() || layer.thickness <= 0.0 {
                return Err(StackError::InvalidThickness {
                    layer: index,
                    value: layer.thickness,
                });
            }
            if !layer.density.is_finite() || layer.density <= 0.0 {
                return Err(StackError::InvalidDensity {
                    layer: index,
                    value: layer.density,
                });
            }
            if layer.material.is_empty() {
                return Err(StackError::EmptyMaterial { layer: index });
            }
        }
        Ok(Self { layers })
    }

    /// A stack of `count` identical layers.
    pub fn uniform(count: u32, layer: LayerSpec) -> Result<Self, StackError> {
        Self::new(vec![layer; count as usize])
    }

    /// Number of layers.
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// The spec for `layer` (1-based), or `None` if out of range.
    pub fn layer(&self, layer: u32) -> Option<&LayerSpec> {
        if layer == 0 {
            return None;
        }
        self.layers.get((layer - 1) as usize)
    }

    /// Iterate `(layer, spec)` pairs in beam order, 1-based.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &LayerSpec)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, spec)| (i as u32 + 1, spec))
    }

    /// Total thickness along the beam axis.
    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|layer| layer.thickness).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::units::{CM, G_PER_CM3, MM};

    fn lead_glass(thickness: f64) -> LayerSpec {
        LayerSpec::new(thickness, "PbGlass", 6.22 * G_PER_CM3)
    }

    #[test]
    fn valid_profile_round_trips_its_layers() {
        let profile = StackProfile::new(vec![
            lead_glass(2.0 * CM),
            LayerSpec::new(5.0 * MM, "Silicon", 2.33 * G_PER_CM3),
        ])
        .unwrap();
        assert_eq!(profile.layer_count(), 2);
        assert_eq!(profile.layer(1).unwrap().material, "PbGlass");
        assert_eq!(profile.layer(2).unwrap().thickness, 5.0 * MM);
        assert!(profile.layer(0).is_none());
        assert!(profile.layer(3).is_none());
        assert_eq!(profile.total_thickness(), 25.0 * MM);
    }

    #[test]
    fn empty_stack_is_legal() {
        let profile = StackProfile::new(Vec::new()).unwrap();
        assert_eq!(profile.layer_count(), 0);
        assert_eq!(profile.total_thickness(), 0.0);
        assert_eq!(profile.iter().count(), 0);
    }

    #[test]
    fn uniform_repeats_the_layer() {
        let profile = StackProfile::uniform(3, lead_glass(1.0 * CM)).unwrap();
        assert_eq!(profile.layer_count(), 3);
        for (_, spec) in profile.iter() {
            assert_eq!(spec, &lead_glass(1.0 * CM));
        }
    }

    #[test]
    fn non_positive_thickness_is_rejected() {
        let err = StackProfile::new(vec![lead_glass(0.0)]).unwrap_err();
        match err {
            StackError::InvalidThickness { layer: 1, value } => assert_eq!(value, 0.0),
            other => panic!("expected InvalidThickness, got {other:?}"),
        }
        assert!(StackProfile::new(vec![lead_glass(-1.0)]).is_err());
        assert!(StackProfile::new(vec![lead_glass(f64::NAN)]).is_err());
        assert!(StackProfile::new(vec![lead_glass(f64::INFINITY)]).is_err());
    }

    #[test]
    fn non_positive_density_is_rejected() {
        let err =
            StackProfile::new(vec![LayerSpec::new(1.0 * CM, "PbGlass", -6.22)]).unwrap_err();
        match err {
            StackError::InvalidDensity { layer: 1, .. } => {}
            other => panic!("expected InvalidDensity, got {other:?}"),
        }
    }

    #[test]
    fn empty_material_is_rejected_with_layer_index() {
        let err = StackProfile::new(vec![lead_glass(1.0 * CM), LayerSpec::new(1.0, "", 1.0)])
            .unwrap_err();
        match err {
            StackError::EmptyMaterial { layer: 2 } => {}
            other => panic!("expected EmptyMaterial for layer 2, got {other:?}"),
        }
    }

    #[test]
    fn error_display_names_the_layer() {
        let msg = StackError::InvalidThickness {
            layer: 3,
            value: -2.0,
        }
        .to_string();
        assert!(msg.contains("layer 3"));
        assert!(msg.contains("-2"));
    }
}
