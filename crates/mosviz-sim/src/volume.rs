//! The channel volume: the box the field grid and the carriers live in.

use mosviz_core::{PhysicalParameters, SimConfig};

/// Axis-aligned bounds of the simulated channel volume (microns), in the
/// device coordinate frame.
///
/// The x range runs from the source spawn face to the drain face, the y
/// range spans the exaggerated channel thickness below the gate oxide, and
/// the z range spans the source width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelVolume {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
    pub z_start: f64,
    pub z_end: f64,
}

impl ChannelVolume {
    /// Compute the volume from derived geometry. The channel thickness is
    /// the maximum depletion width scaled by the configured visual
    /// exaggeration factor.
    pub fn from_parameters(params: &PhysicalParameters, config: &SimConfig) -> Self {
        let g = &params.geometry;
        let thickness = params.max_depletion_width_um * config.channel_exaggeration;
        Self {
            x_start: g.max_x_source,
            x_end: g.max_x_source + g.length_um,
            y_start: g.min_y_gate_oxide - thickness,
            y_end: g.min_y_gate_oxide,
            z_start: g.min_z_source,
            z_end: g.max_z_source,
        }
    }

    /// Extent along each axis.
    pub fn extents(&self) -> [f64; 3] {
        [
            self.x_end - self.x_start,
            self.y_end - self.y_start,
            self.z_end - self.z_start,
        ]
    }
}
