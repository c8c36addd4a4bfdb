//! Discretized electric-field vector grid over the channel volume.
//!
//! The grid is allocated once from geometry (rare: load time only) and its
//! values are refreshed in place on every bias update (frequent). A refresh
//! rewrites every cell from the new operating point, so a completed refresh
//! never mixes cells built under different bias values.

use nalgebra::Vector3;

use mosviz_core::{OperatingPoint, OperatingRegion, PhysicalParameters, SimConfig};

use crate::volume::ChannelVolume;

/// A 3-D grid of field vectors, one per discretized cell.
#[derive(Debug, Clone)]
pub struct FieldGrid {
    dims: [usize; 3],
    resolution: [f64; 3],
    volume: ChannelVolume,
    data: Vec<Vector3<f64>>,
}

impl FieldGrid {
    /// Distinguished vector for cells whose center falls outside the
    /// computed channel bounds; never a physically meaningful value.
    pub fn out_of_bounds_marker() -> Vector3<f64> {
        Vector3::new(0.0, 1.0, 0.0)
    }

    /// Allocate the grid over a channel volume. Cell count per axis is
    /// `floor(extent / resolution)`.
    pub fn allocate(volume: ChannelVolume, resolution: [f64; 3]) -> Self {
        let extents = volume.extents();
        let dims = [
            (extents[0] / resolution[0]) as usize,
            (extents[1] / resolution[1]) as usize,
            (extents[2] / resolution[2]) as usize,
        ];
        let mut grid = Self {
            dims,
            resolution,
            volume,
            data: vec![Vector3::zeros(); dims[0] * dims[1] * dims[2]],
        };
        for x in 0..dims[0] {
            for y in 0..dims[1] {
                for z in 0..dims[2] {
                    let value = if grid.cell_in_bounds(x, y, z) {
                        Vector3::x()
                    } else {
                        Self::out_of_bounds_marker()
                    };
                    let i = grid.index(x, y, z);
                    grid.data[i] = value;
                }
            }
        }
        grid
    }

    /// Cell counts per axis.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Spatial resolution per axis (um).
    pub fn resolution(&self) -> [f64; 3] {
        self.resolution
    }

    /// The channel volume the grid covers.
    pub fn volume(&self) -> &ChannelVolume {
        &self.volume
    }

    /// True when every axis has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims[1] + y) * self.dims[2] + z
    }

    /// Field vector at a cell. Panics if the indices are out of range;
    /// callers clamp first (see `CarrierKinetics`).
    pub fn get(&self, x: usize, y: usize, z: usize) -> &Vector3<f64> {
        &self.data[self.index(x, y, z)]
    }

    /// The last cell of the grid, used as the fallback sample for carrier
    /// positions that fall outside the grid.
    pub fn last_cell(&self) -> &Vector3<f64> {
        &self.data[self.data.len() - 1]
    }

    fn cell_in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        let xc = self.volume.x_start + x as f64 * self.resolution[0];
        let yc = self.volume.y_start + y as f64 * self.resolution[1];
        let zc = self.volume.z_start + z as f64 * self.resolution[2];
        xc < self.volume.x_end && yc < self.volume.y_end && zc < self.volume.z_end
    }

    /// Refresh every cell for a new operating point.
    ///
    /// The pinch-off location along the channel-length axis depends on the
    /// region: in triode it sits beyond the physical channel end, pulled in
    /// toward the drain as Vds approaches Vdsat; in saturation it sits
    /// inside the channel, interpolated between 10% and 100% of the length
    /// by how far Vds is above Vdsat relative to the configured maximum.
    /// Other regions have no pinch-off to point at, so their cells take the
    /// vertical-only fallback.
    pub fn refresh(
        &mut self,
        op: &OperatingPoint,
        params: &PhysicalParameters,
        config: &SimConfig,
    ) {
        if self.is_empty() {
            return;
        }
        let [nx, ny, nz] = self.dims;
        let [rx, ry, rz] = self.resolution;

        let length_m = params.geometry.length_um / 1e6;
        let height_m = params.max_depletion_width_um / 1e6;
        let source_to_drain = op.vds / length_m.abs();
        let body_to_gate = op.vgs / height_m.abs();
        let total_field = (source_to_drain.powi(2) + body_to_gate.powi(2)).sqrt()
            / config.field_reduction_factor;

        // Pinch-off placement. The index decides which cells point at the
        // pinch-off coordinate; in triode every column does.
        let (directional, pinch_index, x_pinch) = match op.region {
            OperatingRegion::Triode => {
                // How far below saturation we are, as a fraction: pinch-off
                // sits past the channel end and moves toward the drain as
                // Vds climbs toward Vdsat.
                let vunder = (op.vdsat - op.vds) / op.vdsat;
                (true, nx, (nx as f64 * rx) * (1.0 + 2.0 * vunder))
            }
            OperatingRegion::Saturation => {
                let vover = ((config.max_vds - op.vds) / (config.max_vds - op.vdsat)).abs();
                // Rescale so pinch-off never lands at x = 0.
                let vover = (vover + 0.1) * 0.90909;
                let index = (nx as f64 * vover) as usize;
                (true, index, index as f64 * rx)
            }
            _ => (false, nx, 0.0),
        };

        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let value = if !self.cell_in_bounds(x, y, z) {
                        Self::out_of_bounds_marker()
                    } else if y == ny - 1 {
                        // Topmost layer, at the channel/oxide boundary:
                        // purely channel-length-aligned.
                        Vector3::new(total_field, 0.0, 0.0)
                    } else if directional && x <= pinch_index {
                        let pinch = Vector3::new(x_pinch, ny as f64 * ry, z as f64 * rz);
                        let cell = Vector3::new(x as f64 * rx, y as f64 * ry, z as f64 * rz);
                        field_toward(pinch, cell, total_field)
                    } else {
                        // Beyond pinch-off, or no pinch-off in this region:
                        // small vertical-only field.
                        Vector3::new(0.0, total_field, 0.0)
                    };
                    let i = self.index(x, y, z);
                    self.data[i] = value;
                }
            }
        }
    }
}

/// Field vector of the given magnitude pointing from a cell toward the
/// pinch-off coordinate. A zero-length direction (cell exactly at the
/// pinch-off coordinate) takes the vertical-only vector instead of
/// dividing by zero.
fn field_toward(pinch: Vector3<f64>, cell: Vector3<f64>, magnitude: f64) -> Vector3<f64> {
    let direction = pinch - cell;
    let norm = direction.norm();
    if norm == 0.0 {
        Vector3::new(0.0, magnitude, 0.0)
    } else {
        direction / norm * magnitude
    }
}
