//! Carrier kinetics: a bounded population of point carriers drifting
//! through the field grid.
//!
//! Each simulation tick advances every live carrier by the field vector
//! sampled at its cell, removes carriers that reach the drain plane, and
//! injects new carriers at the source face at a rate derived from the
//! present drain current. The population never exceeds the configured
//! ceiling; injection requests beyond it are silently dropped. That bound
//! is a memory/drawing-cost limit, not a physical constraint.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mosviz_core::SimConfig;
use mosviz_core::consts;

use crate::field::FieldGrid;
use crate::volume::ChannelVolume;

/// The live carrier population for one simulation session.
#[derive(Debug)]
pub struct CarrierKinetics {
    carriers: Vec<Vector3<f64>>,
    capacity: usize,
    rng: StdRng,
}

impl CarrierKinetics {
    /// Create an empty population with the given ceiling.
    pub fn new(capacity: usize) -> Self {
        Self {
            carriers: Vec::new(),
            capacity,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a fixed RNG seed for deterministic runs.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            carriers: Vec::new(),
            capacity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Read-only view of the live carrier positions.
    pub fn carriers(&self) -> &[Vector3<f64>] {
        &self.carriers
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Place a carrier explicitly. Returns false when the population is at
    /// its ceiling (the request is dropped, not queued).
    pub fn inject_at(&mut self, position: Vector3<f64>) -> bool {
        if self.carriers.len() >= self.capacity {
            return false;
        }
        self.carriers.push(position);
        true
    }

    /// Advance the population by one tick.
    ///
    /// `idrain_ua` is the present drain current; it is clamped into the
    /// configured display range before the injection rate is computed.
    pub fn advance(
        &mut self,
        grid: &FieldGrid,
        volume: &ChannelVolume,
        idrain_ua: f64,
        config: &SimConfig,
    ) {
        if grid.is_empty() {
            return;
        }
        let dt = config.tick_interval_s();
        let [nx, ny, nz] = grid.dims();
        let [rx, ry, rz] = grid.resolution();

        // Drift: sample the field at each carrier's cell and displace.
        // Index math saturates on extreme positions; anything outside the
        // grid samples the grid's last cell.
        for carrier in &mut self.carriers {
            let xi = ((carrier.x - volume.x_start) / rx) as isize;
            let yi = ((carrier.y - volume.y_start) / ry) as isize;
            let zi = ((carrier.z - volume.z_start) / rz) as isize;
            // The depth axis is clamped rather than rejected.
            let zi = zi.min(nz as isize - 1);

            let field = if (0..nx as isize).contains(&xi)
                && (0..ny as isize).contains(&yi)
                && (0..nz as isize).contains(&zi)
            {
                grid.get(xi as usize, yi as usize, zi as usize)
            } else {
                grid.last_cell()
            };
            *carrier += field * dt;
        }

        // Carriers that reached the drain plane are collected.
        self.carriers.retain(|c| c.x < volume.x_end);

        // Injection at the source face, rate derived from drain current.
        let clamped_ua = config.clamp_current_ua(idrain_ua);
        let rate = (clamped_ua / config.injection_reference_scale)
            * consts::CHARGES_PER_AMPERE_SECOND
            * dt
            / config.charge_scaling_factor;

        for _ in 0..rate as usize {
            self.spawn(volume);
        }
        // The fractional remainder injects one more with matching
        // probability, so low currents still trickle carriers in.
        let fractional = rate.fract();
        if self.rng.gen_range(0.0..1.0) < fractional {
            self.spawn(volume);
        }
    }

    fn spawn(&mut self, volume: &ChannelVolume) {
        if self.carriers.len() >= self.capacity {
            return;
        }
        let y = if volume.y_start < volume.y_end {
            self.rng.gen_range(volume.y_start..volume.y_end)
        } else {
            volume.y_end
        };
        let z = if volume.z_start < volume.z_end {
            self.rng.gen_range(volume.z_start..volume.z_end)
        } else {
            volume.z_end
        };
        self.carriers.push(Vector3::new(volume.x_start, y, z));
    }
}
