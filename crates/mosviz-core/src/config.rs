//! Simulation configuration constants.

use serde::{Deserialize, Serialize};

/// Tunable constants for the device model, field grid, and carrier kinetics.
///
/// Defaults: bias ranges of 0-4 V (Vds) and
/// 0-6 V (Vgs), a displayable current window of 0-125 uA, and grid/kinetics
/// factors chosen for visually tractable carrier motion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Minimum drain-source bias (V).
    pub min_vds: f64,
    /// Maximum drain-source bias (V).
    pub max_vds: f64,
    /// Minimum gate-source bias (V).
    pub min_vgs: f64,
    /// Maximum gate-source bias (V).
    pub max_vgs: f64,
    /// Lower clamp of the reported drain current (uA).
    pub min_current_ua: f64,
    /// Upper clamp of the reported drain current (uA).
    pub max_current_ua: f64,
    /// Number of pieces the bias ranges are divided into for numerical
    /// differentiation: the perturbation step is V / resolution.
    pub diff_resolution: u32,
    /// Number of Vds samples in the saturation-region current sweep.
    pub saturation_sweep_points: usize,
    /// One rendered carrier stands in for this many elementary charges.
    pub charge_scaling_factor: f64,
    /// Divisor applied to the clamped drain current when computing the
    /// carrier injection rate.
    pub injection_reference_scale: f64,
    /// Fixed simulation tick interval (ms). 42 ms is roughly 24 fps.
    pub tick_interval_ms: f64,
    /// Spatial resolution of the field grid per axis (um).
    pub field_resolution: [f64; 3],
    /// Divisor applied to the electric field so carrier drift stays slow
    /// enough to follow visually.
    pub field_reduction_factor: f64,
    /// Visual exaggeration factor for the channel thickness.
    pub channel_exaggeration: f64,
    /// Hard ceiling on the live carrier population.
    pub max_carriers: usize,
    /// Device temperature (K).
    pub temperature: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        let max_current_ua = 125.0;
        Self {
            min_vds: 0.0,
            max_vds: 4.0,
            min_vgs: 0.0,
            max_vgs: 6.0,
            min_current_ua: 0.0,
            max_current_ua,
            diff_resolution: 1000,
            saturation_sweep_points: 100,
            charge_scaling_factor: 1e6 * max_current_ua / 40.0,
            injection_reference_scale: 3e12,
            tick_interval_ms: 42.0,
            field_resolution: [0.06, 0.03, 0.4],
            field_reduction_factor: 1.5e7,
            channel_exaggeration: 1.6,
            max_carriers: 250,
            temperature: 300.0,
        }
    }
}

impl SimConfig {
    /// Clamp a gate-source bias into the configured range.
    pub fn clamp_vgs(&self, vgs: f64) -> f64 {
        vgs.clamp(self.min_vgs, self.max_vgs)
    }

    /// Clamp a drain-source bias into the configured range.
    pub fn clamp_vds(&self, vds: f64) -> f64 {
        vds.clamp(self.min_vds, self.max_vds)
    }

    /// Clamp a drain current into the displayable range (uA).
    pub fn clamp_current_ua(&self, idrain_ua: f64) -> f64 {
        idrain_ua.clamp(self.min_current_ua, self.max_current_ua)
    }

    /// Tick interval in seconds.
    pub fn tick_interval_s(&self) -> f64 {
        self.tick_interval_ms / 1000.0
    }
}
