//! The simulation session: one device, one bias state, one carrier
//! population.
//!
//! A session is built once from a device description and then driven by two
//! kinds of events: bias updates (`set_bias`) and timer ticks (`tick`).
//! A bias update runs one model evaluation, replaces the stored operating
//! point wholesale, and refreshes every field-grid cell, so observers never
//! see an operating point and a grid built under different bias values.

use log::info;

use mosviz_core::{DeviceDescription, OperatingPoint, PhysicalParameters, Result, SimConfig};
use mosviz_physics::{derive_parameters, evaluate};

use crate::field::FieldGrid;
use crate::kinetics::CarrierKinetics;
use crate::volume::ChannelVolume;

/// Owns the derived parameters, the field grid, and the carrier population
/// for one loaded device.
#[derive(Debug)]
pub struct Session {
    config: SimConfig,
    params: PhysicalParameters,
    volume: ChannelVolume,
    grid: FieldGrid,
    kinetics: CarrierKinetics,
}

impl Session {
    /// Build a session from a device description. Fails when the
    /// description is missing required regions or doping.
    pub fn new(desc: &DeviceDescription, config: SimConfig) -> Result<Self> {
        Self::build(desc, config, None)
    }

    /// Build with a fixed RNG seed for reproducible carrier injection.
    pub fn with_seed(desc: &DeviceDescription, config: SimConfig, seed: u64) -> Result<Self> {
        Self::build(desc, config, Some(seed))
    }

    fn build(desc: &DeviceDescription, config: SimConfig, seed: Option<u64>) -> Result<Self> {
        let params = derive_parameters(desc, &config)?;
        let volume = ChannelVolume::from_parameters(&params, &config);
        let grid = FieldGrid::allocate(volume, config.field_resolution);
        let kinetics = match seed {
            Some(seed) => CarrierKinetics::with_seed(config.max_carriers, seed),
            None => CarrierKinetics::new(config.max_carriers),
        };
        info!(
            "session ready: Vth {:.3} V, grid {:?}",
            params.threshold_voltage,
            grid.dims()
        );
        let mut session = Self {
            config,
            params,
            volume,
            grid,
            kinetics,
        };
        // Start at zero bias so the grid is never in its allocation state.
        session.set_bias(0.0, 0.0);
        Ok(session)
    }

    /// Apply a bias update. Inputs are clamped into the configured ranges;
    /// the operating point is replaced and the grid refreshed before this
    /// returns.
    pub fn set_bias(&mut self, vgs: f64, vds: f64) -> &OperatingPoint {
        let vgs = self.config.clamp_vgs(vgs);
        let vds = self.config.clamp_vds(vds);
        self.params.op = evaluate(vgs, vds, &self.params, &self.config);
        self.grid.refresh(&self.params.op, &self.params, &self.config);
        &self.params.op
    }

    /// Advance the carrier population by one tick at the present bias.
    pub fn tick(&mut self) {
        self.kinetics.advance(
            &self.grid,
            &self.volume,
            self.params.op.idrain_ua,
            &self.config,
        );
    }

    /// Evaluate the model at an arbitrary bias without touching session
    /// state. Inputs are clamped like `set_bias`.
    pub fn evaluate_at(&self, vgs: f64, vds: f64) -> OperatingPoint {
        evaluate(
            self.config.clamp_vgs(vgs),
            self.config.clamp_vds(vds),
            &self.params,
            &self.config,
        )
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    pub fn operating_point(&self) -> &OperatingPoint {
        &self.params.op
    }

    pub fn volume(&self) -> &ChannelVolume {
        &self.volume
    }

    pub fn grid(&self) -> &FieldGrid {
        &self.grid
    }

    pub fn kinetics(&self) -> &CarrierKinetics {
        &self.kinetics
    }
}
