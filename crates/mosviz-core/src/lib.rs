//! Core types for the Mosviz device-physics engine.
//!
//! This crate provides:
//! - The device-description record (named regions with vertex lists and
//!   optional doping), loadable from commented JSON
//! - The `PhysicalParameters` record derived from geometry and doping
//! - Operating-point types and the five-region classification codes
//! - Physical constants and the simulation configuration record
//! - The geometry/doping error taxonomy

pub mod config;
pub mod consts;
pub mod device;
pub mod error;
pub mod params;

pub use config::SimConfig;
pub use device::{DeviceDescription, DevicePart, DopingRecord};
pub use error::{DeriveError, DopingError, GeometryError, Result};
pub use params::{
    ChannelGeometry, DopingSpec, DopingType, OperatingPoint, OperatingRegion, PhysicalParameters,
};
