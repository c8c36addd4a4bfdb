//! Device-physics engine for Mosviz.
//!
//! Two pieces:
//! - [`derive_parameters`]: geometry + doping -> [`PhysicalParameters`],
//!   run once at load time
//! - [`evaluate`]: (Vgs, Vds, parameters) -> [`OperatingPoint`], a pure
//!   function invoked on every bias change and for whole I-V surfaces
//!
//! The model is a didactic second-order one (Sze-style square law), tuned
//! for qualitative, visually plausible behavior rather than SPICE-grade
//! accuracy.

pub mod derive;
pub mod model;

pub use derive::derive_parameters;
pub use model::{evaluate, sweep_surface};

#[doc(inline)]
pub use mosviz_core::{OperatingPoint, OperatingRegion, PhysicalParameters};
