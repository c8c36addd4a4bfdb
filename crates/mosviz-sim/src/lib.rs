//! Simulation layer for Mosviz: the discretized field grid, the carrier
//! population, and the session that owns both.
//!
//! Single-threaded, tick-driven cooperative model: bias updates drive one
//! model evaluation followed by one full grid refresh; a fixed-interval
//! timer drives carrier advancement. Every operation is a synchronous pure
//! computation or an in-place mutation of state the session owns, bounded
//! by configuration constants (grid resolution, carrier ceiling).

pub mod field;
pub mod kinetics;
pub mod session;
pub mod volume;

pub use field::FieldGrid;
pub use kinetics::CarrierKinetics;
pub use session::Session;
pub use volume::ChannelVolume;
