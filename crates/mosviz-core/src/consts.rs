//! Physical constants used throughout the device model.
//!
//! Doping concentrations are specified in cm^-3 in device files; formulas
//! convert to SI (m^-3) at the point of use.

/// Boltzmann constant (J/K).
pub const BOLTZMANN: f64 = 1.380649e-23;

/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;

/// Vacuum permittivity (F/m).
pub const EPS_0: f64 = 8.854e-12;

/// Relative permittivity of silicon.
pub const EPS_SI_REL: f64 = 11.68;

/// Relative permittivity of silicon dioxide.
pub const EPS_OX_REL: f64 = 3.9;

/// Permittivity of silicon (F/m).
pub const EPS_SI: f64 = EPS_SI_REL * EPS_0;

/// Permittivity of silicon dioxide (F/m).
pub const EPS_OX: f64 = EPS_OX_REL * EPS_0;

/// Intrinsic carrier concentration of silicon at 300 K (cm^-3).
pub const SILICON_NI_CM3: f64 = 1.5e10;

/// Number of elementary charges carried by one ampere-second.
pub const CHARGES_PER_AMPERE_SECOND: f64 = 6.241509074e18;
