//! Error types for parameter derivation.

use thiserror::Error;

/// A required named region is missing or has degenerate extents.
///
/// Fatal to parameter derivation: no physics can proceed without the
/// geometry, so these surface to the caller with the region name attached.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("required device region '{0}' is missing from the device description")]
    MissingRegion(&'static str),

    #[error("device region '{0}' has an empty vertex list")]
    EmptyRegion(&'static str),

    #[error("device region '{region}' has zero extent along the {axis} axis")]
    DegenerateExtent { region: &'static str, axis: char },

    #[error("drain does not lie beyond the source along x (channel length {length} um)")]
    NonPositiveChannelLength { length: f64 },
}

/// A doping specification is missing, unrecognized, or non-physical.
#[derive(Debug, Error)]
pub enum DopingError {
    #[error("device region '{0}' has no doping specification")]
    Missing(&'static str),

    #[error("device region '{region}': unrecognized doping type '{kind}' (expected 'p-type' or 'n-type')")]
    UnknownType { region: &'static str, kind: String },

    #[error("device region '{region}': doping concentration must be positive, got {value:e} cm^-3")]
    NonPositiveConcentration { region: &'static str, value: f64 },
}

/// Errors produced while deriving physical parameters from a device
/// description. Partial derivations are discarded, never merged into a
/// previously valid parameter record.
#[derive(Debug, Error)]
pub enum DeriveError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Doping(#[from] DopingError),
}

/// Result type for parameter derivation.
pub type Result<T> = std::result::Result<T, DeriveError>;
