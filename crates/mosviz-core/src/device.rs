//! Device-description record.
//!
//! A device is a named list of regions, each an axis-aligned block given as a
//! vertex list in device length units (microns), with optional doping. The
//! JSON encoding allows full-line `#` comments; unknown fields (renderer
//! colors and the like) are tolerated and ignored.

use serde::{Deserialize, Serialize};

/// Region name carrying the source diffusion.
pub const SOURCE: &str = "Source";
/// Region name carrying the drain diffusion.
pub const DRAIN: &str = "Drain";
/// Region name carrying the gate dielectric.
pub const GATE_OXIDE: &str = "GateOxide";
/// Region name carrying the body/substrate.
pub const BODY: &str = "Body";
/// Region name carrying the gate electrode (optional).
pub const GATE: &str = "Gate";

/// Raw doping record as it appears in a device file.
///
/// The type string is validated during parameter derivation, not at load
/// time, so a bad device file reports a `DopingError` naming the region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DopingRecord {
    /// Doping type, "p-type" or "n-type".
    #[serde(rename = "type")]
    pub kind: String,
    /// Doping concentration (cm^-3).
    pub concentration: f64,
}

/// One named region of the device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicePart {
    /// Region name (see the `SOURCE`/`DRAIN`/... constants).
    pub name: String,
    /// Corner positions in microns.
    pub vertices: Vec<[f64; 3]>,
    /// Doping specification, if the region is doped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doping: Option<DopingRecord>,
}

impl DevicePart {
    /// Build an axis-aligned block region from per-axis extents.
    pub fn cuboid(name: impl Into<String>, x: [f64; 2], y: [f64; 2], z: [f64; 2]) -> Self {
        let mut vertices = Vec::with_capacity(8);
        for &zc in &z {
            for &yc in &y {
                for &xc in &x {
                    vertices.push([xc, yc, zc]);
                }
            }
        }
        Self {
            name: name.into(),
            vertices,
            doping: None,
        }
    }

    /// Attach a doping specification.
    pub fn with_doping(mut self, kind: impl Into<String>, concentration: f64) -> Self {
        self.doping = Some(DopingRecord {
            kind: kind.into(),
            concentration,
        });
        self
    }

    /// Minimum coordinate along an axis (0 = x, 1 = y, 2 = z).
    pub fn min_along(&self, axis: usize) -> f64 {
        self.vertices
            .iter()
            .map(|v| v[axis])
            .fold(f64::INFINITY, f64::min)
    }

    /// Maximum coordinate along an axis (0 = x, 1 = y, 2 = z).
    pub fn max_along(&self, axis: usize) -> f64 {
        self.vertices
            .iter()
            .map(|v| v[axis])
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A complete device description: the named list of regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescription {
    pub device_parts: Vec<DevicePart>,
}

impl DeviceDescription {
    /// Parse a device description from JSON, stripping full-line `#`
    /// comments first.
    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        let stripped: String = content
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&stripped)
    }

    /// Look up a region by name.
    pub fn part(&self, name: &str) -> Option<&DevicePart> {
        self.device_parts.iter().find(|p| p.name == name)
    }
}
