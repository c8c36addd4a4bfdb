//! Physical-parameter record and operating-point types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Doping polarity of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DopingType {
    /// Acceptor-doped ("p-type"). A p-type body gives an n-channel device.
    PType,
    /// Donor-doped ("n-type"). An n-type body gives a p-channel device.
    NType,
}

impl fmt::Display for DopingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DopingType::PType => write!(f, "p-type"),
            DopingType::NType => write!(f, "n-type"),
        }
    }
}

/// A validated doping specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DopingSpec {
    pub kind: DopingType,
    /// Concentration (cm^-3), always positive.
    pub concentration: f64,
}

/// Geometry extents measured from the device description (microns).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelGeometry {
    pub min_x_source: f64,
    pub max_x_source: f64,
    /// Extent of the source along x.
    pub source_width: f64,
    pub min_x_drain: f64,
    pub min_y_gate_oxide: f64,
    pub max_y_gate_oxide: f64,
    pub min_y_source_drain: f64,
    pub min_z_source: f64,
    pub max_z_source: f64,
    /// Device width W: source extent along z (um).
    pub width_um: f64,
    /// Channel length L: source-to-drain gap along x (um).
    pub length_um: f64,
}

impl ChannelGeometry {
    /// Gate-oxide thickness (um), measured along y.
    pub fn oxide_thickness_um(&self) -> f64 {
        self.max_y_gate_oxide - self.min_y_gate_oxide
    }
}

/// Operating region of the device.
///
/// Each region carries a numeric display code: 0 cut-off, 1 triode,
/// 2 saturation, 3 subthreshold, 4 breakdown, 5 unknown. Region
/// classification is an ordered first-match predicate chain; the ordering
/// is the tie-break policy at region boundaries, discontinuities included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperatingRegion {
    #[default]
    CutOff,
    Triode,
    Saturation,
    Subthreshold,
    Breakdown,
    Unknown,
}

impl OperatingRegion {
    /// Numeric region code.
    pub fn code(self) -> u8 {
        match self {
            OperatingRegion::CutOff => 0,
            OperatingRegion::Triode => 1,
            OperatingRegion::Saturation => 2,
            OperatingRegion::Subthreshold => 3,
            OperatingRegion::Breakdown => 4,
            OperatingRegion::Unknown => 5,
        }
    }

    /// Human-readable region name.
    pub fn name(self) -> &'static str {
        match self {
            OperatingRegion::CutOff => "Cut-off",
            OperatingRegion::Triode => "Triode",
            OperatingRegion::Saturation => "Saturation",
            OperatingRegion::Subthreshold => "Subthreshold",
            OperatingRegion::Breakdown => "Breakdown",
            OperatingRegion::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OperatingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One DC operating point: bias inputs plus every quantity the model
/// produces for them.
///
/// This group is only ever written as a whole, produced by a single model
/// evaluation; it is never updated field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Gate-source bias (V).
    pub vgs: f64,
    /// Drain-source bias (V).
    pub vds: f64,
    /// Triode/saturation switchover voltage (V).
    pub vdsat: f64,
    /// Drain current (uA), clamped into the configured display range.
    pub idrain_ua: f64,
    /// Transconductance dId/dVgs (uS).
    pub gm_us: f64,
    /// Output conductance dId/dVds (uS).
    pub gds_us: f64,
    /// Output-impedance constant lambda (1/V).
    pub lambda: f64,
    /// Operating region classification.
    pub region: OperatingRegion,
}

impl OperatingPoint {
    /// gm/Id ratio (1/V), or `None` when the current is zero.
    pub fn gm_over_id(&self) -> Option<f64> {
        if self.idrain_ua != 0.0 {
            Some(self.gm_us / self.idrain_ua)
        } else {
            None
        }
    }
}

/// The full physical-parameter record for one device.
///
/// Geometry, doping, and the derived physics constants are produced
/// atomically by parameter derivation at load time and are never partially
/// stale. The operating point is replaced wholesale on every bias update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalParameters {
    pub geometry: ChannelGeometry,
    /// Body doping, the one specification the physics formulas consume.
    pub body_doping: DopingSpec,
    /// Source doping, carried for display only.
    pub source_doping: Option<DopingSpec>,
    /// Drain doping, carried for display only.
    pub drain_doping: Option<DopingSpec>,
    /// Fermi potential of the body (V).
    pub fermi_potential: f64,
    /// Maximum depletion-region width under the gate (um).
    pub max_depletion_width_um: f64,
    /// Oxide capacitance per unit area (nF/cm^2).
    pub cox_nf_per_cm2: f64,
    /// Threshold voltage (V); positive for a p-type body, negative for n-type.
    pub threshold_voltage: f64,
    /// Body-effect coefficient gamma (sqrt(V)).
    pub gamma: f64,
    /// Channel carrier mobility (cm^2/V.s); fixed lookup by body doping type.
    pub mobility_cm2_per_vs: f64,
    /// Present DC operating point.
    pub op: OperatingPoint,
}

impl PhysicalParameters {
    /// Formatted multi-line parameter summary for display.
    pub fn report(&self) -> String {
        let mut text = String::from("Device Parameters:\n");
        match &self.source_doping {
            Some(d) => {
                text += &format!("Source Doping: {} {:.3e} cm^-3\n", d.kind, d.concentration)
            }
            None => text += "Source Doping: (none)\n",
        }
        match &self.drain_doping {
            Some(d) => text += &format!("Drain Doping: {} {:.3e} cm^-3\n", d.kind, d.concentration),
            None => text += "Drain Doping: (none)\n",
        }
        text += &format!(
            "Body Doping: {} {:.3e} cm^-3\n",
            self.body_doping.kind, self.body_doping.concentration
        );
        text += &format!("Width W: {:.3} um\n", self.geometry.width_um);
        text += &format!("Length L: {:.3} um\n", self.geometry.length_um);
        text += &format!("Fermi Level: {:.3} V\n", self.fermi_potential);
        text += &format!("Depletion Region W: {:.3} um\n", self.max_depletion_width_um);
        text += &format!("Gate Capacitance C0: {:.3e} nF/cm^2\n", self.cox_nf_per_cm2);
        text += &format!("Threshold Voltage: {:.3} V\n", self.threshold_voltage);
        text += &format!("Channel Mobility: {:.1} cm^2/V.s\n", self.mobility_cm2_per_vs);
        text += "\nDC Operating Point:\n";
        text += &format!("Vgs: {:.3} V\n", self.op.vgs);
        text += &format!("Vds: {:.3} V\n", self.op.vds);
        text += &format!("Drain Current: {:.3} uA\n", self.op.idrain_ua);
        text += &format!(
            "Device Region: {} - {}\n",
            self.op.region.code(),
            self.op.region
        );
        text += &format!("Impedance Constant (lambda): {:.3} /V\n", self.op.lambda);
        text += &format!("Transconductance (gm): {:.3} uS\n", self.op.gm_us);
        text += &format!("DS Transconductance (gds): {:.3} uS\n", self.op.gds_us);
        text
    }
}
