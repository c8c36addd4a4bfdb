//! Derivation of physical parameters from geometry and doping.
//!
//! Runs once at device load. All derived quantities are produced as one
//! atomic record; on error the partial derivation is discarded.

use log::debug;
use mosviz_core::consts;
use mosviz_core::device::{self, DeviceDescription, DevicePart, DopingRecord};
use mosviz_core::error::{DopingError, GeometryError, Result};
use mosviz_core::{ChannelGeometry, DopingSpec, DopingType, OperatingPoint, PhysicalParameters, SimConfig};

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

fn required_part<'a>(
    desc: &'a DeviceDescription,
    name: &'static str,
) -> std::result::Result<&'a DevicePart, GeometryError> {
    let part = desc
        .part(name)
        .ok_or(GeometryError::MissingRegion(name))?;
    if part.vertices.is_empty() {
        return Err(GeometryError::EmptyRegion(name));
    }
    Ok(part)
}

fn required_extent(
    part: &DevicePart,
    name: &'static str,
    axis: usize,
) -> std::result::Result<f64, GeometryError> {
    let extent = part.max_along(axis) - part.min_along(axis);
    if extent <= 0.0 {
        return Err(GeometryError::DegenerateExtent {
            region: name,
            axis: AXIS_NAMES[axis],
        });
    }
    Ok(extent)
}

fn parse_doping(
    region: &'static str,
    record: Option<&DopingRecord>,
) -> std::result::Result<DopingSpec, DopingError> {
    let record = record.ok_or(DopingError::Missing(region))?;
    let kind = match record.kind.as_str() {
        "p-type" => DopingType::PType,
        "n-type" => DopingType::NType,
        other => {
            return Err(DopingError::UnknownType {
                region,
                kind: other.to_string(),
            });
        }
    };
    if record.concentration <= 0.0 {
        return Err(DopingError::NonPositiveConcentration {
            region,
            value: record.concentration,
        });
    }
    Ok(DopingSpec {
        kind,
        concentration: record.concentration,
    })
}

/// Derive the full physical-parameter record from a device description.
///
/// Width and length come from the region extents:
/// `W = max_z(Source) - min_z(Source)`, `L = min_x(Drain) - max_x(Source)`.
/// The body doping drives the Fermi potential, maximum depletion width,
/// body-effect coefficient, and threshold voltage; the gate-oxide y extent
/// gives the oxide capacitance.
pub fn derive_parameters(
    desc: &DeviceDescription,
    config: &SimConfig,
) -> Result<PhysicalParameters> {
    let source = required_part(desc, device::SOURCE)?;
    let drain = required_part(desc, device::DRAIN)?;
    let gate_oxide = required_part(desc, device::GATE_OXIDE)?;
    let body = required_part(desc, device::BODY)?;

    required_extent(source, device::SOURCE, 0)?;
    required_extent(source, device::SOURCE, 2)?;
    required_extent(gate_oxide, device::GATE_OXIDE, 1)?;

    let geometry = ChannelGeometry {
        min_x_source: source.min_along(0),
        max_x_source: source.max_along(0),
        source_width: source.max_along(0) - source.min_along(0),
        min_x_drain: drain.min_along(0),
        min_y_gate_oxide: gate_oxide.min_along(1),
        max_y_gate_oxide: gate_oxide.max_along(1),
        min_y_source_drain: source.min_along(1),
        min_z_source: source.min_along(2),
        max_z_source: source.max_along(2),
        width_um: source.max_along(2) - source.min_along(2),
        length_um: drain.min_along(0) - source.max_along(0),
    };
    if geometry.length_um <= 0.0 {
        return Err(GeometryError::NonPositiveChannelLength {
            length: geometry.length_um,
        }
        .into());
    }

    let body_doping = parse_doping(device::BODY, body.doping.as_ref())?;
    // Source/drain doping is display-only; validate it when present so a bad
    // record is reported, but tolerate its absence.
    let source_doping = source
        .doping
        .as_ref()
        .map(|d| parse_doping(device::SOURCE, Some(d)))
        .transpose()?;
    let drain_doping = drain
        .doping
        .as_ref()
        .map(|d| parse_doping(device::DRAIN, Some(d)))
        .transpose()?;

    // Fermi potential. Uses log10, not ln; the rest of the fit is
    // calibrated to it.
    let n_body_si = body_doping.concentration * 1e6;
    let ni_si = consts::SILICON_NI_CM3 * 1e6;
    let kt_over_q = consts::BOLTZMANN * config.temperature / consts::ELEMENTARY_CHARGE;
    let fermi_potential = match body_doping.kind {
        DopingType::PType => kt_over_q * (n_body_si / ni_si).log10(),
        DopingType::NType => kt_over_q * (ni_si / n_body_si).log10(),
    };

    // Maximum depletion-region width, converted to microns.
    let w_max_m = (4.0 * consts::EPS_SI * fermi_potential.abs()
        / (consts::ELEMENTARY_CHARGE * n_body_si))
        .sqrt();
    let max_depletion_width_um = w_max_m * 1e6;

    // Oxide capacitance per unit area (often called C0: fixed, ignoring
    // inversion), from the measured dielectric thickness.
    let oxide_thickness_m = geometry.oxide_thickness_um() / 1e6;
    let cox_si = consts::EPS_OX / oxide_thickness_m;
    let cox_nf_per_cm2 = cox_si * 1e5;

    // Body effect and threshold voltage. A p-type body gives an n-channel
    // device with positive Vth; an n-type body flips the sign.
    let gamma = (2.0 * consts::EPS_SI * consts::ELEMENTARY_CHARGE * n_body_si).sqrt() / cox_si;
    let vth_magnitude = gamma * (2.0 * fermi_potential).abs().sqrt() + (2.0 * fermi_potential).abs();
    let threshold_voltage = match body_doping.kind {
        DopingType::PType => vth_magnitude,
        DopingType::NType => -vth_magnitude,
    };

    // Placeholder mobility model: a fixed lookup by body doping type, with
    // no temperature or field dependence.
    let mobility_cm2_per_vs = match body_doping.kind {
        DopingType::PType => 400.0,
        DopingType::NType => 1200.0,
    };

    debug!(
        "derived parameters: W={:.3}um L={:.3}um phi_F={:.4}V Vth={:.4}V gamma={:.4}",
        geometry.width_um, geometry.length_um, fermi_potential, threshold_voltage, gamma
    );

    Ok(PhysicalParameters {
        geometry,
        body_doping,
        source_doping,
        drain_doping,
        fermi_potential,
        max_depletion_width_um,
        cox_nf_per_cm2,
        threshold_voltage,
        gamma,
        mobility_cm2_per_vs,
        op: OperatingPoint::default(),
    })
}
