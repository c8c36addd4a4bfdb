//! DC operating-point model.
//!
//! A pure function of (Vgs, Vds, parameters): no side effects, safe to call
//! off the interactive path for whole I-V surfaces as well as single points.
//!
//! Region classification is an ordered first-match predicate chain
//! (cut-off, triode, saturation, subthreshold, breakdown fallback). The
//! ordering is part of the model contract; boundaries between regions are
//! allowed to be discontinuous.

use log::{debug, warn};
use mosviz_core::consts;
use mosviz_core::{OperatingPoint, OperatingRegion, PhysicalParameters, SimConfig};

/// Tuned output-impedance constant used in saturation.
///
/// The Johns & Martin channel-length-modulation formula is evaluated for
/// reference but this override is what the model reports; the formula value
/// does not yet match the rest of the fit.
const SATURATION_LAMBDA: f64 = 0.08;

/// Triode-region drain current, Sze eq. (86) p. 205 (SI units).
fn triode_current(beta: f64, fermi: f64, gamma: f64, vgs: f64, vds: f64) -> f64 {
    beta * ((vgs - 2.0 * fermi - vds / 2.0) * vds
        - (2.0 / 3.0) * gamma * ((vds + 2.0 * fermi).powf(1.5) - (2.0 * fermi).powf(1.5)))
}

/// Saturation-region drain current: the maximum of the triode expression
/// over a dense Vds sweep of the configured bias range, scaled by the
/// channel-length-modulation factor. A deliberate simplification of how
/// saturation works.
fn saturation_current(
    beta: f64,
    fermi: f64,
    gamma: f64,
    vgs: f64,
    vds: f64,
    vdsat: f64,
    lambda: f64,
    config: &SimConfig,
) -> f64 {
    let n = config.saturation_sweep_points;
    let step = (config.max_vds - config.min_vds) / (n - 1) as f64;
    (0..n)
        .map(|i| {
            let vds_sweep = config.min_vds + i as f64 * step;
            triode_current(beta, fermi, gamma, vgs, vds_sweep) * (1.0 + lambda * (vds - vdsat))
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Evaluate the DC operating point at (Vgs, Vds).
///
/// Small-signal quantities come from one-sided finite differences with a
/// perturbation step of `V / diff_resolution` on each axis. Outputs are
/// converted to display units at this boundary (uA, uS); internal math is
/// SI. Non-finite results are contained here: they degrade to a zeroed
/// record labeled [`OperatingRegion::Unknown`], never to a panic.
pub fn evaluate(
    vgs: f64,
    vds: f64,
    params: &PhysicalParameters,
    config: &SimConfig,
) -> OperatingPoint {
    let w = params.geometry.width_um / 1e6;
    let l = params.geometry.length_um / 1e6;
    let mu = params.mobility_cm2_per_vs / 1e4;
    let cox = params.cox_nf_per_cm2 * 1e-5;
    let fermi = params.fermi_potential;
    let gamma = params.gamma;
    let vth = params.threshold_voltage;
    let beta = (w / l) * mu * cox;

    // Empirical visual-fit constant for the triode/saturation switchover,
    // not a physical derivation.
    let vdsat = (vgs - vth).abs() / 1.85;

    let delta_vgs = vgs / config.diff_resolution as f64;
    let delta_vds = vds / config.diff_resolution as f64;

    let mut lambda = 0.0;
    let mut gds = 0.0;
    let idrain;
    let gm;
    let mut region;

    if vgs < vth || vgs == 0.0 || vds == 0.0 {
        region = OperatingRegion::CutOff;
        idrain = 0.0;
        gm = 0.0;
    } else if vgs >= vth && 0.0 < vds && vds < vdsat {
        region = OperatingRegion::Triode;
        let id = triode_current(beta, fermi, gamma, vgs, vds);
        let id_dvgs = triode_current(beta, fermi, gamma, vgs + delta_vgs, vds);
        let id_dvds = triode_current(beta, fermi, gamma, vgs, vds + delta_vds);
        idrain = id;
        gm = (id_dvgs - id) / delta_vgs;
        gds = (id_dvds - id) / delta_vds;
    } else if vgs >= vth && vds > vdsat {
        region = OperatingRegion::Saturation;
        // Channel-length modulation (Johns & Martin p. 27), computed for
        // reference and overridden with the tuned constant.
        let n_body_si = params.body_doping.concentration * 1e6;
        let kds = (2.0 * consts::EPS_SI / (consts::ELEMENTARY_CHARGE * n_body_si))
            .abs()
            .sqrt();
        let lambda_formula = kds / (2.0 * l * (vds - vgs + vth + fermi).abs().sqrt());
        debug!(
            "lambda formula gives {:.4}/V, overriding with {}",
            lambda_formula, SATURATION_LAMBDA
        );
        lambda = SATURATION_LAMBDA;
        gds = lambda * (beta / 2.0) * (vgs - vth).powi(2);
        idrain = saturation_current(beta, fermi, gamma, vgs, vds, vdsat, lambda, config);
        let id_dvgs =
            saturation_current(beta, fermi, gamma, vgs + delta_vgs, vds, vdsat, lambda, config);
        gm = (id_dvgs - idrain) / delta_vgs;
    } else if 0.0 < vgs && vgs < vth && vds < vdsat {
        // Deliberately reuses the triode expression; real subthreshold
        // conduction is exponential. Known approximation.
        region = OperatingRegion::Subthreshold;
        let id = triode_current(beta, fermi, gamma, vgs, vds);
        let id_dvgs = triode_current(beta, fermi, gamma, vgs + delta_vgs, vds);
        idrain = id;
        gm = (id_dvgs - id) / delta_vgs;
    } else {
        region = OperatingRegion::Breakdown;
        idrain = config.max_current_ua / 1e6;
        gm = 0.0;
    }

    // Numeric-anomaly containment: a domain error anywhere above (negative
    // sqrt/pow arguments) surfaces as a non-finite value here. Substitute
    // zeros and label the point unknown rather than propagating.
    let (mut idrain, mut gm) = (idrain, gm);
    if !idrain.is_finite() || !gm.is_finite() || !gds.is_finite() {
        warn!(
            "non-finite model output at Vgs={vgs} Vds={vds} (region {region}); zeroing"
        );
        region = OperatingRegion::Unknown;
        idrain = 0.0;
        gm = 0.0;
        gds = 0.0;
        lambda = 0.0;
    }

    OperatingPoint {
        vgs,
        vds,
        vdsat,
        idrain_ua: config.clamp_current_ua(idrain * 1e6),
        gm_us: gm * 1e6,
        gds_us: gds * 1e6,
        lambda,
        region,
    }
}

/// Evaluate the steady-state surface over a `steps` x `steps` mesh of the
/// configured bias ranges. Row-major: Vgs varies slowest.
pub fn sweep_surface(
    params: &PhysicalParameters,
    config: &SimConfig,
    steps: usize,
) -> Vec<OperatingPoint> {
    let vgs_step = (config.max_vgs - config.min_vgs) / (steps - 1) as f64;
    let vds_step = (config.max_vds - config.min_vds) / (steps - 1) as f64;
    let mut points = Vec::with_capacity(steps * steps);
    for i in 0..steps {
        let vgs = config.min_vgs + i as f64 * vgs_step;
        for j in 0..steps {
            let vds = config.min_vds + j as f64 * vds_step;
            points.push(evaluate(vgs, vds, params, config));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_parameters;
    use mosviz_core::device::{self, DeviceDescription, DevicePart};

    fn nmos_params() -> (PhysicalParameters, SimConfig) {
        let desc = DeviceDescription {
            device_parts: vec![
                DevicePart::cuboid(device::SOURCE, [0.0, 1.0], [-1.0, 0.0], [0.0, 2.0])
                    .with_doping("n-type", 1e19),
                DevicePart::cuboid(device::DRAIN, [2.0, 3.0], [-1.0, 0.0], [0.0, 2.0])
                    .with_doping("n-type", 1e19),
                DevicePart::cuboid(device::GATE_OXIDE, [1.0, 2.0], [0.0, 0.011], [0.0, 2.0]),
                DevicePart::cuboid(device::BODY, [0.0, 3.0], [-2.0, 0.0], [0.0, 2.0])
                    .with_doping("p-type", 1e17),
            ],
        };
        let config = SimConfig::default();
        let params = derive_parameters(&desc, &config).unwrap();
        (params, config)
    }

    fn pmos_params() -> (PhysicalParameters, SimConfig) {
        let desc = DeviceDescription {
            device_parts: vec![
                DevicePart::cuboid(device::SOURCE, [0.0, 1.0], [-1.0, 0.0], [0.0, 2.0])
                    .with_doping("p-type", 1e19),
                DevicePart::cuboid(device::DRAIN, [2.0, 3.0], [-1.0, 0.0], [0.0, 2.0])
                    .with_doping("p-type", 1e19),
                DevicePart::cuboid(device::GATE_OXIDE, [1.0, 2.0], [0.0, 0.011], [0.0, 2.0]),
                DevicePart::cuboid(device::BODY, [0.0, 3.0], [-2.0, 0.0], [0.0, 2.0])
                    .with_doping("n-type", 1e17),
            ],
        };
        let config = SimConfig::default();
        let params = derive_parameters(&desc, &config).unwrap();
        (params, config)
    }

    /// Effective beta in SI units, mirroring the unit conversions in
    /// `evaluate`.
    fn beta_of(params: &PhysicalParameters) -> f64 {
        let w = params.geometry.width_um / 1e6;
        let l = params.geometry.length_um / 1e6;
        let mu = params.mobility_cm2_per_vs / 1e4;
        let cox = params.cox_nf_per_cm2 * 1e-5;
        (w / l) * mu * cox
    }

    #[test]
    fn zero_bias_is_cutoff() {
        let (params, config) = nmos_params();
        for &(vgs, vds) in &[(0.0, 0.0), (0.0, 2.5), (3.0, 0.0)] {
            let op = evaluate(vgs, vds, &params, &config);
            assert_eq!(op.region, OperatingRegion::CutOff, "at ({vgs}, {vds})");
            assert_eq!(op.idrain_ua, 0.0);
            assert_eq!(op.gm_us, 0.0);
            assert_eq!(op.gds_us, 0.0);
            assert_eq!(op.lambda, 0.0);
        }
    }

    #[test]
    fn below_threshold_is_cutoff_first() {
        // 0 < Vgs < Vth also satisfies the subthreshold predicate, but the
        // cut-off predicate is evaluated first and wins.
        let (params, config) = nmos_params();
        let op = evaluate(0.5, 0.05, &params, &config);
        assert_eq!(op.region, OperatingRegion::CutOff);
        assert_eq!(op.idrain_ua, 0.0);
    }

    #[test]
    fn example_triode_point() {
        let (params, config) = nmos_params();
        // Vth ~ 0.7, Vdsat = (3 - 0.7)/1.85 ~ 1.24 > 0.5
        let op = evaluate(3.0, 0.5, &params, &config);
        assert_eq!(op.region, OperatingRegion::Triode);
        assert!(op.idrain_ua > 0.0);
        assert!((op.vdsat - (3.0 - params.threshold_voltage).abs() / 1.85).abs() < 1e-12);
    }

    #[test]
    fn example_saturation_point() {
        let (params, config) = nmos_params();
        let op = evaluate(3.0, 3.9, &params, &config);
        assert_eq!(op.region, OperatingRegion::Saturation);
        assert_eq!(op.lambda, SATURATION_LAMBDA);
        assert!(op.idrain_ua > 0.0);
        // gds = lambda * beta/2 * (Vgs - Vth)^2, in uS
        let beta = beta_of(&params);
        let vov = 3.0 - params.threshold_voltage;
        let expected_gds_us = SATURATION_LAMBDA * (beta / 2.0) * vov * vov * 1e6;
        assert!(
            (op.gds_us - expected_gds_us).abs() < 1e-6 * expected_gds_us.abs(),
            "gds = {} expected {}",
            op.gds_us,
            expected_gds_us
        );
    }

    #[test]
    fn vds_exactly_at_vdsat_falls_through_to_breakdown() {
        // Triode requires Vds < Vdsat and saturation Vds > Vdsat; the exact
        // boundary matches neither and lands in the fallback arm.
        let (params, config) = nmos_params();
        let vdsat = (3.0 - params.threshold_voltage).abs() / 1.85;
        let op = evaluate(3.0, vdsat, &params, &config);
        assert_eq!(op.region, OperatingRegion::Breakdown);
        assert_eq!(op.idrain_ua, config.max_current_ua);
        assert_eq!(op.gm_us, 0.0);
    }

    #[test]
    fn triode_gm_matches_analytic_derivative() {
        // The triode expression is linear in Vgs, so the one-sided finite
        // difference recovers dId/dVgs = beta * Vds exactly.
        let (params, config) = nmos_params();
        let op = evaluate(2.0, 0.3, &params, &config);
        assert_eq!(op.region, OperatingRegion::Triode);
        let expected_gm_us = beta_of(&params) * 0.3 * 1e6;
        assert!(
            (op.gm_us - expected_gm_us).abs() < 1e-6 * expected_gm_us,
            "gm = {} expected {}",
            op.gm_us,
            expected_gm_us
        );
    }

    #[test]
    fn triode_gds_converges_to_analytic_derivative() {
        // dId/dVds = beta * (Vgs - 2 phi_F - Vds - gamma sqrt(Vds + 2 phi_F));
        // the one-sided difference error shrinks linearly with the step.
        let (params, mut config) = nmos_params();
        let (vgs, vds) = (3.0, 0.5);
        let beta = beta_of(&params);
        let analytic_us = beta
            * (vgs
                - 2.0 * params.fermi_potential
                - vds
                - params.gamma * (vds + 2.0 * params.fermi_potential).sqrt())
            * 1e6;

        config.diff_resolution = 1000;
        let coarse = (evaluate(vgs, vds, &params, &config).gds_us - analytic_us).abs();
        config.diff_resolution = 100_000;
        let fine = (evaluate(vgs, vds, &params, &config).gds_us - analytic_us).abs();

        assert!(coarse < 1.0, "coarse error {coarse} uS");
        assert!(fine < coarse / 10.0, "fine {fine} vs coarse {coarse}");
    }

    #[test]
    fn current_is_always_finite_and_clamped() {
        let (params, config) = nmos_params();
        for point in sweep_surface(&params, &config, 25) {
            assert!(point.idrain_ua.is_finite());
            assert!(
                point.idrain_ua >= config.min_current_ua
                    && point.idrain_ua <= config.max_current_ua,
                "Idrain {} out of range at ({}, {})",
                point.idrain_ua,
                point.vgs,
                point.vds
            );
            assert!(point.gm_us.is_finite());
            assert!(point.gds_us.is_finite());
        }
    }

    #[test]
    fn negative_fermi_potential_degrades_to_unknown() {
        // An n-type body makes 2 phi_F negative, so the triode power term
        // has a negative base and goes NaN; the anomaly is contained and
        // labeled unknown with zeroed outputs.
        let (params, config) = pmos_params();
        assert!(params.threshold_voltage < 0.0);
        let op = evaluate(1.0, 0.2, &params, &config);
        assert_eq!(op.region, OperatingRegion::Unknown);
        assert_eq!(op.idrain_ua, 0.0);
        assert_eq!(op.gm_us, 0.0);
        assert_eq!(op.gds_us, 0.0);
    }

    #[test]
    fn surface_mesh_has_expected_size() {
        let (params, config) = nmos_params();
        let points = sweep_surface(&params, &config, 10);
        assert_eq!(points.len(), 100);
        assert_eq!(points[0].vgs, config.min_vgs);
        assert_eq!(points[99].vgs, config.max_vgs);
        assert_eq!(points[99].vds, config.max_vds);
    }
}
