//! End-to-end session tests: device description in, bias updates and ticks
//! through the full field-grid and kinetics pipeline.

use mosviz_core::{DeviceDescription, DevicePart, OperatingRegion, SimConfig, device};
use mosviz_sim::Session;

fn nmos_description() -> DeviceDescription {
    DeviceDescription {
        device_parts: vec![
            DevicePart::cuboid(device::SOURCE, [0.0, 1.0], [-1.0, 0.0], [0.0, 2.0])
                .with_doping("n-type", 1e19),
            DevicePart::cuboid(device::DRAIN, [2.0, 3.0], [-1.0, 0.0], [0.0, 2.0])
                .with_doping("n-type", 1e19),
            DevicePart::cuboid(device::GATE_OXIDE, [1.0, 2.0], [0.0, 0.011], [0.0, 2.0]),
            DevicePart::cuboid(device::BODY, [0.0, 3.0], [-2.0, 0.0], [0.0, 2.0])
                .with_doping("p-type", 1e17),
        ],
    }
}

#[test]
fn session_starts_at_zero_bias_cutoff() {
    let session = Session::with_seed(&nmos_description(), SimConfig::default(), 1).unwrap();
    let op = session.operating_point();
    assert_eq!(op.region, OperatingRegion::CutOff);
    assert_eq!(op.idrain_ua, 0.0);
    assert!(session.kinetics().is_empty());
    // 1 um x 0.108 um x 2 um volume at the default resolution.
    assert_eq!(session.grid().dims(), [16, 3, 5]);
}

#[test]
fn bias_inputs_are_clamped() {
    let mut session = Session::with_seed(&nmos_description(), SimConfig::default(), 1).unwrap();
    let op = session.set_bias(99.0, -5.0);
    assert_eq!(op.vgs, 6.0);
    assert_eq!(op.vds, 0.0);
}

#[test]
fn triode_grid_points_toward_the_drain() {
    let mut session = Session::with_seed(&nmos_description(), SimConfig::default(), 1).unwrap();
    let op = session.set_bias(3.0, 0.5);
    assert_eq!(op.region, OperatingRegion::Triode);
    assert!(op.idrain_ua > 0.0);

    let grid = session.grid();
    let [_, ny, _] = grid.dims();
    // Below the oxide boundary the field points at the pinch-off
    // coordinate, which lies beyond the drain end of the channel, so every
    // cell in the bottom layers has a positive x component.
    for y in 0..ny - 1 {
        let field = grid.get(0, y, 0);
        assert!(field.x > 0.0, "cell (0,{y},0) field {field:?}");
    }
    // The topmost layer is purely channel-aligned.
    let top = grid.get(0, ny - 1, 0);
    assert!(top.x > 0.0);
    assert_eq!(top.y, 0.0);
    assert_eq!(top.z, 0.0);
}

#[test]
fn carriers_flow_and_population_stays_bounded() {
    let mut session = Session::with_seed(&nmos_description(), SimConfig::default(), 42).unwrap();
    session.set_bias(3.0, 0.5);

    for _ in 0..50 {
        session.tick();
        assert!(session.kinetics().len() <= session.config().max_carriers);
    }
    // Injection at ~3.5 carriers per tick with transit removal keeps a
    // nonempty steady-state population.
    assert!(!session.kinetics().is_empty());
    let volume = session.volume();
    for carrier in session.kinetics().carriers() {
        assert!(carrier.x < volume.x_end);
    }
}

#[test]
fn heavy_injection_saturates_at_the_ceiling() {
    let mut config = SimConfig::default();
    config.charge_scaling_factor = 1e3;
    let mut session = Session::with_seed(&nmos_description(), config, 7).unwrap();
    session.set_bias(3.0, 0.5);
    session.tick();
    assert_eq!(session.kinetics().len(), session.config().max_carriers);
}

#[test]
fn seeded_sessions_are_reproducible() {
    let desc = nmos_description();
    let mut a = Session::with_seed(&desc, SimConfig::default(), 9).unwrap();
    let mut b = Session::with_seed(&desc, SimConfig::default(), 9).unwrap();
    a.set_bias(4.0, 3.0);
    b.set_bias(4.0, 3.0);
    for _ in 0..20 {
        a.tick();
        b.tick();
    }
    assert_eq!(a.kinetics().carriers(), b.kinetics().carriers());
}

#[test]
fn evaluate_at_does_not_disturb_session_state() {
    let mut session = Session::with_seed(&nmos_description(), SimConfig::default(), 1).unwrap();
    session.set_bias(3.0, 0.5);
    let before = *session.operating_point();

    let probe = session.evaluate_at(5.0, 4.0);
    assert_eq!(probe.region, OperatingRegion::Saturation);
    assert_eq!(*session.operating_point(), before);
}

#[test]
fn cutoff_bias_injects_no_carriers() {
    let mut session = Session::with_seed(&nmos_description(), SimConfig::default(), 1).unwrap();
    session.set_bias(0.2, 1.0);
    assert_eq!(session.operating_point().region, OperatingRegion::CutOff);
    for _ in 0..10 {
        session.tick();
    }
    assert!(session.kinetics().is_empty());
}
