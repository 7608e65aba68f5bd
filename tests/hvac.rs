use approx::assert_abs_diff_eq;
use psychro_toolbox::air::{AirState, KnownPair};
use psychro_toolbox::hvac::{
    self, AhuCoolingInput, AhuHeatingInput, AhuModel, AhuSlot, FcuModel, FcuSlot, Humidifier,
    ProcessError, SystemError,
};

const P_ATM: f64 = 101_325.0;

fn state(label: &str, tdb: f64, rh: f64) -> AirState {
    AirState::from_pair(P_ATM, label, KnownPair::TdbRh { tdb, rh })
}

fn cooling_input() -> AhuCoolingInput {
    AhuCoolingInput {
        oa_mass_flow_kg_s: 0.6,
        ra_mass_flow_kg_s: 2.4,
        adp_c: 11.0,
        bypass_factor: 0.15,
        reheat_w: 0.0,
        humidifier: Humidifier::None,
        fan_heat_w: 0.0,
    }
}

#[test]
fn mixing_is_mass_weighted() {
    let oa = state("OA", 33.0, 0.6);
    let ra = state("RA", 26.0, 0.5);
    let mixed = hvac::mix_air(&oa, 0.6, &ra, 2.4).expect("mix");
    assert_eq!(mixed.label(), "Mixed Air");
    assert_abs_diff_eq!(mixed.w().unwrap(), 0.012_219, epsilon = 1e-5);
    assert_abs_diff_eq!(mixed.tdb().unwrap(), 27.42, epsilon = 0.02);
}

#[test]
fn mixing_with_zero_flow_returns_larger_stream() {
    let oa = state("OA", 33.0, 0.6);
    let ra = state("RA", 26.0, 0.5);
    let mixed = hvac::mix_air(&oa, 0.0, &ra, 0.0).expect("mix");
    assert_eq!(mixed.label(), "RA");
    assert!(matches!(
        hvac::mix_air(&oa, -1.0, &ra, 1.0),
        Err(ProcessError::InvalidParameter { .. })
    ));
}

#[test]
fn invalid_state_is_rejected_by_processes() {
    let bad = AirState::from_pair(P_ATM, "Bad", KnownPair::TdbRh { tdb: 25.0, rh: 3.0 });
    let good = state("Good", 25.0, 0.5);
    assert!(matches!(
        hvac::mix_air(&bad, 1.0, &good, 1.0),
        Err(ProcessError::InvalidState { .. })
    ));
    assert!(hvac::sensible_heat(&bad, 1000.0, 1.0).is_err());
}

#[test]
fn sensible_heating_keeps_humidity_ratio() {
    let cold = state("Cold", 10.0, 0.8);
    let warm = hvac::sensible_heat(&cold, 10_000.0, 1.0).expect("heat");
    assert_eq!(warm.w(), cold.w());
    assert_abs_diff_eq!(warm.h().unwrap() - cold.h().unwrap(), 10_000.0, epsilon = 1e-6);
    let dt = warm.tdb().unwrap() - cold.tdb().unwrap();
    assert_abs_diff_eq!(dt, 10_000.0 / hvac::cp_moist_air(cold.w().unwrap()), epsilon = 0.1);
    assert!(warm.rh().unwrap() < cold.rh().unwrap());
    assert_eq!(warm.label(), "Cold_SensHeat");
}

#[test]
fn cooling_coil_follows_bypass_line() {
    let oa = state("OA", 33.0, 0.6);
    let ra = state("RA", 26.0, 0.5);
    let mixed = hvac::mix_air(&oa, 0.6, &ra, 2.4).expect("mix");
    let out = hvac::cooling_coil(&mixed, 11.0, 0.15).expect("coil");
    assert_abs_diff_eq!(out.tdb().unwrap(), 13.48, epsilon = 0.02);
    assert_abs_diff_eq!(out.w().unwrap(), 0.008_772, epsilon = 1e-5);
    assert_abs_diff_eq!(out.rh().unwrap(), 0.912, epsilon = 0.005);

    let load = hvac::coil_load(&mixed, &out, 3.0).expect("load");
    assert!(load.total_w > 0.0 && load.sensible_w > 0.0 && load.latent_w > 0.0);
    assert_abs_diff_eq!(load.total_w, load.sensible_w + load.latent_w, epsilon = 1e-9);
}

#[test]
fn bypass_factor_bounds() {
    let s = state("S", 26.0, 0.5);
    assert!(hvac::cooling_coil(&s, 11.0, 1.2).is_err());
    let full_bypass = hvac::cooling_coil(&s, 11.0, 1.0).expect("bf=1");
    assert_abs_diff_eq!(full_bypass.tdb().unwrap(), 26.0, epsilon = 1e-6);
}

#[test]
fn steam_humidification_adds_moisture() {
    let dry = state("Dry", 20.0, 0.2);
    let wet = hvac::steam_humidify(&dry, 1.0, 0.003).expect("humidify");
    assert_abs_diff_eq!(wet.w().unwrap() - dry.w().unwrap(), 0.003, epsilon = 1e-12);
    assert!(wet.tdb().unwrap() > dry.tdb().unwrap());
    let same = hvac::steam_humidify(&dry, 1.0, 0.0).expect("no water");
    assert_eq!(same, dry);
}

#[test]
fn adiabatic_humidification_keeps_enthalpy() {
    let dry = state("Dry", 30.0, 0.2);
    let out = hvac::adiabatic_humidify(&dry, 0.8).expect("adiabatic");
    assert_eq!(out.h(), dry.h());
    assert!(out.tdb().unwrap() < dry.tdb().unwrap());
    assert!(out.w().unwrap() > dry.w().unwrap());
    assert!(hvac::adiabatic_humidify(&dry, 1.5).is_err());
}

#[test]
fn ahu_cooling_cycle_fills_every_slot() {
    let mut ahu = AhuModel::new(P_ATM);
    ahu.set_inlet_conditions(33.0, 0.6, 26.0, 0.5)
        .expect("inlets");
    let input = AhuCoolingInput {
        reheat_w: 5_000.0,
        fan_heat_w: 3_000.0,
        ..cooling_input()
    };
    ahu.run_cooling_cycle(&input).expect("cooling");

    let slots: Vec<AhuSlot> = ahu.states().into_iter().map(|(slot, _)| slot).collect();
    assert_eq!(
        slots,
        vec![
            AhuSlot::OutsideAir,
            AhuSlot::ReturnAir,
            AhuSlot::MixedAir,
            AhuSlot::CoolingCoilOut,
            AhuSlot::HeatingCoilOut,
            AhuSlot::HumidifierOut,
            AhuSlot::SupplyAir,
        ]
    );
    let cc = ahu.state(AhuSlot::CoolingCoilOut).unwrap();
    let hc = ahu.state(AhuSlot::HeatingCoilOut).unwrap();
    let sa = ahu.state(AhuSlot::SupplyAir).unwrap();
    assert!(hc.tdb().unwrap() > cc.tdb().unwrap());
    assert!(sa.tdb().unwrap() > hc.tdb().unwrap());
    assert_eq!(sa.w(), cc.w());

    assert!(ahu
        .process_line(AhuSlot::MixedAir, AhuSlot::CoolingCoilOut)
        .is_some());
    // 가습기가 없으면 재열 출구와 가습 출구는 같은 점이다.
    assert!(ahu
        .process_line(AhuSlot::HeatingCoilOut, AhuSlot::HumidifierOut)
        .is_none());
}

#[test]
fn ahu_heating_cycle_with_steam_humidifier() {
    let mut ahu = AhuModel::new(P_ATM);
    ahu.set_inlet_conditions(-5.0, 0.5, 22.0, 0.4)
        .expect("inlets");
    let input = AhuHeatingInput {
        oa_mass_flow_kg_s: 0.6,
        ra_mass_flow_kg_s: 2.4,
        heating_w: 30_000.0,
        humidifier: Humidifier::Steam { water_kg_s: 0.004 },
        fan_heat_w: 0.0,
    };
    ahu.run_heating_cycle(&input).expect("heating");
    let ma = ahu.state(AhuSlot::MixedAir).unwrap();
    let cc = ahu.state(AhuSlot::CoolingCoilOut).unwrap();
    let hum = ahu.state(AhuSlot::HumidifierOut).unwrap();
    assert_eq!(cc.properties(), ma.properties());
    assert!(hum.w().unwrap() > ma.w().unwrap());
}

#[test]
fn ahu_requires_inlets_and_flow() {
    let mut ahu = AhuModel::new(P_ATM);
    assert_eq!(
        ahu.run_cooling_cycle(&cooling_input()),
        Err(SystemError::MissingInlet)
    );
    assert!(matches!(
        ahu.set_inlet_conditions(33.0, 1.4, 26.0, 0.5),
        Err(SystemError::InvalidInlet(_))
    ));
    ahu.set_inlet_conditions(33.0, 0.6, 26.0, 0.5)
        .expect("inlets");
    let no_flow = AhuCoolingInput {
        oa_mass_flow_kg_s: 0.0,
        ra_mass_flow_kg_s: 0.0,
        ..cooling_input()
    };
    assert!(matches!(
        ahu.run_cooling_cycle(&no_flow),
        Err(SystemError::NonPositiveFlow(_))
    ));
}

#[test]
fn failed_rerun_drops_previous_results() {
    let mut ahu = AhuModel::new(P_ATM);
    ahu.set_inlet_conditions(33.0, 0.6, 26.0, 0.5)
        .expect("inlets");
    ahu.run_cooling_cycle(&cooling_input()).expect("cooling");
    assert!(ahu.state(AhuSlot::SupplyAir).is_some());

    let bad_coil = AhuCoolingInput {
        oa_mass_flow_kg_s: 3.0,
        ra_mass_flow_kg_s: 0.0,
        bypass_factor: 2.0,
        ..cooling_input()
    };
    assert!(ahu.run_cooling_cycle(&bad_coil).is_err());
    assert!(ahu.state(AhuSlot::CoolingCoilOut).is_none());
    assert!(ahu.state(AhuSlot::SupplyAir).is_none());
    let slots: Vec<AhuSlot> = ahu.states().into_iter().map(|(slot, _)| slot).collect();
    assert_eq!(
        slots,
        vec![AhuSlot::OutsideAir, AhuSlot::ReturnAir, AhuSlot::MixedAir]
    );

    let no_flow = AhuCoolingInput {
        oa_mass_flow_kg_s: 0.0,
        ra_mass_flow_kg_s: 0.0,
        ..cooling_input()
    };
    assert!(ahu.run_cooling_cycle(&no_flow).is_err());
    assert!(ahu.state(AhuSlot::MixedAir).is_none());
    assert!(ahu.state(AhuSlot::OutsideAir).is_some());

    let mut fcu = FcuModel::new(P_ATM);
    fcu.set_entering_air(26.0, 0.55, "Entering").expect("entering");
    fcu.run_cooling_cycle(0.25, 12.0, 0.2, 80.0).expect("cooling");
    assert!(fcu.run_cooling_cycle(0.25, 12.0, 2.0, 80.0).is_err());
    assert!(fcu.state(FcuSlot::CoilOut).is_none());
    assert!(fcu.state(FcuSlot::Supply).is_none());
    assert_eq!(fcu.states().len(), 1);
}

#[test]
fn fcu_cooling_and_heating() {
    let mut fcu = FcuModel::new(P_ATM);
    fcu.set_entering_air(26.0, 0.55, "Entering").expect("entering");
    fcu.run_cooling_cycle(0.25, 12.0, 0.2, 80.0).expect("cooling");
    let entering = fcu.state(FcuSlot::Entering).unwrap();
    let coil = fcu.state(FcuSlot::CoilOut).unwrap();
    let supply = fcu.state(FcuSlot::Supply).unwrap();
    assert!(coil.tdb().unwrap() < entering.tdb().unwrap());
    assert!(supply.tdb().unwrap() > coil.tdb().unwrap());
    assert_eq!(fcu.states().len(), 3);

    fcu.run_heating_cycle(0.25, 2_000.0, 0.0).expect("heating");
    let coil = fcu.state(FcuSlot::CoilOut).unwrap();
    assert!(coil.tdb().unwrap() > 26.0);
    assert!(fcu.process_line(FcuSlot::CoilOut, FcuSlot::Supply).is_none());
}

#[test]
fn humidifier_parses_from_tagged_toml() {
    let input: AhuCoolingInput = toml::from_str(
        r#"
        oa_mass_flow_kg_s = 1.0
        ra_mass_flow_kg_s = 1.0
        adp_c = 12.0
        bypass_factor = 0.1
        humidifier = { type = "adiabatic", effectiveness = 0.7 }
        "#,
    )
    .expect("parse");
    assert_eq!(
        input.humidifier,
        Humidifier::Adiabatic { effectiveness: 0.7 }
    );
    assert_eq!(input.fan_heat_w, 0.0);
}
