use approx::assert_abs_diff_eq;
use psychro_toolbox::air::{
    resolve, resolve_pair, KnownPair, KnownProperties, PropertyName, ResolveError,
};

const P_ATM: f64 = 101_325.0;

fn known(entries: &[(PropertyName, f64)]) -> KnownProperties {
    entries.iter().copied().collect()
}

#[test]
fn tdb_rh_matches_reference_point() {
    let set = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 25.0, rh: 0.5 }).expect("resolve");
    assert_abs_diff_eq!(set.w, 0.009_881, epsilon = 1e-5);
    assert_abs_diff_eq!(set.twb, 17.89, epsilon = 0.01);
    assert_abs_diff_eq!(set.tdp, 13.86, epsilon = 0.01);
    assert_abs_diff_eq!(set.h, 50_322.0, epsilon = 5.0);
    assert_abs_diff_eq!(set.v, 0.8580, epsilon = 1e-4);
    assert!(set.tdp <= set.twb && set.twb <= set.tdb);
}

#[test]
fn every_supported_pair_lands_on_the_same_state() {
    let base = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 25.0, rh: 0.5 }).expect("base");

    let by_twb = resolve_pair(
        P_ATM,
        KnownPair::TdbTwb {
            tdb: 25.0,
            twb: base.twb,
        },
    )
    .expect("tdb+twb");
    assert_abs_diff_eq!(by_twb.w, base.w, epsilon = 2e-5);

    let by_w = resolve_pair(P_ATM, KnownPair::TdbW { tdb: 25.0, w: base.w }).expect("tdb+w");
    assert_abs_diff_eq!(by_w.rh, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(by_w.twb, base.twb, epsilon = 0.01);

    let by_tdp = resolve_pair(
        P_ATM,
        KnownPair::TdbTdp {
            tdb: 25.0,
            tdp: base.tdp,
        },
    )
    .expect("tdb+tdp");
    assert_abs_diff_eq!(by_tdp.w, base.w, epsilon = 1e-5);
    assert_eq!(by_tdp.tdp, base.tdp);

    let by_hw = resolve_pair(P_ATM, KnownPair::HW { h: base.h, w: base.w }).expect("h+w");
    assert_abs_diff_eq!(by_hw.tdb, 25.0, epsilon = 1e-6);
    assert_eq!(by_hw.h, base.h);
}

#[test]
fn map_input_is_order_independent() {
    let a = resolve(
        P_ATM,
        &known(&[(PropertyName::Rh, 0.4), (PropertyName::Tdb, 30.0)]),
    )
    .expect("rh first");
    let b = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 30.0, rh: 0.4 }).expect("pair");
    assert_eq!(a, b);
}

#[test]
fn wrong_number_of_inputs_is_rejected_before_calculation() {
    let one = resolve(P_ATM, &known(&[(PropertyName::Tdb, 25.0)]));
    assert!(matches!(
        one,
        Err(ResolveError::InvalidInputCount { count: 1, .. })
    ));

    let three = resolve(
        P_ATM,
        &known(&[
            (PropertyName::Tdb, 25.0),
            (PropertyName::Rh, 0.5),
            (PropertyName::W, 0.01),
        ]),
    );
    match three {
        Err(ResolveError::InvalidInputCount { count, keys }) => {
            assert_eq!(count, 3);
            assert_eq!(
                keys,
                vec![PropertyName::Tdb, PropertyName::Rh, PropertyName::W]
            );
        }
        other => panic!("unexpected {other:?}"),
    }

    let none = resolve(P_ATM, &KnownProperties::new());
    assert!(matches!(
        none,
        Err(ResolveError::InvalidInputCount { count: 0, .. })
    ));
}

#[test]
fn unsupported_pair_is_reported() {
    let res = resolve(
        P_ATM,
        &known(&[(PropertyName::Rh, 0.5), (PropertyName::Twb, 18.0)]),
    );
    assert!(matches!(
        res,
        Err(ResolveError::UnsupportedInputCombination { .. })
    ));
    let err = res.unwrap_err().to_string();
    assert!(err.contains("rh") && err.contains("twb"), "{err}");
}

#[test]
fn wet_bulb_above_dry_bulb_is_clamped_to_saturation() {
    let set = resolve_pair(
        P_ATM,
        KnownPair::TdbTwb {
            tdb: 20.0,
            twb: 22.0,
        },
    )
    .expect("clamped");
    assert_eq!(set.twb, 20.0);
    assert_abs_diff_eq!(set.rh, 1.0, epsilon = 1e-3);
}

#[test]
fn wet_bulb_well_above_dry_bulb_is_clamped() {
    let set = resolve_pair(
        P_ATM,
        KnownPair::TdbTwb {
            tdb: 20.0,
            twb: 25.0,
        },
    )
    .expect("clamped");
    assert_eq!(set.twb, 20.0);
    assert_abs_diff_eq!(set.tdp, 20.0, epsilon = 0.01);
    assert_abs_diff_eq!(set.rh, 1.0, epsilon = 1e-3);
}

#[test]
fn dew_point_above_dry_bulb_is_clamped_to_saturation() {
    let set = resolve_pair(
        P_ATM,
        KnownPair::TdbTdp {
            tdb: 20.0,
            tdp: 25.0,
        },
    )
    .expect("clamped");
    assert_eq!(set.tdp, 20.0);
    assert_abs_diff_eq!(set.rh, 1.0, epsilon = 1e-3);
    assert_abs_diff_eq!(set.twb, 20.0, epsilon = 0.01);
}

#[test]
fn saturated_air_has_equal_temperatures() {
    let set = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 15.0, rh: 1.0 }).expect("saturated");
    assert_abs_diff_eq!(set.tdp, 15.0, epsilon = 0.01);
    assert_abs_diff_eq!(set.twb, 15.0, epsilon = 0.01);
}

#[test]
fn saturated_room_air_has_dew_point_at_dry_bulb() {
    let set = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 25.0, rh: 1.0 }).expect("saturated");
    assert_abs_diff_eq!(set.tdp, 25.0, epsilon = 0.01);
    assert_abs_diff_eq!(set.twb, 25.0, epsilon = 0.01);
    assert_abs_diff_eq!(set.rh, 1.0, epsilon = 1e-9);
}

#[test]
fn supersaturated_humidity_ratio_still_resolves() {
    let set = resolve_pair(P_ATM, KnownPair::TdbW { tdb: 25.0, w: 0.03 }).expect("resolved");
    assert!(set.rh > 1.0);
    assert_eq!(set.w, 0.03);
}

#[test]
fn out_of_range_humidity_fails_with_inputs_attached() {
    for rh in [1.2, -0.1, 0.0] {
        match resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 25.0, rh }) {
            Err(ResolveError::PropertyOutOfRange {
                inputs,
                pressure_pa,
                ..
            }) => {
                assert_eq!(inputs.get(&PropertyName::Rh), Some(&rh));
                assert_eq!(pressure_pa, P_ATM);
            }
            other => panic!("rh={rh}: unexpected {other:?}"),
        }
    }
}

#[test]
fn negative_humidity_ratio_is_rejected() {
    let res = resolve_pair(P_ATM, KnownPair::TdbW { tdb: 25.0, w: -0.001 });
    assert!(matches!(res, Err(ResolveError::PropertyOutOfRange { .. })));
}

#[test]
fn lower_pressure_raises_humidity_ratio() {
    let sea = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 25.0, rh: 0.5 }).expect("sea level");
    let high = resolve_pair(83_500.0, KnownPair::TdbRh { tdb: 25.0, rh: 0.5 }).expect("altitude");
    assert_abs_diff_eq!(high.w, 0.012_03, epsilon = 1e-4);
    assert!(high.w > sea.w);
    assert!(high.v > sea.v);
}

#[test]
fn dry_winter_air_wet_bulb() {
    let set = resolve_pair(P_ATM, KnownPair::TdbRh { tdb: 20.0, rh: 0.3 }).expect("resolve");
    assert_abs_diff_eq!(set.twb, 10.85, epsilon = 0.02);
}
