//! ASHRAE Handbook Fundamentals(2017) 1장 기반 습공기 물성 함수 모음.
//! 입력: 온도(°C), 상대습도(0~1), 압력(Pa, 절대), 습도비(kg/kg), 엔탈피(J/kg)
//! 단위계는 SI로 고정되어 있으며 런타임에 바뀌지 않는다.

use thiserror::Error;

/// 물의 삼중점 온도(°C). 이 이하에서는 얼음 위 포화압 식을 쓴다.
const TRIPLE_POINT_WATER_C: f64 = 0.01;
const FREEZING_POINT_WATER_C: f64 = 0.0;
const ZERO_CELSIUS_K: f64 = 273.15;
/// 건공기 기체상수(J/kg·K)
const R_DA: f64 = 287.042;
/// 수증기/건공기 분자량비
const MW_RATIO: f64 = 0.621945;
/// 습도비 하한. 0 또는 음수로 인한 로그/나눗셈 오류를 막는다.
pub const MIN_HUM_RATIO: f64 = 1e-7;
/// 반복 계산 허용 오차(K)
const TOLERANCE: f64 = 0.001;
const MAX_ITER_COUNT: usize = 100;
/// Hyland-Wexler 식의 유효 온도 범위(°C)
const T_BOUNDS_C: (f64, f64) = (-100.0, 200.0);

/// 물성 함수가 입력을 거부했을 때의 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PsychroError {
    /// 입력이 물리적/수치적 유효 범위를 벗어남
    #[error("{what} 값 {value}이(가) 유효 범위를 벗어났습니다")]
    OutOfRange { what: &'static str, value: f64 },
    /// 습구온도가 건구온도보다 높음
    #[error("습구온도 {t_wet_bulb}°C가 건구온도 {t_dry_bulb}°C보다 높습니다")]
    WetBulbAboveDryBulb { t_dry_bulb: f64, t_wet_bulb: f64 },
    /// 반복 계산이 수렴하지 않음
    #[error("{what} 반복 계산이 수렴하지 않았습니다")]
    NoConvergence { what: &'static str },
}

pub type PsychroResult<T> = Result<T, PsychroError>;

fn check_rel_hum(rel_hum: f64) -> PsychroResult<()> {
    if (0.0..=1.0).contains(&rel_hum) {
        Ok(())
    } else {
        Err(PsychroError::OutOfRange {
            what: "상대습도",
            value: rel_hum,
        })
    }
}

fn check_hum_ratio(hum_ratio: f64) -> PsychroResult<()> {
    if hum_ratio.is_finite() && hum_ratio >= 0.0 {
        Ok(())
    } else {
        Err(PsychroError::OutOfRange {
            what: "습도비",
            value: hum_ratio,
        })
    }
}

fn check_pressure(pressure_pa: f64) -> PsychroResult<()> {
    if pressure_pa.is_finite() && pressure_pa > 0.0 {
        Ok(())
    } else {
        Err(PsychroError::OutOfRange {
            what: "압력",
            value: pressure_pa,
        })
    }
}

/// 고도(m)로부터 표준 대기압(Pa)을 구한다.
pub fn standard_atm_pressure(altitude_m: f64) -> f64 {
    101_325.0 * (1.0 - 2.25577e-5 * altitude_m).powf(5.2559)
}

/// 포화 수증기압(Pa). Hyland-Wexler 식, -100~200°C.
pub fn sat_vap_pres(t_dry_bulb: f64) -> PsychroResult<f64> {
    if !(T_BOUNDS_C.0..=T_BOUNDS_C.1).contains(&t_dry_bulb) {
        return Err(PsychroError::OutOfRange {
            what: "건구온도",
            value: t_dry_bulb,
        });
    }
    let t = t_dry_bulb + ZERO_CELSIUS_K;
    let ln_pws = if t_dry_bulb <= TRIPLE_POINT_WATER_C {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    Ok(ln_pws.exp())
}

// ln(Pws)의 온도 미분. 이슬점 Newton-Raphson 에 사용한다.
fn d_ln_pws(t_dry_bulb: f64) -> f64 {
    let t = t_dry_bulb + ZERO_CELSIUS_K;
    if t_dry_bulb <= TRIPLE_POINT_WATER_C {
        5.674_535_9e3 / t.powi(2) - 9.677_843e-3 + 2.0 * 6.221_570_1e-7 * t
            + 3.0 * 2.074_782_5e-9 * t.powi(2)
            - 4.0 * 9.484_024e-13 * t.powi(3)
            + 4.163_501_9 / t
    } else {
        5.800_220_6e3 / t.powi(2) - 4.864_023_9e-2 + 2.0 * 4.176_476_8e-5 * t
            - 3.0 * 1.445_209_3e-8 * t.powi(2)
            + 6.545_967_3 / t
    }
}

/// 수증기 분압(Pa)으로부터 습도비를 구한다.
pub fn hum_ratio_from_vap_pres(vap_pres: f64, pressure_pa: f64) -> PsychroResult<f64> {
    check_pressure(pressure_pa)?;
    if !(0.0..pressure_pa).contains(&vap_pres) {
        return Err(PsychroError::OutOfRange {
            what: "수증기 분압",
            value: vap_pres,
        });
    }
    let w = MW_RATIO * vap_pres / (pressure_pa - vap_pres);
    Ok(w.max(MIN_HUM_RATIO))
}

/// 습도비로부터 수증기 분압(Pa)을 구한다.
pub fn vap_pres_from_hum_ratio(hum_ratio: f64, pressure_pa: f64) -> PsychroResult<f64> {
    check_hum_ratio(hum_ratio)?;
    check_pressure(pressure_pa)?;
    let w = hum_ratio.max(MIN_HUM_RATIO);
    Ok(pressure_pa * w / (MW_RATIO + w))
}

/// 포화 습도비(kg/kg).
pub fn sat_hum_ratio(t_dry_bulb: f64, pressure_pa: f64) -> PsychroResult<f64> {
    let pws = sat_vap_pres(t_dry_bulb)?;
    hum_ratio_from_vap_pres(pws, pressure_pa)
}

/// 수증기 분압으로부터 이슬점(°C)을 구한다.
///
/// ln(Pw) 에 대한 Newton-Raphson 반복이며 결과는 건구온도를 넘지 않는다.
pub fn t_dew_point_from_vap_pres(t_dry_bulb: f64, vap_pres: f64) -> PsychroResult<f64> {
    let lower = sat_vap_pres(T_BOUNDS_C.0)?;
    let upper = sat_vap_pres(T_BOUNDS_C.1)?;
    if !(lower..=upper).contains(&vap_pres) {
        return Err(PsychroError::OutOfRange {
            what: "수증기 분압",
            value: vap_pres,
        });
    }
    let ln_vp = vap_pres.ln();
    let mut t_dew = t_dry_bulb.clamp(T_BOUNDS_C.0, T_BOUNDS_C.1);
    for _ in 0..MAX_ITER_COUNT {
        let t_iter = t_dew;
        let ln_vp_iter = sat_vap_pres(t_iter)?.ln();
        t_dew = t_iter - (ln_vp_iter - ln_vp) / d_ln_pws(t_iter);
        t_dew = t_dew.clamp(T_BOUNDS_C.0, T_BOUNDS_C.1);
        if (t_dew - t_iter).abs() <= TOLERANCE {
            return Ok(t_dew.min(t_dry_bulb));
        }
    }
    Err(PsychroError::NoConvergence { what: "이슬점" })
}

/// 습도비 ← (건구온도, 상대습도, 압력)
pub fn hum_ratio_from_rel_hum(
    t_dry_bulb: f64,
    rel_hum: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    check_rel_hum(rel_hum)?;
    let vap_pres = rel_hum * sat_vap_pres(t_dry_bulb)?;
    hum_ratio_from_vap_pres(vap_pres, pressure_pa)
}

/// 이슬점 ← (건구온도, 상대습도). 압력과 무관하다.
pub fn t_dew_point_from_rel_hum(t_dry_bulb: f64, rel_hum: f64) -> PsychroResult<f64> {
    // 상대습도 0 에서는 이슬점이 정의되지 않는다.
    if rel_hum <= 0.0 || rel_hum > 1.0 {
        return Err(PsychroError::OutOfRange {
            what: "상대습도",
            value: rel_hum,
        });
    }
    let vap_pres = rel_hum * sat_vap_pres(t_dry_bulb)?;
    t_dew_point_from_vap_pres(t_dry_bulb, vap_pres)
}

/// 습구온도 ← (건구온도, 상대습도, 압력)
pub fn t_wet_bulb_from_rel_hum(
    t_dry_bulb: f64,
    rel_hum: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    let w = hum_ratio_from_rel_hum(t_dry_bulb, rel_hum, pressure_pa)?;
    t_wet_bulb_from_hum_ratio(t_dry_bulb, w, pressure_pa)
}

/// 상대습도 ← (건구온도, 습도비, 압력)
pub fn rel_hum_from_hum_ratio(
    t_dry_bulb: f64,
    hum_ratio: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    let vap_pres = vap_pres_from_hum_ratio(hum_ratio, pressure_pa)?;
    Ok(vap_pres / sat_vap_pres(t_dry_bulb)?)
}

/// 이슬점 ← (건구온도, 습도비, 압력)
pub fn t_dew_point_from_hum_ratio(
    t_dry_bulb: f64,
    hum_ratio: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    let vap_pres = vap_pres_from_hum_ratio(hum_ratio, pressure_pa)?;
    t_dew_point_from_vap_pres(t_dry_bulb, vap_pres)
}

/// 습구온도 ← (건구온도, 습도비, 압력)
///
/// 이슬점과 건구온도 사이 구간을 이분법으로 좁힌다.
pub fn t_wet_bulb_from_hum_ratio(
    t_dry_bulb: f64,
    hum_ratio: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    check_hum_ratio(hum_ratio)?;
    let w = hum_ratio.max(MIN_HUM_RATIO);
    let t_dew = t_dew_point_from_hum_ratio(t_dry_bulb, w, pressure_pa)?;

    let mut sup = t_dry_bulb;
    let mut inf = t_dew;
    let mut t_wet = (inf + sup) / 2.0;
    let mut iterations = 0;
    while sup - inf > TOLERANCE {
        let w_star = hum_ratio_from_t_wet_bulb(t_dry_bulb, t_wet, pressure_pa)?;
        if w_star > w {
            sup = t_wet;
        } else {
            inf = t_wet;
        }
        t_wet = (sup + inf) / 2.0;
        iterations += 1;
        if iterations >= MAX_ITER_COUNT {
            return Err(PsychroError::NoConvergence { what: "습구온도" });
        }
    }
    Ok(t_wet)
}

/// 습도비 ← (건구온도, 습구온도, 압력)
pub fn hum_ratio_from_t_wet_bulb(
    t_dry_bulb: f64,
    t_wet_bulb: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    if t_wet_bulb > t_dry_bulb {
        return Err(PsychroError::WetBulbAboveDryBulb {
            t_dry_bulb,
            t_wet_bulb,
        });
    }
    let ws_star = sat_hum_ratio(t_wet_bulb, pressure_pa)?;
    let w = if t_wet_bulb >= FREEZING_POINT_WATER_C {
        ((2501.0 - 2.326 * t_wet_bulb) * ws_star - 1.006 * (t_dry_bulb - t_wet_bulb))
            / (2501.0 + 1.86 * t_dry_bulb - 4.186 * t_wet_bulb)
    } else {
        // 얼음 표면 위 습구
        ((2830.0 - 0.24 * t_wet_bulb) * ws_star - 1.006 * (t_dry_bulb - t_wet_bulb))
            / (2830.0 + 1.86 * t_dry_bulb - 2.1 * t_wet_bulb)
    };
    Ok(w.max(MIN_HUM_RATIO))
}

/// 상대습도 ← (건구온도, 습구온도, 압력)
pub fn rel_hum_from_t_wet_bulb(
    t_dry_bulb: f64,
    t_wet_bulb: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    let w = hum_ratio_from_t_wet_bulb(t_dry_bulb, t_wet_bulb, pressure_pa)?;
    rel_hum_from_hum_ratio(t_dry_bulb, w, pressure_pa)
}

/// 이슬점 ← (건구온도, 습구온도, 압력)
pub fn t_dew_point_from_t_wet_bulb(
    t_dry_bulb: f64,
    t_wet_bulb: f64,
    pressure_pa: f64,
) -> PsychroResult<f64> {
    let w = hum_ratio_from_t_wet_bulb(t_dry_bulb, t_wet_bulb, pressure_pa)?;
    t_dew_point_from_hum_ratio(t_dry_bulb, w, pressure_pa)
}

/// 습도비 ← (이슬점, 압력). 이슬점에서의 포화 습도비와 같다.
pub fn hum_ratio_from_t_dew_point(t_dew_point: f64, pressure_pa: f64) -> PsychroResult<f64> {
    let vap_pres = sat_vap_pres(t_dew_point)?;
    hum_ratio_from_vap_pres(vap_pres, pressure_pa)
}

/// 습공기 비엔탈피(J/kg 건공기) ← (건구온도, 습도비)
pub fn moist_air_enthalpy(t_dry_bulb: f64, hum_ratio: f64) -> PsychroResult<f64> {
    check_hum_ratio(hum_ratio)?;
    Ok((1.006 * t_dry_bulb + hum_ratio * (2501.0 + 1.86 * t_dry_bulb)) * 1000.0)
}

/// 습공기 비체적(m³/kg 건공기) ← (건구온도, 습도비, 압력)
pub fn moist_air_volume(t_dry_bulb: f64, hum_ratio: f64, pressure_pa: f64) -> PsychroResult<f64> {
    check_hum_ratio(hum_ratio)?;
    check_pressure(pressure_pa)?;
    let w = hum_ratio.max(MIN_HUM_RATIO);
    Ok(R_DA * (t_dry_bulb + ZERO_CELSIUS_K) * (1.0 + 1.607_858 * w) / pressure_pa)
}

/// 건구온도 ← (비엔탈피, 습도비)
pub fn t_dry_bulb_from_enthalpy_and_hum_ratio(
    enthalpy: f64,
    hum_ratio: f64,
) -> PsychroResult<f64> {
    check_hum_ratio(hum_ratio)?;
    if !enthalpy.is_finite() {
        return Err(PsychroError::OutOfRange {
            what: "비엔탈피",
            value: enthalpy,
        });
    }
    let w = hum_ratio.max(MIN_HUM_RATIO);
    Ok((enthalpy / 1000.0 - 2501.0 * w) / (1.006 + 1.86 * w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const P_ATM: f64 = 101_325.0;

    #[test]
    fn saturation_pressure_matches_handbook_table() {
        // ASHRAE 표 3: 20°C 2.3389 kPa, -20°C 0.10326 kPa
        assert_relative_eq!(sat_vap_pres(20.0).unwrap(), 2338.8, max_relative = 1e-3);
        assert_relative_eq!(sat_vap_pres(-20.0).unwrap(), 103.26, max_relative = 1e-3);
    }

    #[test]
    fn saturation_pressure_rejects_out_of_range_temperature() {
        assert!(matches!(
            sat_vap_pres(250.0),
            Err(PsychroError::OutOfRange { .. })
        ));
    }

    #[test]
    fn hum_ratio_inverts_vapour_pressure() {
        let w = hum_ratio_from_rel_hum(25.0, 0.5, P_ATM).unwrap();
        assert_relative_eq!(rel_hum_from_hum_ratio(25.0, w, P_ATM).unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn wet_bulb_sits_between_dew_point_and_dry_bulb() {
        let twb = t_wet_bulb_from_rel_hum(30.0, 0.4, P_ATM).unwrap();
        let tdp = t_dew_point_from_rel_hum(30.0, 0.4).unwrap();
        assert!(tdp < twb && twb < 30.0, "tdp={tdp} twb={twb}");
    }

    #[test]
    fn wet_bulb_above_dry_bulb_is_rejected() {
        assert!(matches!(
            hum_ratio_from_t_wet_bulb(20.0, 25.0, P_ATM),
            Err(PsychroError::WetBulbAboveDryBulb { .. })
        ));
    }

    #[test]
    fn enthalpy_and_dry_bulb_are_inverse() {
        let h = moist_air_enthalpy(22.0, 0.008).unwrap();
        let t = t_dry_bulb_from_enthalpy_and_hum_ratio(h, 0.008).unwrap();
        assert_relative_eq!(t, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_hum_ratio_is_rejected() {
        assert!(moist_air_enthalpy(20.0, -0.001).is_err());
        assert!(moist_air_volume(20.0, -0.001, P_ATM).is_err());
    }

    #[test]
    fn standard_atmosphere_at_sea_level() {
        assert_relative_eq!(standard_atm_pressure(0.0), P_ATM);
        assert!(standard_atm_pressure(1500.0) < 85_000.0);
    }
}
