//! 공조 프로세스(혼합, 현열 가열/냉각, 냉각코일, 가습) 계산.
//! 모든 결과 상태는 (h, w) 조합으로 다시 결정된다.

use thiserror::Error;
use tracing::{info, warn};

use crate::air::psychrometrics::{self as psy, PsychroError};
use crate::air::{AirState, KnownPair, PropertySet};

/// 건공기 정압비열 [J/kg·K]
pub const CP_AIR_DRY: f64 = 1006.0;
/// 수증기 정압비열 [J/kg·K]
pub const CP_WATER_VAPOR: f64 = 1860.0;
/// 가습용 포화증기(100°C) 비엔탈피 [J/kg]
pub const H_STEAM_J_KG: f64 = 2_676_000.0;
/// 이보다 작은 질량유량은 0으로 본다 [kg/s]
pub const MIN_MASS_FLOW: f64 = 1e-9;

/// 공조 프로세스 계산 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// 입력 상태가 계산되어 있지 않음
    #[error("유효하지 않은 입력 상태: '{label}'")]
    InvalidState { label: String },
    /// 유량, 바이패스 계수 등 파라미터가 범위를 벗어남
    #[error("{what} 값 {value}이(가) 허용 범위를 벗어났습니다")]
    InvalidParameter { what: &'static str, value: f64 },
    /// 결과 상태를 결정하지 못함
    #[error("결과 상태 '{label}' 계산 실패")]
    Unresolved { label: String },
    /// 물성 함수 오류
    #[error(transparent)]
    Psychro(#[from] PsychroError),
}

/// 냉각코일 부하 [W]. 냉각 시 양수.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilLoad {
    pub total_w: f64,
    pub sensible_w: f64,
    pub latent_w: f64,
}

fn require_valid(state: &AirState) -> Result<&PropertySet, ProcessError> {
    state.properties().ok_or_else(|| ProcessError::InvalidState {
        label: state.label().to_string(),
    })
}

fn require_flow(what: &'static str, value: f64) -> Result<(), ProcessError> {
    if value > MIN_MASS_FLOW {
        Ok(())
    } else {
        Err(ProcessError::InvalidParameter { what, value })
    }
}

fn resolve_hw(pressure_pa: f64, label: String, h: f64, w: f64) -> Result<AirState, ProcessError> {
    let state = AirState::from_pair(pressure_pa, label, KnownPair::HW { h, w });
    if state.is_valid() {
        Ok(state)
    } else {
        Err(ProcessError::Unresolved {
            label: state.label().to_string(),
        })
    }
}

/// 습공기 정압비열 [J/kg·K]. 음수 습도비는 0으로 본다.
pub fn cp_moist_air(w: f64) -> f64 {
    let w = if w < 0.0 {
        warn!(w, "음수 습도비로 비열을 계산하려 해 0으로 대체합니다");
        0.0
    } else {
        w
    };
    CP_AIR_DRY + CP_WATER_VAPOR * w
}

/// 두 공기 흐름을 질량유량 가중으로 혼합한다.
///
/// 압력이 다르면 첫 번째 흐름의 압력을 쓴다. 전체 유량이 사실상 0이면 유량이 큰 쪽을
/// 그대로 돌려준다.
pub fn mix_air(
    a: &AirState,
    flow_a_kg_s: f64,
    b: &AirState,
    flow_b_kg_s: f64,
) -> Result<AirState, ProcessError> {
    let pa = require_valid(a)?;
    let pb = require_valid(b)?;
    if flow_a_kg_s < 0.0 || flow_b_kg_s < 0.0 {
        return Err(ProcessError::InvalidParameter {
            what: "질량유량",
            value: flow_a_kg_s.min(flow_b_kg_s),
        });
    }
    if a.pressure_pa() != b.pressure_pa() {
        warn!(
            pressure_a = a.pressure_pa(),
            pressure_b = b.pressure_pa(),
            "압력이 다른 두 흐름을 혼합합니다. 첫 번째 흐름의 압력을 사용합니다"
        );
    }

    let total = flow_a_kg_s + flow_b_kg_s;
    if total <= MIN_MASS_FLOW {
        warn!("혼합 유량이 0에 가까워 유량이 큰 쪽 상태를 그대로 사용합니다");
        return Ok(if flow_a_kg_s > flow_b_kg_s {
            a.clone()
        } else {
            b.clone()
        });
    }

    let w = (flow_a_kg_s * pa.w + flow_b_kg_s * pb.w) / total;
    let h = (flow_a_kg_s * pa.h + flow_b_kg_s * pb.h) / total;
    let mixed = resolve_hw(a.pressure_pa(), "Mixed Air".to_string(), h, w)?;
    info!(w, h, tdb = mixed.tdb(), "혼합 공기 계산");
    Ok(mixed)
}

/// 현열만 가감한다(습도비 일정). `q_sensible_w`가 양수면 가열.
pub fn sensible_heat(
    state: &AirState,
    q_sensible_w: f64,
    mass_flow_kg_s: f64,
) -> Result<AirState, ProcessError> {
    let p = require_valid(state)?;
    require_flow("공기 질량유량", mass_flow_kg_s)?;

    let h_out = p.h + q_sensible_w / mass_flow_kg_s;
    let out = resolve_hw(
        state.pressure_pa(),
        format!("{}_SensHeat", state.label()),
        h_out,
        p.w,
    )?;
    info!(
        q_sensible_w,
        mass_flow_kg_s,
        tdb_in = p.tdb,
        tdb_out = out.tdb(),
        "현열 가감"
    );
    Ok(out)
}

/// 장치 이슬점(ADP)과 바이패스 계수(BF)를 이용한 단순 냉각코일 모델.
///
/// 출구 물성 = ADP 물성 + BF × (입구 물성 − ADP 물성), h와 w에 적용한다.
pub fn cooling_coil(
    state: &AirState,
    adp_c: f64,
    bypass_factor: f64,
) -> Result<AirState, ProcessError> {
    let p_in = require_valid(state)?;
    if !(0.0..=1.0).contains(&bypass_factor) {
        return Err(ProcessError::InvalidParameter {
            what: "바이패스 계수",
            value: bypass_factor,
        });
    }

    let adp = AirState::from_pair(
        state.pressure_pa(),
        "ADP_Internal",
        KnownPair::TdbRh {
            tdb: adp_c,
            rh: 1.0,
        },
    );
    let p_adp = adp.properties().ok_or(ProcessError::Unresolved {
        label: "ADP_Internal".to_string(),
    })?;

    let w_out = p_adp.w + bypass_factor * (p_in.w - p_adp.w);
    let h_out = p_adp.h + bypass_factor * (p_in.h - p_adp.h);
    let out = resolve_hw(
        state.pressure_pa(),
        format!("{}_CoilOut", state.label()),
        h_out,
        w_out,
    )?;
    info!(
        tdb_in = p_in.tdb,
        w_in_g_kg = p_in.w * 1000.0,
        adp_c,
        bypass_factor,
        tdb_out = out.tdb(),
        w_out_g_kg = w_out * 1000.0,
        "냉각코일 계산"
    );
    Ok(out)
}

/// 코일 입출구 상태로 부하를 나눈다. 현열은 입구 습도비 기준 비열로 근사한다.
pub fn coil_load(
    state_in: &AirState,
    state_out: &AirState,
    mass_flow_kg_s: f64,
) -> Result<CoilLoad, ProcessError> {
    let p_in = require_valid(state_in)?;
    let p_out = require_valid(state_out)?;
    let total_w = mass_flow_kg_s * (p_in.h - p_out.h);
    let sensible_w = mass_flow_kg_s * cp_moist_air(p_in.w) * (p_in.tdb - p_out.tdb);
    Ok(CoilLoad {
        total_w,
        sensible_w,
        latent_w: total_w - sensible_w,
    })
}

/// 증기 가습. 습도비와 함께 증기가 가진 엔탈피가 더해진다.
pub fn steam_humidify(
    state: &AirState,
    mass_flow_kg_s: f64,
    water_kg_s: f64,
) -> Result<AirState, ProcessError> {
    let p = require_valid(state)?;
    require_flow("공기 질량유량", mass_flow_kg_s)?;
    let water_kg_s = if water_kg_s < 0.0 {
        warn!(water_kg_s, "가습량이 음수여서 0으로 봅니다");
        0.0
    } else {
        water_kg_s
    };
    if water_kg_s == 0.0 {
        return Ok(state.clone());
    }

    let w_out = p.w + water_kg_s / mass_flow_kg_s;
    let h_out = p.h + water_kg_s * H_STEAM_J_KG / mass_flow_kg_s;
    let out = resolve_hw(
        state.pressure_pa(),
        format!("{}_Humidified", state.label()),
        h_out,
        w_out,
    )?;
    info!(
        water_kg_h = water_kg_s * 3600.0,
        w_in_g_kg = p.w * 1000.0,
        w_out_g_kg = w_out * 1000.0,
        tdb_in = p.tdb,
        tdb_out = out.tdb(),
        "증기 가습"
    );
    Ok(out)
}

/// 단열(증발식) 가습. 엔탈피를 유지한 채 입구 습구온도의 포화점 쪽으로
/// 포화효율만큼 이동한다.
pub fn adiabatic_humidify(state: &AirState, effectiveness: f64) -> Result<AirState, ProcessError> {
    let p = require_valid(state)?;
    if !(0.0..=1.0).contains(&effectiveness) {
        return Err(ProcessError::InvalidParameter {
            what: "포화효율",
            value: effectiveness,
        });
    }

    let w_sat = psy::sat_hum_ratio(p.twb, state.pressure_pa())?;
    let w_out = p.w + effectiveness * (w_sat - p.w).max(0.0);
    let out = resolve_hw(
        state.pressure_pa(),
        format!("{}_Adiabatic", state.label()),
        p.h,
        w_out,
    )?;
    info!(
        effectiveness,
        tdb_in = p.tdb,
        tdb_out = out.tdb(),
        w_out_g_kg = w_out * 1000.0,
        "단열 가습"
    );
    Ok(out)
}
