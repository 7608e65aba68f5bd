//! 공조기(AHU)와 팬코일(FCU) 프로세스 체인.
//! 각 단계의 결과 상태를 슬롯에 저장하며, 건너뛴 단계는 이전 상태를 그대로 복사한다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use super::processes::{self, ProcessError, MIN_MASS_FLOW};
use crate::air::{AirState, KnownPair};

/// 같은 상태로 보는 엔탈피 차 [J/kg]
const LINE_H_TOLERANCE: f64 = 10.0;
/// 같은 상태로 보는 습도비 차 [kg/kg]
const LINE_W_TOLERANCE: f64 = 1e-6;

/// 시스템 계산 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    /// 입구 조건이 설정되지 않았거나 무효
    #[error("입구 조건이 설정되지 않았습니다")]
    MissingInlet,
    /// 입구 상태 계산 실패
    #[error("입구 상태 '{0}' 계산 실패")]
    InvalidInlet(String),
    /// 유량이 0 이하
    #[error("전체 유량은 양수여야 합니다 (입력 {0} kg/s)")]
    NonPositiveFlow(f64),
    /// 프로세스 계산 오류
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// 가습기 종류와 파라미터.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Humidifier {
    #[default]
    None,
    /// 증기 가습, 분사량 [kg/s]
    Steam { water_kg_s: f64 },
    /// 단열(증발식) 가습, 포화효율 [0~1]
    Adiabatic { effectiveness: f64 },
}

impl Humidifier {
    // 파라미터가 0 이하이면 가습하지 않는다.
    fn apply(
        self,
        state: &AirState,
        mass_flow_kg_s: f64,
    ) -> Result<Option<AirState>, ProcessError> {
        match self {
            Humidifier::Steam { water_kg_s } if water_kg_s > 0.0 => {
                processes::steam_humidify(state, mass_flow_kg_s, water_kg_s).map(Some)
            }
            Humidifier::Adiabatic { effectiveness } if effectiveness > 0.0 => {
                processes::adiabatic_humidify(state, effectiveness).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// AHU 상태 슬롯. 선언 순서가 프로세스 순서이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AhuSlot {
    OutsideAir,
    ReturnAir,
    MixedAir,
    CoolingCoilOut,
    HeatingCoilOut,
    HumidifierOut,
    SupplyAir,
}

impl AhuSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            AhuSlot::OutsideAir => "OA",
            AhuSlot::ReturnAir => "RA",
            AhuSlot::MixedAir => "MA",
            AhuSlot::CoolingCoilOut => "CC_Out",
            AhuSlot::HeatingCoilOut => "HC_Out",
            AhuSlot::HumidifierOut => "HUM_Out",
            AhuSlot::SupplyAir => "SA",
        }
    }
}

impl fmt::Display for AhuSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FCU 상태 슬롯.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FcuSlot {
    Entering,
    CoilOut,
    Supply,
}

impl FcuSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            FcuSlot::Entering => "Entering",
            FcuSlot::CoilOut => "Coil_Out",
            FcuSlot::Supply => "Supply",
        }
    }
}

impl fmt::Display for FcuSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AHU 냉방 운전 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AhuCoolingInput {
    /// 외기 질량유량 [kg/s]
    pub oa_mass_flow_kg_s: f64,
    /// 환기 질량유량 [kg/s]
    pub ra_mass_flow_kg_s: f64,
    /// 냉각코일 장치 이슬점 [°C]
    pub adp_c: f64,
    /// 냉각코일 바이패스 계수 [0~1]
    pub bypass_factor: f64,
    /// 재열량 [W]
    #[serde(default)]
    pub reheat_w: f64,
    #[serde(default)]
    pub humidifier: Humidifier,
    /// 급기팬 발열 [W]
    #[serde(default)]
    pub fan_heat_w: f64,
}

/// AHU 난방 운전 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AhuHeatingInput {
    pub oa_mass_flow_kg_s: f64,
    pub ra_mass_flow_kg_s: f64,
    /// 가열코일 현열량 [W]
    pub heating_w: f64,
    #[serde(default)]
    pub humidifier: Humidifier,
    #[serde(default)]
    pub fan_heat_w: f64,
}

fn is_same_point(a: &AirState, b: &AirState) -> bool {
    match (a.properties(), b.properties()) {
        (Some(pa), Some(pb)) => {
            (pa.h - pb.h).abs() < LINE_H_TOLERANCE && (pa.w - pb.w).abs() < LINE_W_TOLERANCE
        }
        _ => false,
    }
}

/// 외기/환기 혼합형 공조기 모델.
#[derive(Debug, Clone)]
pub struct AhuModel {
    pressure_pa: f64,
    states: BTreeMap<AhuSlot, AirState>,
}

impl AhuModel {
    pub fn new(pressure_pa: f64) -> Self {
        info!(pressure_pa, "AHU 모델 초기화");
        Self {
            pressure_pa,
            states: BTreeMap::new(),
        }
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    fn reset(&mut self) {
        self.states.clear();
        debug!("AHU 상태 초기화");
    }

    /// 외기(OA)·환기(RA) 조건을 설정한다. 이전 계산 결과는 모두 지운다.
    pub fn set_inlet_conditions(
        &mut self,
        oa_tdb: f64,
        oa_rh: f64,
        ra_tdb: f64,
        ra_rh: f64,
    ) -> Result<(), SystemError> {
        self.reset();
        info!(oa_tdb, oa_rh, ra_tdb, ra_rh, "AHU 입구 조건 설정");
        let oa = AirState::from_pair(
            self.pressure_pa,
            AhuSlot::OutsideAir.as_str(),
            KnownPair::TdbRh {
                tdb: oa_tdb,
                rh: oa_rh,
            },
        );
        let ra = AirState::from_pair(
            self.pressure_pa,
            AhuSlot::ReturnAir.as_str(),
            KnownPair::TdbRh {
                tdb: ra_tdb,
                rh: ra_rh,
            },
        );
        for state in [&oa, &ra] {
            if !state.is_valid() {
                error!(label = state.label(), "AHU 입구 상태가 유효하지 않습니다");
                return Err(SystemError::InvalidInlet(state.label().to_string()));
            }
        }
        self.states.insert(AhuSlot::OutsideAir, oa);
        self.states.insert(AhuSlot::ReturnAir, ra);
        Ok(())
    }

    // 입구 슬롯만 남긴다. 실패한 재계산이 이전 결과와 섞이지 않게 한다.
    fn clear_results(&mut self) {
        self.states
            .retain(|slot, _| matches!(slot, AhuSlot::OutsideAir | AhuSlot::ReturnAir));
    }

    fn mix_inlets(&mut self, oa_flow: f64, ra_flow: f64) -> Result<(AirState, f64), SystemError> {
        self.clear_results();
        let (Some(oa), Some(ra)) = (
            self.states.get(&AhuSlot::OutsideAir),
            self.states.get(&AhuSlot::ReturnAir),
        ) else {
            return Err(SystemError::MissingInlet);
        };
        let total = oa_flow + ra_flow;
        if total <= MIN_MASS_FLOW {
            return Err(SystemError::NonPositiveFlow(total));
        }
        let mixed = processes::mix_air(oa, oa_flow, ra, ra_flow)?;
        self.states.insert(AhuSlot::MixedAir, mixed.clone());
        Ok((mixed, total))
    }

    // 가습 → 팬 발열 공통 후단.
    fn finish(
        &mut self,
        current: AirState,
        humidifier: Humidifier,
        fan_heat_w: f64,
        total_flow: f64,
    ) -> Result<(), SystemError> {
        let current = match humidifier.apply(&current, total_flow)? {
            Some(humidified) => humidified,
            None => current,
        };
        self.states.insert(AhuSlot::HumidifierOut, current.clone());

        let supply = if fan_heat_w > 0.0 {
            processes::sensible_heat(&current, fan_heat_w, total_flow)?
        } else {
            current
        };
        self.states.insert(AhuSlot::SupplyAir, supply);
        Ok(())
    }

    /// 냉방 운전: 혼합 → 냉각 → (재열) → (가습) → (팬 발열)
    pub fn run_cooling_cycle(&mut self, input: &AhuCoolingInput) -> Result<(), SystemError> {
        info!("AHU 냉방 사이클 계산 시작");
        let (mixed, total) = self.mix_inlets(input.oa_mass_flow_kg_s, input.ra_mass_flow_kg_s)?;

        let coil_out = processes::cooling_coil(&mixed, input.adp_c, input.bypass_factor)?;
        self.states.insert(AhuSlot::CoolingCoilOut, coil_out.clone());

        let current = if input.reheat_w > 0.0 {
            let reheated = processes::sensible_heat(&coil_out, input.reheat_w, total)?;
            info!(reheat_w = input.reheat_w, "재열 적용");
            reheated
        } else {
            coil_out
        };
        self.states.insert(AhuSlot::HeatingCoilOut, current.clone());

        self.finish(current, input.humidifier, input.fan_heat_w, total)?;
        info!("AHU 냉방 사이클 계산 완료");
        Ok(())
    }

    /// 난방 운전: 혼합 → (냉각코일 바이패스) → 가열 → (가습) → (팬 발열)
    pub fn run_heating_cycle(&mut self, input: &AhuHeatingInput) -> Result<(), SystemError> {
        info!("AHU 난방 사이클 계산 시작");
        let (mixed, total) = self.mix_inlets(input.oa_mass_flow_kg_s, input.ra_mass_flow_kg_s)?;
        self.states.insert(AhuSlot::CoolingCoilOut, mixed.clone());

        let current = if input.heating_w > 0.0 {
            processes::sensible_heat(&mixed, input.heating_w, total)?
        } else {
            mixed
        };
        self.states.insert(AhuSlot::HeatingCoilOut, current.clone());

        self.finish(current, input.humidifier, input.fan_heat_w, total)?;
        info!("AHU 난방 사이클 계산 완료");
        Ok(())
    }

    pub fn state(&self, slot: AhuSlot) -> Option<&AirState> {
        self.states.get(&slot)
    }

    /// 유효한 상태를 프로세스 순서대로 반환한다.
    pub fn states(&self) -> Vec<(AhuSlot, &AirState)> {
        self.states
            .iter()
            .filter(|(_, s)| s.is_valid())
            .map(|(slot, s)| (*slot, s))
            .collect()
    }

    /// 차트에 그릴 두 상태점. 변화가 없는 구간이면 `None`.
    pub fn process_line(&self, start: AhuSlot, end: AhuSlot) -> Option<[&AirState; 2]> {
        let a = self.state(start).filter(|s| s.is_valid())?;
        let b = self.state(end).filter(|s| s.is_valid())?;
        if is_same_point(a, b) {
            None
        } else {
            Some([a, b])
        }
    }
}

/// 실내 공기를 재순환하는 팬코일 모델.
#[derive(Debug, Clone)]
pub struct FcuModel {
    pressure_pa: f64,
    states: BTreeMap<FcuSlot, AirState>,
}

impl FcuModel {
    pub fn new(pressure_pa: f64) -> Self {
        info!(pressure_pa, "FCU 모델 초기화");
        Self {
            pressure_pa,
            states: BTreeMap::new(),
        }
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    /// 유입 공기 조건을 설정한다.
    pub fn set_entering_air(
        &mut self,
        tdb: f64,
        rh: f64,
        label: &str,
    ) -> Result<(), SystemError> {
        self.states.clear();
        info!(label, tdb, rh, "FCU 입구 조건 설정");
        let entering = AirState::from_pair(self.pressure_pa, label, KnownPair::TdbRh { tdb, rh });
        if !entering.is_valid() {
            error!(label, "FCU 입구 상태가 유효하지 않습니다");
            return Err(SystemError::InvalidInlet(label.to_string()));
        }
        self.states.insert(FcuSlot::Entering, entering);
        Ok(())
    }

    // 이전 사이클의 코일/급기 결과를 지우고 유입 상태를 꺼낸다.
    fn entering(&mut self, mass_flow_kg_s: f64) -> Result<AirState, SystemError> {
        self.states.retain(|slot, _| *slot == FcuSlot::Entering);
        let entering = self
            .states
            .get(&FcuSlot::Entering)
            .cloned()
            .ok_or(SystemError::MissingInlet)?;
        if mass_flow_kg_s <= MIN_MASS_FLOW {
            return Err(SystemError::NonPositiveFlow(mass_flow_kg_s));
        }
        Ok(entering)
    }

    fn finish(
        &mut self,
        coil_out: AirState,
        mass_flow_kg_s: f64,
        fan_heat_w: f64,
    ) -> Result<(), SystemError> {
        self.states.insert(FcuSlot::CoilOut, coil_out.clone());
        let supply = if fan_heat_w > 0.0 {
            processes::sensible_heat(&coil_out, fan_heat_w, mass_flow_kg_s)?
        } else {
            coil_out
        };
        self.states.insert(FcuSlot::Supply, supply);
        Ok(())
    }

    /// 냉방: 유입 → 냉각코일 → (팬 발열)
    pub fn run_cooling_cycle(
        &mut self,
        mass_flow_kg_s: f64,
        adp_c: f64,
        bypass_factor: f64,
        fan_heat_w: f64,
    ) -> Result<(), SystemError> {
        info!("FCU 냉방 사이클 계산 시작");
        let entering = self.entering(mass_flow_kg_s)?;
        let coil_out = processes::cooling_coil(&entering, adp_c, bypass_factor)?;
        self.finish(coil_out, mass_flow_kg_s, fan_heat_w)?;
        info!("FCU 냉방 사이클 계산 완료");
        Ok(())
    }

    /// 난방: 유입 → 가열(현열) → (팬 발열)
    pub fn run_heating_cycle(
        &mut self,
        mass_flow_kg_s: f64,
        heating_w: f64,
        fan_heat_w: f64,
    ) -> Result<(), SystemError> {
        info!("FCU 난방 사이클 계산 시작");
        let entering = self.entering(mass_flow_kg_s)?;
        let coil_out = if heating_w > 0.0 {
            processes::sensible_heat(&entering, heating_w, mass_flow_kg_s)?
        } else {
            entering
        };
        self.finish(coil_out, mass_flow_kg_s, fan_heat_w)?;
        info!("FCU 난방 사이클 계산 완료");
        Ok(())
    }

    pub fn state(&self, slot: FcuSlot) -> Option<&AirState> {
        self.states.get(&slot)
    }

    pub fn states(&self) -> Vec<(FcuSlot, &AirState)> {
        self.states
            .iter()
            .filter(|(_, s)| s.is_valid())
            .map(|(slot, s)| (*slot, s))
            .collect()
    }

    pub fn process_line(&self, start: FcuSlot, end: FcuSlot) -> Option<[&AirState; 2]> {
        let a = self.state(start).filter(|s| s.is_valid())?;
        let b = self.state(end).filter(|s| s.is_valid())?;
        if is_same_point(a, b) {
            None
        } else {
            Some([a, b])
        }
    }
}
