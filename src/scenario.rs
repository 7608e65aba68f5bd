//! TOML로 기술된 AHU/FCU 운전 시나리오를 읽어 계산한다.
//!
//! ```toml
//! name = "여름 설계"
//! pressure_pa = 101325.0
//!
//! [ahu]
//! outside = { tdb = 33.0, rh = 0.6 }
//! return_air = { tdb = 24.0, rh = 0.5 }
//!
//! [ahu.cooling]
//! oa_mass_flow_kg_s = 0.5
//! ra_mass_flow_kg_s = 1.5
//! adp_c = 11.0
//! bypass_factor = 0.15
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::air::AirState;
use crate::hvac::{AhuCoolingInput, AhuHeatingInput, AhuModel, FcuModel, SystemError};

/// 시나리오 로드/계산 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("시나리오 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// 구성이 잘못됨 (시스템/운전 모드가 없거나 둘 이상)
    #[error("잘못된 시나리오: {0}")]
    Invalid(&'static str),
    #[error(transparent)]
    System(#[from] SystemError),
}

/// 입구 공기 조건 (건구온도 °C, 상대습도 0~1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InletCondition {
    pub tdb: f64,
    pub rh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AhuScenario {
    pub outside: InletCondition,
    pub return_air: InletCondition,
    pub cooling: Option<AhuCoolingInput>,
    pub heating: Option<AhuHeatingInput>,
}

/// FCU 냉방 운전 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcuCoolingInput {
    pub mass_flow_kg_s: f64,
    pub adp_c: f64,
    pub bypass_factor: f64,
    #[serde(default)]
    pub fan_heat_w: f64,
}

/// FCU 난방 운전 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcuHeatingInput {
    pub mass_flow_kg_s: f64,
    pub heating_w: f64,
    #[serde(default)]
    pub fan_heat_w: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcuScenario {
    pub entering: InletCondition,
    pub cooling: Option<FcuCoolingInput>,
    pub heating: Option<FcuHeatingInput>,
}

/// 시나리오 파일 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// 생략하면 설정의 기본 압력을 쓴다.
    pub pressure_pa: Option<f64>,
    pub ahu: Option<AhuScenario>,
    pub fcu: Option<FcuScenario>,
}

/// 시나리오 계산 결과. 슬롯 이름과 상태를 프로세스 순서로 담는다.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub pressure_pa: f64,
    pub states: Vec<(&'static str, AirState)>,
}

impl Scenario {
    pub fn from_toml(src: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// 시나리오를 계산한다. `default_pressure_pa`는 파일에 압력이 없을 때 쓴다.
    pub fn run(&self, default_pressure_pa: f64) -> Result<ScenarioReport, ScenarioError> {
        let pressure_pa = self.pressure_pa.unwrap_or(default_pressure_pa);
        info!(name = %self.name, pressure_pa, "시나리오 계산 시작");
        let states = match (&self.ahu, &self.fcu) {
            (Some(ahu), None) => run_ahu(ahu, pressure_pa)?,
            (None, Some(fcu)) => run_fcu(fcu, pressure_pa)?,
            (None, None) => return Err(ScenarioError::Invalid("[ahu] 또는 [fcu] 가 필요합니다")),
            (Some(_), Some(_)) => {
                return Err(ScenarioError::Invalid("[ahu] 와 [fcu] 는 함께 쓸 수 없습니다"))
            }
        };
        Ok(ScenarioReport {
            name: self.name.clone(),
            pressure_pa,
            states,
        })
    }
}

fn run_ahu(
    ahu: &AhuScenario,
    pressure_pa: f64,
) -> Result<Vec<(&'static str, AirState)>, ScenarioError> {
    let mut model = AhuModel::new(pressure_pa);
    model.set_inlet_conditions(
        ahu.outside.tdb,
        ahu.outside.rh,
        ahu.return_air.tdb,
        ahu.return_air.rh,
    )?;
    match (&ahu.cooling, &ahu.heating) {
        (Some(cooling), None) => model.run_cooling_cycle(cooling)?,
        (None, Some(heating)) => model.run_heating_cycle(heating)?,
        _ => {
            return Err(ScenarioError::Invalid(
                "[ahu.cooling] 과 [ahu.heating] 중 정확히 하나가 필요합니다",
            ))
        }
    }
    Ok(model
        .states()
        .into_iter()
        .map(|(slot, state)| (slot.as_str(), state.clone()))
        .collect())
}

fn run_fcu(
    fcu: &FcuScenario,
    pressure_pa: f64,
) -> Result<Vec<(&'static str, AirState)>, ScenarioError> {
    let mut model = FcuModel::new(pressure_pa);
    model.set_entering_air(fcu.entering.tdb, fcu.entering.rh, "Entering")?;
    match (&fcu.cooling, &fcu.heating) {
        (Some(c), None) => {
            model.run_cooling_cycle(c.mass_flow_kg_s, c.adp_c, c.bypass_factor, c.fan_heat_w)?
        }
        (None, Some(h)) => model.run_heating_cycle(h.mass_flow_kg_s, h.heating_w, h.fan_heat_w)?,
        _ => {
            return Err(ScenarioError::Invalid(
                "[fcu.cooling] 과 [fcu.heating] 중 정확히 하나가 필요합니다",
            ))
        }
    }
    Ok(model
        .states()
        .into_iter()
        .map(|(slot, state)| (slot.as_str(), state.clone()))
        .collect())
}
