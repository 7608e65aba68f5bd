use std::fmt;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::properties::{describe_known, KnownPair, KnownProperties, PropertySet};
use super::resolver::{self, ResolveError};

/// 값이 없거나 상태가 유효하지 않을 때 표시하는 문자열.
pub const NOT_AVAILABLE: &str = "N/A";

/// 한 상태점의 습공기 상태. 압력과 라벨은 생성 시 고정되고,
/// 물성은 `update`를 통해서만 다시 계산된다.
#[derive(Debug, Clone, PartialEq)]
pub struct AirState {
    label: String,
    pressure_pa: f64,
    props: Option<PropertySet>,
}

impl AirState {
    /// 압력·라벨·기지 물성으로 상태를 만든다. 계산에 실패해도 패닉하지 않고
    /// 물성이 비어 있는(무효) 상태로 남는다.
    pub fn new(pressure_pa: f64, label: impl Into<String>, known: &KnownProperties) -> Self {
        let mut state = Self::empty(pressure_pa, label);
        state.update(known);
        state
    }

    /// 판별된 입력 조합으로 상태를 만든다.
    pub fn from_pair(pressure_pa: f64, label: impl Into<String>, pair: KnownPair) -> Self {
        Self::new(pressure_pa, label, &pair.to_known())
    }

    /// `new`와 같지만 실패 시 무효 상태 대신 실패 사유를 돌려준다.
    pub fn try_new(
        pressure_pa: f64,
        label: impl Into<String>,
        known: &KnownProperties,
    ) -> Result<Self, ResolveError> {
        let props = resolver::resolve(pressure_pa, known)?;
        Ok(Self {
            label: label.into(),
            pressure_pa,
            props: Some(props),
        })
    }

    fn empty(pressure_pa: f64, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pressure_pa,
            props: None,
        }
    }

    /// 저장된 압력과 새 기지 물성으로 상태를 다시 계산한다.
    ///
    /// 성공하면 물성 전체를 교체하고 `true`, 실패하면(물성 개수 오류 포함) 물성을
    /// 모두 비우고 `false`를 반환한다.
    pub fn update(&mut self, known: &KnownProperties) -> bool {
        if known.is_empty() {
            warn!(label = %self.label, "기지 물성 없이 상태 갱신이 호출되었습니다");
        } else {
            info!(
                label = %self.label,
                known = %describe_known(known),
                pressure_pa = self.pressure_pa,
                "습공기 상태 갱신"
            );
        }
        match resolver::resolve(self.pressure_pa, known) {
            Ok(props) => {
                self.props = Some(props);
                debug!(state = %self, "상태 갱신 성공");
                true
            }
            Err(err) => {
                error!(label = %self.label, error = %err, "습공기 상태 계산 실패");
                self.invalidate();
                false
            }
        }
    }

    /// 판별된 입력 조합으로 상태를 다시 계산한다.
    pub fn update_pair(&mut self, pair: KnownPair) -> bool {
        self.update(&pair.to_known())
    }

    fn invalidate(&mut self) {
        self.props = None;
    }

    /// 건구·습구온도와 상대습도가 모두 계산되어 있으면 유효하다.
    pub fn is_valid(&self) -> bool {
        self.props.is_some()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    pub fn properties(&self) -> Option<&PropertySet> {
        self.props.as_ref()
    }

    pub fn tdb(&self) -> Option<f64> {
        self.props.map(|p| p.tdb)
    }

    pub fn twb(&self) -> Option<f64> {
        self.props.map(|p| p.twb)
    }

    pub fn rh(&self) -> Option<f64> {
        self.props.map(|p| p.rh)
    }

    pub fn w(&self) -> Option<f64> {
        self.props.map(|p| p.w)
    }

    pub fn h(&self) -> Option<f64> {
        self.props.map(|p| p.h)
    }

    pub fn tdp(&self) -> Option<f64> {
        self.props.map(|p| p.tdp)
    }

    pub fn v(&self) -> Option<f64> {
        self.props.map(|p| p.v)
    }

    /// 표/차트 출력용 요약. 환산 필드는 단순 배율 환산값이다.
    pub fn to_summary(&self) -> StateSummary {
        StateSummary {
            label: self.label.clone(),
            pressure_pa: self.pressure_pa,
            tdb_c: self.tdb(),
            twb_c: self.twb(),
            rh_frac: self.rh(),
            rh_percent: self.rh().map(|rh| rh * 100.0),
            w_kg_kg: self.w(),
            w_g_kg: self.w().map(|w| w * 1000.0),
            h_j_kg: self.h(),
            h_kj_kg: self.h().map(|h| h / 1000.0),
            tdp_c: self.tdp(),
            v_m3_kg: self.v(),
            is_valid: self.is_valid(),
        }
    }

    /// 물성 하나를 표시용 문자열로 만든다.
    ///
    /// 짧은 이름(`tdb`, `rh`, `w`, `h`, `v` ...)은 표시 단위(°C, %, g/kg, kJ/kg, m³/kg)로
    /// 환산된다. g/kg는 한 자리, m³/kg는 두 자리 더 표시한다.
    /// 상태가 무효이거나 알 수 없는 이름이면 `N/A`.
    pub fn display(&self, key: &str, precision: usize) -> String {
        if !self.is_valid() {
            return NOT_AVAILABLE.to_string();
        }
        let Some((field, extra_digits)) = display_field(key) else {
            return NOT_AVAILABLE.to_string();
        };
        match self.to_summary().get(field) {
            Some(value) => format!("{value:.prec$}", prec = precision + extra_digits),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

// 표시 키 → (요약 필드, 추가 소수 자릿수)
fn display_field(key: &str) -> Option<(&'static str, usize)> {
    let field = match key.trim() {
        "tdb" | "tdb_c" => ("tdb_c", 0),
        "twb" | "twb_c" => ("twb_c", 0),
        "tdp" | "tdp_c" => ("tdp_c", 0),
        "rh" | "rh_percent" => ("rh_percent", 0),
        "w" | "w_g_kg" => ("w_g_kg", 1),
        "h" | "h_kj_kg" => ("h_kj_kg", 0),
        "h_j_kg" => ("h_j_kg", 0),
        "v" | "v_m3_kg" => ("v_m3_kg", 2),
        "pressure" | "pressure_pa" => ("pressure_pa", 0),
        _ => return None,
    };
    Some(field)
}

impl fmt::Display for AirState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.props {
            None => write!(f, "AirState '{}' (무효/미계산)", self.label),
            Some(p) => write!(
                f,
                "AirState '{}': Tdb={:.1}°C, RH={:.1}%, W={:.2} g/kg, h={:.1} kJ/kg, \
                 Twb={:.1}°C, Tdp={:.1}°C, v={:.3} m³/kg",
                self.label,
                p.tdb,
                p.rh * 100.0,
                p.w * 1000.0,
                p.h / 1000.0,
                p.twb,
                p.tdp,
                p.v
            ),
        }
    }
}

/// 상태점 요약. 표/차트 출력 계층이 소비하는 필드 이름과 단위는 고정이다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub label: String,
    pub pressure_pa: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdb_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twb_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh_frac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rh_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w_kg_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w_g_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_j_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h_kj_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdp_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_m3_kg: Option<f64>,
    pub is_valid: bool,
}

impl StateSummary {
    /// 요약 필드를 이름으로 조회한다. 숫자가 아닌 필드(label, is_valid)는 `None`.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "pressure_pa" => Some(self.pressure_pa),
            "tdb_c" => self.tdb_c,
            "twb_c" => self.twb_c,
            "rh_frac" => self.rh_frac,
            "rh_percent" => self.rh_percent,
            "w_kg_kg" => self.w_kg_kg,
            "w_g_kg" => self.w_g_kg,
            "h_j_kg" => self.h_j_kg,
            "h_kj_kg" => self.h_kj_kg,
            "tdp_c" => self.tdp_c,
            "v_m3_kg" => self.v_m3_kg,
            _ => None,
        }
    }
}
