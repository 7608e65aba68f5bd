//! 압력과 두 개의 기지 물성으로부터 나머지 습공기 물성을 결정한다.
//!
//! 지원하는 입력 조합은 (tdb, rh), (tdb, twb), (tdb, w), (tdb, tdp), (h, w) 다섯 가지이다.
//! 상태를 보관하지 않는 순수 함수이며 진단 로그 외의 부수효과는 없다.

use thiserror::Error;
use tracing::{debug, warn};

use super::properties::{describe_known, KnownPair, KnownProperties, PropertyName, PropertySet};
use super::psychrometrics::{self as psy, PsychroError, PsychroResult};

/// 상태 결정 실패 사유.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// 기지 물성이 정확히 두 개가 아님
    #[error("기지 물성은 정확히 두 개여야 합니다 (입력 {count}개: [{}])", join_keys(.keys))]
    InvalidInputCount {
        count: usize,
        keys: Vec<PropertyName>,
    },
    /// 지원하지 않는 두 물성 조합
    #[error("지원하지 않는 입력 조합입니다: [{}]", join_keys(.keys))]
    UnsupportedInputCombination { keys: Vec<PropertyName> },
    /// 물성 함수가 입력을 거부함
    #[error("물성 계산 실패 ({}, P={pressure_pa} Pa): {source}", describe_known(.inputs))]
    PropertyOutOfRange {
        inputs: KnownProperties,
        pressure_pa: f64,
        #[source]
        source: PsychroError,
    },
}

fn join_keys(keys: &[PropertyName]) -> String {
    keys.iter()
        .map(PropertyName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 기지 물성 목록을 조합으로 판별한 뒤 전체 물성을 계산한다.
///
/// 목록 길이가 2가 아니면 물성 함수를 호출하지 않고 `InvalidInputCount`를 반환한다.
pub fn resolve(pressure_pa: f64, known: &KnownProperties) -> Result<PropertySet, ResolveError> {
    let keys: Vec<PropertyName> = known.keys().copied().collect();
    if keys.len() != 2 {
        return Err(ResolveError::InvalidInputCount {
            count: keys.len(),
            keys,
        });
    }
    let pair =
        KnownPair::from_known(known).ok_or(ResolveError::UnsupportedInputCombination { keys })?;
    resolve_pair(pressure_pa, pair)
}

/// 이미 판별된 입력 조합으로 전체 물성을 계산한다.
pub fn resolve_pair(pressure_pa: f64, pair: KnownPair) -> Result<PropertySet, ResolveError> {
    let set = derive(pressure_pa, pair).map_err(|source| ResolveError::PropertyOutOfRange {
        inputs: pair.to_known(),
        pressure_pa,
        source,
    })?;
    debug!(?pair, pressure_pa, ?set, "습공기 상태 계산 완료");
    Ok(set)
}

fn derive(p: f64, pair: KnownPair) -> PsychroResult<PropertySet> {
    match pair {
        KnownPair::TdbRh { tdb, rh } => {
            if !(0.0..=1.0).contains(&rh) {
                // 거부하지 않고 그대로 넘긴다. 물성 함수에서 실패할 수 있다.
                warn!(rh, "상대습도가 0~1 범위를 벗어났습니다. 계산이 실패할 수 있습니다");
            }
            let w = psy::hum_ratio_from_rel_hum(tdb, rh, p)?;
            let twb = psy::t_wet_bulb_from_rel_hum(tdb, rh, p)?;
            let tdp = psy::t_dew_point_from_rel_hum(tdb, rh)?;
            let h = psy::moist_air_enthalpy(tdb, w)?;
            let v = psy::moist_air_volume(tdb, w, p)?;
            Ok(PropertySet {
                tdb,
                twb,
                rh,
                w,
                h,
                tdp,
                v,
            })
        }
        KnownPair::TdbTwb { tdb, twb } => {
            let twb = if twb > tdb {
                warn!(tdb, twb, "습구온도가 건구온도보다 높아 건구온도로 맞춥니다");
                tdb
            } else {
                twb
            };
            let rh = psy::rel_hum_from_t_wet_bulb(tdb, twb, p)?;
            let w = psy::hum_ratio_from_t_wet_bulb(tdb, twb, p)?;
            let tdp = psy::t_dew_point_from_t_wet_bulb(tdb, twb, p)?;
            let h = psy::moist_air_enthalpy(tdb, w)?;
            let v = psy::moist_air_volume(tdb, w, p)?;
            Ok(PropertySet {
                tdb,
                twb,
                rh,
                w,
                h,
                tdp,
                v,
            })
        }
        KnownPair::TdbW { tdb, w } => along_hum_ratio(tdb, w, p, None),
        KnownPair::TdbTdp { tdb, tdp } => {
            let tdp = if tdp > tdb {
                warn!(tdb, tdp, "이슬점이 건구온도보다 높아 건구온도로 맞춥니다 (포화 상태)");
                tdb
            } else {
                tdp
            };
            let w = psy::hum_ratio_from_t_dew_point(tdp, p)?;
            along_hum_ratio(tdb, w, p, Some(tdp))
        }
        KnownPair::HW { h, w } => {
            let tdb = psy::t_dry_bulb_from_enthalpy_and_hum_ratio(h, w)?;
            let set = along_hum_ratio(tdb, w, p, None)?;
            Ok(PropertySet { h, ..set })
        }
    }
}

// 건구온도와 습도비가 정해진 뒤의 공통 경로. 이슬점을 이미 알고 있으면 다시 계산하지 않는다.
fn along_hum_ratio(
    tdb: f64,
    w: f64,
    p: f64,
    known_tdp: Option<f64>,
) -> PsychroResult<PropertySet> {
    let rh = psy::rel_hum_from_hum_ratio(tdb, w, p)?;
    if rh > 1.0 {
        warn!(tdb, w, rh, "습도비가 포화 습도비를 넘습니다 (과포화)");
    }
    let twb = psy::t_wet_bulb_from_hum_ratio(tdb, w, p)?;
    let tdp = match known_tdp {
        Some(tdp) => tdp,
        None => psy::t_dew_point_from_hum_ratio(tdb, w, p)?,
    };
    let h = psy::moist_air_enthalpy(tdb, w)?;
    let v = psy::moist_air_volume(tdb, w, p)?;
    Ok(PropertySet {
        tdb,
        twb,
        rh,
        w,
        h,
        tdp,
        v,
    })
}
