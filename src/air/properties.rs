use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 상태 결정에 입력으로 쓸 수 있는 물성 이름.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyName {
    /// 건구온도 [°C]
    Tdb,
    /// 상대습도 [0~1]
    Rh,
    /// 습구온도 [°C]
    Twb,
    /// 습도비 [kg/kg]
    W,
    /// 이슬점 [°C]
    Tdp,
    /// 비엔탈피 [J/kg]
    H,
}

impl PropertyName {
    pub const ALL: [PropertyName; 6] = [
        PropertyName::Tdb,
        PropertyName::Rh,
        PropertyName::Twb,
        PropertyName::W,
        PropertyName::Tdp,
        PropertyName::H,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyName::Tdb => "tdb",
            PropertyName::Rh => "rh",
            PropertyName::Twb => "twb",
            PropertyName::W => "w",
            PropertyName::Tdp => "tdp",
            PropertyName::H => "h",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyName::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("알 수 없는 물성: {s}"))
    }
}

/// 이름 → 값 으로 전달되는 기지 물성 목록.
pub type KnownProperties = BTreeMap<PropertyName, f64>;

/// 기지 물성 목록을 `tdb=25, rh=0.5` 형태로 표시한다. 로그 메시지용.
pub fn describe_known(known: &KnownProperties) -> String {
    known
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 지원하는 다섯 가지 입력 조합.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnownPair {
    TdbRh { tdb: f64, rh: f64 },
    TdbTwb { tdb: f64, twb: f64 },
    TdbW { tdb: f64, w: f64 },
    TdbTdp { tdb: f64, tdp: f64 },
    HW { h: f64, w: f64 },
}

impl KnownPair {
    /// 정확히 두 개의 물성이 들어있는 목록에서 조합을 판별한다.
    /// 지원하지 않는 조합이면 `None`.
    pub fn from_known(known: &KnownProperties) -> Option<Self> {
        use PropertyName::*;
        if known.len() != 2 {
            return None;
        }
        let get = |name: PropertyName| known.get(&name).copied();
        let pair = match (get(Tdb), get(Rh), get(Twb), get(W), get(Tdp), get(H)) {
            (Some(tdb), Some(rh), None, None, None, None) => KnownPair::TdbRh { tdb, rh },
            (Some(tdb), None, Some(twb), None, None, None) => KnownPair::TdbTwb { tdb, twb },
            (Some(tdb), None, None, Some(w), None, None) => KnownPair::TdbW { tdb, w },
            (Some(tdb), None, None, None, Some(tdp), None) => KnownPair::TdbTdp { tdb, tdp },
            (None, None, None, Some(w), None, Some(h)) => KnownPair::HW { h, w },
            _ => return None,
        };
        Some(pair)
    }

    /// 조합을 다시 이름 → 값 목록으로 펼친다.
    pub fn to_known(self) -> KnownProperties {
        let entries = match self {
            KnownPair::TdbRh { tdb, rh } => [(PropertyName::Tdb, tdb), (PropertyName::Rh, rh)],
            KnownPair::TdbTwb { tdb, twb } => [(PropertyName::Tdb, tdb), (PropertyName::Twb, twb)],
            KnownPair::TdbW { tdb, w } => [(PropertyName::Tdb, tdb), (PropertyName::W, w)],
            KnownPair::TdbTdp { tdb, tdp } => [(PropertyName::Tdb, tdb), (PropertyName::Tdp, tdp)],
            KnownPair::HW { h, w } => [(PropertyName::H, h), (PropertyName::W, w)],
        };
        entries.into_iter().collect()
    }
}

impl From<KnownPair> for KnownProperties {
    fn from(pair: KnownPair) -> Self {
        pair.to_known()
    }
}

/// 한 상태점의 습공기 물성 일곱 가지. 항상 전부 채워진 상태로만 만들어진다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    /// 건구온도 [°C]
    pub tdb: f64,
    /// 습구온도 [°C]
    pub twb: f64,
    /// 상대습도 [0~1]
    pub rh: f64,
    /// 습도비 [kg수증기/kg건공기]
    pub w: f64,
    /// 비엔탈피 [J/kg건공기]
    pub h: f64,
    /// 이슬점 [°C]
    pub tdp: f64,
    /// 비체적 [m³/kg건공기]
    pub v: f64,
}
