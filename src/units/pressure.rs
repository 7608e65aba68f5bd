use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// 대기압(절대) 단위. 습공기 계산은 항상 절대압을 쓰므로 게이지 단위는 두지 않는다.
/// 내부 기준은 Pa이다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PressureUnit {
    Pa,
    #[serde(rename = "kpa")]
    #[value(name = "kpa")]
    KiloPascal,
    #[serde(rename = "mbar")]
    #[value(name = "mbar")]
    MilliBar,
    #[serde(rename = "bar")]
    #[value(name = "bar")]
    BarA,
    #[serde(rename = "psi")]
    #[value(name = "psi")]
    PsiA,
    Atm,
    #[serde(rename = "mmhg")]
    #[value(name = "mmhg")]
    MmHg,
}

const PA_PER_BAR: f64 = 100_000.0;
const PA_PER_ATM: f64 = 101_325.0;
const PA_PER_PSI: f64 = 6_894.757;
const PA_PER_MMHG: f64 = 133.322_4;

/// 주어진 절대압을 Pa로 변환한다.
pub fn to_pa(value: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Pa => value,
        PressureUnit::KiloPascal => value * 1000.0,
        PressureUnit::MilliBar => value * 100.0,
        PressureUnit::BarA => value * PA_PER_BAR,
        PressureUnit::PsiA => value * PA_PER_PSI,
        PressureUnit::Atm => value * PA_PER_ATM,
        PressureUnit::MmHg => value * PA_PER_MMHG,
    }
}

/// Pa 값을 원하는 단위로 변환한다.
pub fn from_pa(value_pa: f64, unit: PressureUnit) -> f64 {
    match unit {
        PressureUnit::Pa => value_pa,
        PressureUnit::KiloPascal => value_pa / 1000.0,
        PressureUnit::MilliBar => value_pa / 100.0,
        PressureUnit::BarA => value_pa / PA_PER_BAR,
        PressureUnit::PsiA => value_pa / PA_PER_PSI,
        PressureUnit::Atm => value_pa / PA_PER_ATM,
        PressureUnit::MmHg => value_pa / PA_PER_MMHG,
    }
}

impl PressureUnit {
    /// 표시용 단위 기호.
    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::Pa => "Pa",
            PressureUnit::KiloPascal => "kPa",
            PressureUnit::MilliBar => "mbar",
            PressureUnit::BarA => "bar(a)",
            PressureUnit::PsiA => "psia",
            PressureUnit::Atm => "atm",
            PressureUnit::MmHg => "mmHg",
        }
    }
}

/// 압력을 원하는 단위로 변환한다.
pub fn convert_pressure(value: f64, from: PressureUnit, to: PressureUnit) -> f64 {
    from_pa(to_pa(value, from), to)
}

impl FromStr for PressureUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pa" | "pascal" => Ok(PressureUnit::Pa),
            "kpa" | "kilopascal" => Ok(PressureUnit::KiloPascal),
            "mbar" | "millibar" | "hpa" => Ok(PressureUnit::MilliBar),
            "bar" | "bara" => Ok(PressureUnit::BarA),
            "psi" | "psia" => Ok(PressureUnit::PsiA),
            "atm" => Ok(PressureUnit::Atm),
            "mmhg" | "torr" => Ok(PressureUnit::MmHg),
            _ => Err(format!("알 수 없는 압력 단위: {s}")),
        }
    }
}
