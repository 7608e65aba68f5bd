use std::io::{self, Write};
use std::path::Path;

use crate::air::psychrometrics::standard_atm_pressure;
use crate::air::{AirState, KnownProperties, PropertyName};
use crate::app::{validate_pressure, AppError};
use crate::config::Config;
use crate::hvac;
use crate::i18n::{keys, Translator};
use crate::scenario::{Scenario, ScenarioReport};
use crate::units::{from_pa, to_pa, PressureUnit};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    StatePoint,
    Mixing,
    Scenario,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    println!("{}", tr.t(keys::MAIN_MENU_STATE_POINT));
    println!("{}", tr.t(keys::MAIN_MENU_MIXING));
    println!("{}", tr.t(keys::MAIN_MENU_SCENARIO));
    println!("{}", tr.t(keys::MAIN_MENU_SETTINGS));
    println!("{}", tr.t(keys::MAIN_MENU_EXIT));
    loop {
        let sel = read_line(tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::StatePoint),
            "2" => return Ok(MenuChoice::Mixing),
            "3" => return Ok(MenuChoice::Scenario),
            "4" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 상태점 계산 메뉴를 처리한다.
pub fn handle_state_point(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::STATE_HEADING));
    let state = read_state(tr, cfg, "State")?;
    print_state_table(&[(state.label(), &state)], cfg.precision);
    Ok(())
}

/// 두 흐름의 혼합 메뉴를 처리한다.
pub fn handle_mixing(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::MIXING_HEADING));
    println!("{}", tr.t(keys::MIXING_STREAM_A));
    let a = read_state(tr, cfg, "Stream 1")?;
    let flow_a = read_f64(tr, tr.t(keys::PROMPT_MASS_FLOW))?;
    println!("{}", tr.t(keys::MIXING_STREAM_B));
    let b = read_state(tr, cfg, "Stream 2")?;
    let flow_b = read_f64(tr, tr.t(keys::PROMPT_MASS_FLOW))?;
    let mixed = hvac::mix_air(&a, flow_a, &b, flow_b)?;
    print_state_table(
        &[(a.label(), &a), (b.label(), &b), (mixed.label(), &mixed)],
        cfg.precision,
    );
    Ok(())
}

/// 시나리오 파일을 읽어 실행한다.
pub fn handle_scenario(tr: &Translator, cfg: &Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SCENARIO_HEADING));
    let path = read_line(tr.t(keys::SCENARIO_PROMPT_PATH))?;
    let scenario = Scenario::load(Path::new(path.trim()))?;
    let report = scenario.run(cfg.pressure_pa)?;
    print_report(&report, cfg.precision);
    Ok(())
}

/// 설정 메뉴를 처리한다. 변경되면 config.toml에 저장한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{}", tr.t(keys::SETTINGS_CURRENT));
    println!(
        "  P = {:.3} {} ({:.0} Pa)",
        from_pa(cfg.pressure_pa, cfg.pressure_unit),
        cfg.pressure_unit.symbol(),
        cfg.pressure_pa
    );
    println!("  precision = {}", cfg.precision);
    println!("  language = {}", cfg.language);
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    let changed = match sel.trim() {
        "" => return Ok(()),
        "1" => {
            let unit_src = read_line(tr.t(keys::SETTINGS_PROMPT_PRESSURE_UNIT))?;
            let unit = if unit_src.trim().is_empty() {
                Some(cfg.pressure_unit)
            } else {
                unit_src.parse::<PressureUnit>().ok()
            };
            match unit {
                Some(unit) => {
                    let value = read_f64(tr, tr.t(keys::SETTINGS_PROMPT_PRESSURE))?;
                    set_pressure(cfg, to_pa(value, unit), Some(unit))
                }
                None => false,
            }
        }
        "2" => {
            let z = read_f64(tr, tr.t(keys::SETTINGS_PROMPT_ALTITUDE))?;
            set_pressure(cfg, standard_atm_pressure(z), None)
        }
        "3" => match read_line(tr.t(keys::SETTINGS_PROMPT_PRECISION))?
            .trim()
            .parse::<usize>()
        {
            Ok(p) if p <= 10 => {
                cfg.precision = p;
                true
            }
            _ => false,
        },
        "4" => {
            let lang = read_line(tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            match lang.trim().to_lowercase().as_str() {
                code @ ("auto" | "ko" | "en") => {
                    cfg.language = code.to_string();
                    true
                }
                _ => false,
            }
        }
        _ => false,
    };
    if changed {
        cfg.save()?;
        println!("{}", tr.t(keys::SETTINGS_SAVED));
    } else {
        println!("{}", tr.t(keys::SETTINGS_INVALID));
    }
    Ok(())
}

fn set_pressure(cfg: &mut Config, pressure_pa: f64, unit: Option<PressureUnit>) -> bool {
    match validate_pressure(pressure_pa) {
        Ok(p) => {
            cfg.pressure_pa = p;
            if let Some(unit) = unit {
                cfg.pressure_unit = unit;
            }
            true
        }
        Err(_) => false,
    }
}

/// 입력 조합을 고르고 두 값을 읽어 상태를 계산한다.
fn read_state(tr: &Translator, cfg: &Config, default_label: &str) -> Result<AirState, AppError> {
    let label = read_line(tr.t(keys::PROMPT_LABEL))?;
    let label = match label.trim() {
        "" => default_label.to_string(),
        other => other.to_string(),
    };
    let known = read_known(tr)?;
    Ok(AirState::try_new(cfg.pressure_pa, label, &known)?)
}

fn read_known(tr: &Translator) -> Result<KnownProperties, AppError> {
    use PropertyName::*;
    println!("{}", tr.t(keys::STATE_PAIR_OPTIONS));
    let names = loop {
        let sel = read_line(tr.t(keys::PROMPT_SELECT))?;
        match sel.trim() {
            "1" => break [Tdb, Rh],
            "2" => break [Tdb, Twb],
            "3" => break [Tdb, W],
            "4" => break [Tdb, Tdp],
            "5" => break [H, W],
            _ => println!("{}", tr.t(keys::INVALID_SELECTION)),
        }
    };
    let mut known = KnownProperties::new();
    for name in names {
        known.insert(name, read_property(tr, name)?);
    }
    Ok(known)
}

// 표시 단위로 읽고 SI로 환산한다.
fn read_property(tr: &Translator, name: PropertyName) -> Result<f64, AppError> {
    let (key, scale) = match name {
        PropertyName::Tdb => (keys::PROMPT_TDB, 1.0),
        PropertyName::Rh => (keys::PROMPT_RH, 0.01),
        PropertyName::Twb => (keys::PROMPT_TWB, 1.0),
        PropertyName::W => (keys::PROMPT_W, 1e-3),
        PropertyName::Tdp => (keys::PROMPT_TDP, 1.0),
        PropertyName::H => (keys::PROMPT_H, 1e3),
    };
    Ok(read_f64(tr, tr.t(key))? * scale)
}

const TABLE_COLUMNS: [(&str, &str); 7] = [
    ("tdb", "Tdb[°C]"),
    ("twb", "Twb[°C]"),
    ("rh", "RH[%]"),
    ("w", "W[g/kg]"),
    ("h", "h[kJ/kg]"),
    ("tdp", "Tdp[°C]"),
    ("v", "v[m³/kg]"),
];

/// 상태점 목록을 표로 출력한다. 무효 상태는 N/A로 채운다.
pub fn print_state_table(rows: &[(&str, &AirState)], precision: usize) {
    print!("{:<14}", "Label");
    for (_, header) in TABLE_COLUMNS {
        print!("{header:>11}");
    }
    println!();
    for (name, state) in rows {
        print!("{name:<14}");
        for (key, _) in TABLE_COLUMNS {
            print!("{:>11}", state.display(key, precision));
        }
        println!();
    }
}

/// 시나리오 결과를 출력한다.
pub fn print_report(report: &ScenarioReport, precision: usize) {
    println!("\n[{}] P = {:.0} Pa", report.name, report.pressure_pa);
    let rows: Vec<(&str, &AirState)> = report
        .states
        .iter()
        .map(|(slot, state)| (*slot, state))
        .collect();
    print_state_table(&rows, precision);
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
