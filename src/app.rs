use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::air::psychrometrics::standard_atm_pressure;
use crate::air::{AirState, KnownProperties, PropertyName, ResolveError, StateSummary};
use crate::config::{Config, ConfigError};
use crate::hvac::{ProcessError, SystemError};
use crate::i18n::{self, Translator};
use crate::scenario::{Scenario, ScenarioError};
use crate::ui_cli::{self, MenuChoice};
use crate::units::{to_pa, PressureUnit};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 상태점 계산 오류
    #[error("상태 계산 오류: {0}")]
    Resolve(#[from] ResolveError),
    /// 공조 프로세스 계산 오류
    #[error("프로세스 계산 오류: {0}")]
    Process(#[from] ProcessError),
    /// AHU/FCU 계산 오류
    #[error("시스템 계산 오류: {0}")]
    System(#[from] SystemError),
    /// 시나리오 로드/계산 오류
    #[error("시나리오 오류: {0}")]
    Scenario(#[from] ScenarioError),
    /// 결과 직렬화 오류
    #[error("출력 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// 사용자 입력 오류
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 명령행에서 덮어쓴 대기압. 설정 파일에는 저장하지 않는다.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureOverride {
    pub value: Option<f64>,
    pub unit: Option<PressureUnit>,
    pub altitude_m: Option<f64>,
}

impl PressureOverride {
    /// 적용할 대기압 [Pa]. 고도가 주어지면 표준대기, 값이 주어지면 단위 환산,
    /// 둘 다 없으면 설정값을 쓴다.
    pub fn resolve(&self, cfg: &Config) -> Result<f64, AppError> {
        let pressure_pa = match (self.altitude_m, self.value) {
            (Some(z), _) => standard_atm_pressure(z),
            (None, Some(v)) => to_pa(v, self.unit.unwrap_or(cfg.pressure_unit)),
            (None, None) => cfg.pressure_pa,
        };
        validate_pressure(pressure_pa)
    }
}

pub(crate) fn validate_pressure(pressure_pa: f64) -> Result<f64, AppError> {
    if pressure_pa.is_finite() && pressure_pa > 0.0 {
        Ok(pressure_pa)
    } else {
        Err(AppError::InvalidInput(format!(
            "대기압은 0보다 커야 합니다: {pressure_pa} Pa"
        )))
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve a single state point from two known properties
    State(StateArgs),
    /// Run an AHU/FCU scenario file
    Run {
        /// Path to the scenario TOML file
        path: PathBuf,
        /// Decimal places (defaults to the configured precision)
        #[arg(long)]
        precision: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Toml,
}

/// 상태점 입력. 값은 표시 단위(°C, %, g/kg, kJ/kg)로 받는다.
#[derive(Debug, Clone, Default, Args)]
pub struct StateArgs {
    /// Dry-bulb temperature [°C]
    #[arg(long, allow_hyphen_values = true)]
    pub tdb: Option<f64>,
    /// Relative humidity [%]
    #[arg(long)]
    pub rh: Option<f64>,
    /// Wet-bulb temperature [°C]
    #[arg(long, allow_hyphen_values = true)]
    pub twb: Option<f64>,
    /// Humidity ratio [g/kg]
    #[arg(long)]
    pub w: Option<f64>,
    /// Dew-point temperature [°C]
    #[arg(long, allow_hyphen_values = true)]
    pub tdp: Option<f64>,
    /// Specific enthalpy [kJ/kg dry air]
    #[arg(long, allow_hyphen_values = true)]
    pub h: Option<f64>,
    #[arg(long, default_value = "State")]
    pub label: String,
    /// Decimal places (defaults to the configured precision)
    #[arg(long)]
    pub precision: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl StateArgs {
    /// 주어진 값만 모아 SI 기지 물성 목록으로 바꾼다.
    pub fn known_properties(&self) -> KnownProperties {
        [
            (PropertyName::Tdb, self.tdb),
            (PropertyName::Rh, self.rh.map(|rh| rh / 100.0)),
            (PropertyName::Twb, self.twb),
            (PropertyName::W, self.w.map(|w| w / 1000.0)),
            (PropertyName::Tdp, self.tdp),
            (PropertyName::H, self.h.map(|h| h * 1000.0)),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

/// 명령이 있으면 한 번 실행하고, 없으면 대화형 메뉴 루프를 실행한다.
pub fn run(
    config: &mut Config,
    tr: &Translator,
    pressure: PressureOverride,
    command: Option<Command>,
) -> Result<(), AppError> {
    let pressure_pa = pressure.resolve(config)?;
    match command {
        Some(Command::State(args)) => cmd_state(config, pressure_pa, &args),
        Some(Command::Run {
            path,
            precision,
            format,
        }) => cmd_run(
            &path,
            pressure_pa,
            precision.unwrap_or(config.precision),
            format,
        ),
        None => {
            config.pressure_pa = pressure_pa;
            run_interactive(config, tr)
        }
    }
}

fn cmd_state(config: &Config, pressure_pa: f64, args: &StateArgs) -> Result<(), AppError> {
    let state = AirState::try_new(pressure_pa, args.label.clone(), &args.known_properties())?;
    match args.format {
        OutputFormat::Table => {
            let precision = args.precision.unwrap_or(config.precision);
            ui_cli::print_state_table(&[(state.label(), &state)], precision);
        }
        OutputFormat::Toml => print!("{}", toml::to_string_pretty(&state.to_summary())?),
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    name: &'a str,
    pressure_pa: f64,
    states: Vec<StateSummary>,
}

fn cmd_run(
    path: &Path,
    pressure_pa: f64,
    precision: usize,
    format: OutputFormat,
) -> Result<(), AppError> {
    let scenario = Scenario::load(path)?;
    let report = scenario.run(pressure_pa)?;
    info!(states = report.states.len(), "시나리오 계산 완료");
    match format {
        OutputFormat::Table => ui_cli::print_report(&report, precision),
        OutputFormat::Toml => {
            let out = ReportOutput {
                name: &report.name,
                pressure_pa: report.pressure_pa,
                states: report.states.iter().map(|(_, s)| s.to_summary()).collect(),
            };
            print!("{}", toml::to_string_pretty(&out)?);
        }
    }
    Ok(())
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
fn run_interactive(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    loop {
        let result = match ui_cli::main_menu(tr)? {
            MenuChoice::StatePoint => ui_cli::handle_state_point(tr, config),
            MenuChoice::Mixing => ui_cli::handle_mixing(tr, config),
            MenuChoice::Scenario => ui_cli::handle_scenario(tr, config),
            MenuChoice::Settings => ui_cli::handle_settings(tr, config),
            MenuChoice::Exit => {
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        };
        // 입출력 오류만 루프를 끝내고 계산 오류는 출력 후 메뉴로 돌아간다.
        match result {
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(err) => println!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX)),
            Ok(()) => {}
        }
    }
    Ok(())
}
