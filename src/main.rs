use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use psychro_toolbox::app::{self, Command, PressureOverride};
use psychro_toolbox::units::PressureUnit;
use psychro_toolbox::{config, i18n};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "psychro_toolbox")]
#[command(about = "Psychrometric state point and AHU/FCU process calculator", long_about = None)]
struct Cli {
    /// UI language (auto/ko/en)
    #[arg(long, global = true)]
    lang: Option<String>,
    /// Barometric pressure, in --pressure-unit
    #[arg(long, global = true, conflicts_with = "altitude")]
    pressure: Option<f64>,
    /// Unit for --pressure (defaults to the configured unit)
    #[arg(long, global = true, value_enum)]
    pressure_unit: Option<PressureUnit>,
    /// Site altitude [m]; pressure follows the standard atmosphere
    #[arg(long, global = true)]
    altitude: Option<f64>,
    /// Log level written to stderr (off/error/warn/info/debug/trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config.toml: {err}");
            config::Config::default()
        }
    };

    let level_src = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    let level = level_src.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    let lang = i18n::resolve_language(cli.lang.as_deref(), &cfg.language);
    let tr = i18n::Translator::with_pack_dir(lang, Path::new(i18n::PACK_DIR));

    let pressure = PressureOverride {
        value: cli.pressure,
        unit: cli.pressure_unit,
        altitude_m: cli.altitude,
    };
    match app::run(&mut cfg, &tr, pressure, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}
