use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::units::PressureUnit;

/// 설정 파일 기본 경로
pub const CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 기본 대기압 [Pa, 절대]
    pub pressure_pa: f64,
    /// 압력 입력/표시 단위
    pub pressure_unit: PressureUnit,
    /// 표시 소수 자릿수
    pub precision: usize,
    /// 언어 코드 (auto/ko/en)
    pub language: String,
    /// 로그 레벨 (error/warn/info/debug/trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pressure_pa: 101_325.0,
            pressure_unit: PressureUnit::KiloPascal,
            precision: 1,
            language: "auto".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_default_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로의 설정을 로드한다. 파일이 없으면 기본 설정을 저장한 뒤 반환한다.
pub fn load_or_default_from(path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let cfg: Config = toml::from_str(&content)?;
            debug!(path = %path.display(), ?cfg, "설정 로드");
            Ok(cfg)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "설정 파일이 없어 기본값으로 생성합니다");
            let cfg = Config::default();
            write_config(&cfg, path)?;
            Ok(cfg)
        }
        Err(err) => Err(err.into()),
    }
}

fn write_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        write_config(self, Path::new(CONFIG_FILE))
    }

    /// 설정을 지정한 경로에 저장한다.
    pub fn save_to(&self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        write_config(self, &path.into())
    }
}
