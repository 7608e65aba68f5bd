//! 습공기 상태 계산 로직을 라이브러리로 분리하여 CLI 뿐 아니라 다른 프런트엔드에서도 쓰게 한다.

pub mod air;
pub mod app;
pub mod config;
pub mod hvac;
pub mod i18n;
pub mod scenario;
pub mod ui_cli;
pub mod units;
