//! 습공기 물성 계산 모듈 모음.
//! 물성 함수(psychrometrics), 상태 결정(resolver), 상태점 레코드(air_state)로 구성한다.

pub mod air_state;
pub mod properties;
pub mod psychrometrics;
pub mod resolver;

pub use air_state::{AirState, StateSummary, NOT_AVAILABLE};
pub use properties::{KnownPair, KnownProperties, PropertyName, PropertySet};
pub use resolver::{resolve, resolve_pair, ResolveError};
