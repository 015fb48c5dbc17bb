//! # TechScan Core
//!
//! 기술적 지표 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 레코드 (`Bar`) 및 가격 필드
//! - 지표 세트 (`IndicatorSet`) 및 지표 종류
//! - 추세 라벨 / 매매 신호 분류 타입
//! - 설정 관리
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
