//! 지표 파이프라인의 에러 타입.
//!
//! 치명적인 에러(입력 형식, 내부 일관성, 데이터 소스 실패)만 이 타입으로 전파됩니다.
//! 워밍업 부족이나 KDJ 0-범위 윈도우 같은 soft 조건은 에러가 아니라
//! "미계산(None)" 값으로만 드러납니다.

use thiserror::Error;

/// 핵심 파이프라인 에러.
#[derive(Debug, Error)]
pub enum TechScanError {
    /// 입력 패널 형식 에러 (필수 컬럼 누락, 날짜/숫자 파싱 실패, 중복 키)
    #[error("형식 에러: {0}")]
    Format(String),

    /// 지표 프레임과 패널 간 키 불일치 (프로그래밍 결함)
    #[error("일관성 에러: {0}")]
    Consistency(String),

    /// 데이터 수집 소스 실패
    #[error("데이터 소스 에러: {0}")]
    Source(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력 (예: 시작일 > 종료일)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type TechScanResult<T> = Result<T, TechScanError>;

impl TechScanError {
    /// 실행 전체를 중단해야 하는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TechScanError::Format(_) | TechScanError::Consistency(_) | TechScanError::Source(_)
        )
    }

    /// 내부 결함(사용자 입력 문제가 아님)인지 확인합니다.
    pub fn is_defect(&self) -> bool {
        matches!(self, TechScanError::Consistency(_))
    }
}

impl From<std::io::Error> for TechScanError {
    fn from(err: std::io::Error) -> Self {
        TechScanError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TechScanError {
    fn from(err: serde_json::Error) -> Self {
        TechScanError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for TechScanError {
    fn from(err: config::ConfigError) -> Self {
        TechScanError::Config(err.to_string())
    }
}
