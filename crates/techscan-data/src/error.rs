//! 데이터 수집 계층 오류 타입.

use thiserror::Error;

use techscan_core::TechScanError;

/// 데이터 소스 관련 오류.
///
/// 수집 계층의 실패 표시입니다. 파이프라인은 이 오류를 받으면 지표 계산 전에
/// 중단하며, 재시도는 하지 않습니다.
#[derive(Debug, Error)]
pub enum SourceError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 파싱 오류
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 소스가 행을 하나도 반환하지 않음
    #[error("Source returned no rows: {0}")]
    Empty(String),

    /// 외부 제공자 실패
    #[error("Fetch error: {0}")]
    FetchError(String),
}

impl From<SourceError> for TechScanError {
    fn from(err: SourceError) -> Self {
        TechScanError::Source(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// CSV 쓰기 오류를 파이프라인 에러로 변환합니다.
pub(crate) fn csv_write_error(err: csv::Error) -> TechScanError {
    TechScanError::Io(format!("CSV write error: {}", err))
}
