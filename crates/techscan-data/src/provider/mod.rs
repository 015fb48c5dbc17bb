//! 데이터 Provider 모듈.
//!
//! 파이프라인은 원시 패널을 `PanelSource`를 통해서만 받습니다.
//!
//! - `CsvPanelSource`: 로컬 CSV 파일
//! - `InMemoryPanelSource`: 메모리 테이블 (테스트, 임베딩용)

pub mod file;

pub use file::CsvPanelSource;

use async_trait::async_trait;

use crate::error::{Result, SourceError};
use crate::table::RawTable;

/// 원시 패널 공급자.
///
/// 한 번의 `fetch`는 14개 필수 컬럼을 가진 테이블 하나를 반환합니다.
/// 실패 시 `SourceError`를 반환하며 부분 결과는 없습니다.
#[async_trait]
pub trait PanelSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 원시 패널을 가져옵니다.
    async fn fetch(&self) -> Result<RawTable>;
}

/// 메모리에 보관된 테이블을 반환하는 소스.
pub struct InMemoryPanelSource {
    name: String,
    outcome: std::result::Result<RawTable, String>,
}

impl InMemoryPanelSource {
    /// 테이블을 반환하는 소스를 생성합니다.
    pub fn new(table: RawTable) -> Self {
        Self {
            name: "memory".to_string(),
            outcome: Ok(table),
        }
    }

    /// 항상 실패하는 소스를 생성합니다.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            name: "memory".to_string(),
            outcome: Err(message.into()),
        }
    }

    /// 이름을 지정합니다.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl PanelSource for InMemoryPanelSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<RawTable> {
        match &self.outcome {
            Ok(table) if table.is_empty() => Err(SourceError::Empty(self.name.clone())),
            Ok(table) => Ok(table.clone()),
            Err(message) => Err(SourceError::FetchError(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_source_returns_table() {
        let table = RawTable::new(
            vec!["date".to_string()],
            vec![vec!["2025-05-06".to_string()]],
        );
        let source = InMemoryPanelSource::new(table.clone()).with_name("fixture");

        assert_eq!(source.name(), "fixture");
        assert_eq!(source.fetch().await.unwrap(), table);
    }

    #[tokio::test]
    async fn test_empty_table_is_error() {
        let source = InMemoryPanelSource::new(RawTable::default());
        assert!(matches!(source.fetch().await, Err(SourceError::Empty(_))));
    }

    #[tokio::test]
    async fn test_failing_source() {
        let source = InMemoryPanelSource::failing("network down");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::FetchError(msg) if msg == "network down"));
    }
}
