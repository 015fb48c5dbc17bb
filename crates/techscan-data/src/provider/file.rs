//! 로컬 CSV 파일 소스.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::PanelSource;
use crate::error::{Result, SourceError};
use crate::table::RawTable;

/// 디스크의 원시 패널 CSV를 읽는 소스.
#[derive(Debug, Clone)]
pub struct CsvPanelSource {
    path: PathBuf,
}

impl CsvPanelSource {
    /// 새 소스를 생성합니다.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 읽을 파일 경로.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PanelSource for CsvPanelSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self) -> Result<RawTable> {
        debug!(path = %self.path.display(), "CSV 읽기 시작");

        let bytes = tokio::fs::read(&self.path).await?;
        let table = RawTable::from_csv_reader(bytes.as_slice())?;

        if table.is_empty() {
            return Err(SourceError::Empty(self.path.display().to_string()));
        }

        info!(
            path = %self.path.display(),
            rows = table.len(),
            columns = table.headers().len(),
            "원시 패널 수신"
        );

        Ok(table)
    }
}
