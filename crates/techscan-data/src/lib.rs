//! 패널 데이터 관리 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - `PanelStore`: 다종목 일봉 패널 적재, 종목별 시계열 조회, 지표 프레임 병합
//! - `RawTable`: 수집 계층이 넘겨주는 문자열 테이블
//! - `PanelSource`: 데이터 수집 계층 경계 (CSV 파일 / 메모리 구현)
//! - CSV 내보내기 (지표 패널, 추세 테이블, 매매 신호 테이블)

pub mod error;
pub mod export;
pub mod panel;
pub mod provider;
pub mod table;

pub use error::{Result, SourceError};
pub use export::{
    write_panel, write_panel_to_path, write_signal_table, write_signal_table_to_path,
    write_trend_table, write_trend_table_to_path, OutputPaths,
};
pub use panel::{MergeStats, PanelRow, PanelStore};
pub use provider::{CsvPanelSource, InMemoryPanelSource, PanelSource};
pub use table::RawTable;
