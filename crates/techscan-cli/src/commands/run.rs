//! 전체 파이프라인 일괄 실행.
//!
//! 지표 패널, 추세 테이블, 매매 신호 테이블 세 파일을 한 번에 기록합니다.

use anyhow::Result;
use std::path::PathBuf;

use techscan_analytics::{Pipeline, PipelineStats, TrendWindow};
use techscan_core::AppConfig;
use techscan_data::{
    write_panel_to_path, write_signal_table_to_path, write_trend_table_to_path, CsvPanelSource,
    OutputPaths,
};

/// 일괄 실행 설정
#[derive(Debug, Clone)]
pub struct RunCommand {
    pub input: PathBuf,
    pub window: TrendWindow,
    /// 출력 디렉토리 (없으면 설정의 `data_dir`)
    pub output_dir: Option<PathBuf>,
}

/// 일괄 실행 결과
#[derive(Debug)]
pub struct RunReport {
    pub paths: OutputPaths,
    pub stats: PipelineStats,
}

/// 파이프라인을 실행하고 세 결과 파일을 기록합니다.
pub async fn run_pipeline(config: &AppConfig, cmd: &RunCommand) -> Result<RunReport> {
    let output = Pipeline::from_config(config)
        .with_window(cmd.window)
        .run(&CsvPanelSource::new(&cmd.input))
        .await?;

    let dir = cmd
        .output_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let paths = OutputPaths::for_input(&dir, &cmd.input);

    write_panel_to_path(&output.panel, &paths.panel)?;
    write_trend_table_to_path(&output.trend, &paths.trend)?;
    write_signal_table_to_path(&output.signals, &paths.signals)?;

    Ok(RunReport {
        paths,
        stats: output.stats,
    })
}
