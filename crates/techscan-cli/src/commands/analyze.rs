//! 추세 / 매매 신호 판정 명령.

use anyhow::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;

use techscan_analytics::{Pipeline, PipelineOutput, TrendWindow};
use techscan_core::AppConfig;
use techscan_data::CsvPanelSource;

use super::output::{emit, render_signals, render_trend, OutputFormat};

/// 추세 판정 명령 설정
#[derive(Debug, Clone)]
pub struct TrendCommand {
    pub input: PathBuf,
    pub window: TrendWindow,
    /// 설정의 `trend.threshold` 대신 사용할 임계값
    pub threshold: Option<Decimal>,
    pub format: OutputFormat,
    /// 출력 파일 (없으면 stdout)
    pub output: Option<PathBuf>,
}

/// 매매 신호 명령 설정
#[derive(Debug, Clone)]
pub struct SignalsCommand {
    pub input: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// 구간 추세를 판정해 출력합니다.
pub async fn judge_trend(config: &AppConfig, cmd: &TrendCommand) -> Result<PipelineOutput> {
    let mut config = config.clone();
    if let Some(threshold) = cmd.threshold {
        config.trend.threshold = threshold;
        config.validate()?;
    }

    let output = Pipeline::from_config(&config)
        .with_window(cmd.window)
        .run(&CsvPanelSource::new(&cmd.input))
        .await?;

    info!(
        threshold = %config.trend.threshold,
        tickers = output.trend.len(),
        "추세 판정 완료"
    );

    let content = render_trend(&output.trend, cmd.format)?;
    emit(&content, cmd.output.as_deref())?;

    Ok(output)
}

/// 최신 봉 기준 매매 신호를 판정해 출력합니다.
pub async fn judge_signals(config: &AppConfig, cmd: &SignalsCommand) -> Result<PipelineOutput> {
    let output = Pipeline::from_config(config)
        .run(&CsvPanelSource::new(&cmd.input))
        .await?;

    info!(tickers = output.signals.len(), "매매 신호 판정 완료");

    let content = render_signals(&output.signals, cmd.format)?;
    emit(&content, cmd.output.as_deref())?;

    Ok(output)
}
