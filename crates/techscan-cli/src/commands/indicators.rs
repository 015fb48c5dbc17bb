//! 원시 패널에 지표 컬럼을 추가해 저장하는 명령.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use techscan_analytics::Pipeline;
use techscan_core::AppConfig;
use techscan_data::{write_panel_to_path, CsvPanelSource, OutputPaths, PanelSource, PanelStore};

/// 지표 계산 명령 설정
#[derive(Debug, Clone)]
pub struct IndicatorsCommand {
    /// 원시 패널 CSV
    pub input: PathBuf,
    /// 출력 경로 (없으면 `<data_dir>/<stem>_tech.csv`)
    pub output: Option<PathBuf>,
}

/// 패널 파일을 읽어 네 종류 지표를 병합하고 저장합니다.
///
/// 저장된 파일 경로를 반환합니다.
pub async fn compute_indicators(config: &AppConfig, cmd: &IndicatorsCommand) -> Result<PathBuf> {
    let mut panel = load_panel(&cmd.input).await?;

    let pipeline = Pipeline::from_config(config);
    let stats = pipeline.augment(&mut panel)?;
    for s in &stats {
        info!(
            kind = %s.kind,
            computed = s.computed,
            insufficient = s.insufficient,
            failed = s.failed,
            "지표 계산 완료"
        );
    }

    let output = cmd
        .output
        .clone()
        .unwrap_or_else(|| OutputPaths::for_input(&config.data.data_dir, &cmd.input).panel);
    write_panel_to_path(&panel, &output)?;

    Ok(output)
}

/// CSV 파일에서 패널을 적재합니다.
pub async fn load_panel(path: &Path) -> Result<PanelStore> {
    let source = CsvPanelSource::new(path);
    let raw = source
        .fetch()
        .await
        .with_context(|| format!("Failed to read panel: {}", path.display()))?;
    let panel = PanelStore::load(&raw)?;

    info!(
        source = source.name(),
        rows = panel.len(),
        tickers = panel.ticker_count(),
        "패널 적재 완료"
    );

    Ok(panel)
}
