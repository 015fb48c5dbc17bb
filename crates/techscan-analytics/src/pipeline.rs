//! 수집 → 적재 → 지표 계산 → 병합 → 분류 파이프라인.
//!
//! 비동기 경계는 `PanelSource::fetch` 하나뿐이며, 이후 단계는 메모리 패널에
//! 대해 동기적으로 끝까지 실행됩니다.

use chrono::NaiveDate;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::info;

use techscan_core::{AppConfig, IndicatorKind, SignalTable, TechScanResult, TrendTable};
use techscan_data::{PanelSource, PanelStore};

use crate::indicators::{ComputeStats, IndicatorEngine};
use crate::signal_detector::SignalDetector;
use crate::trend_analyzer::TrendAnalyzer;

/// 추세 판정 구간. 비어 있는 쪽은 패널의 첫/마지막 날짜로 대체됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl TrendWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// 패널 날짜 범위로 빈 경계를 채웁니다.
    ///
    /// 패널이 비어 있거나, 한쪽 경계만 지정되어 패널 범위 밖에 있으면 `None`.
    /// 두 경계를 모두 지정한 역전 구간은 그대로 반환되어 `InvalidInput`이 됩니다.
    pub fn resolve(&self, panel: &PanelStore) -> Option<(NaiveDate, NaiveDate)> {
        let (first, last) = panel.date_range()?;
        let start = self.start.unwrap_or(first);
        let end = self.end.unwrap_or(last);

        if start > end && (self.start.is_none() || self.end.is_none()) {
            return None;
        }
        Some((start, end))
    }
}

/// 파이프라인 실행 통계.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// 데이터 소스 이름
    pub source: String,
    /// 패널 행 수
    pub rows: usize,
    /// 종목 수
    pub tickers: usize,
    /// 지표 종류별 계산 통계
    pub indicators: Vec<ComputeStats>,
    /// 추세 테이블 종목 수
    pub trend_tickers: usize,
    /// 신호 테이블 종목 수
    pub signal_tickers: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl PipelineStats {
    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        for stats in &self.indicators {
            info!(
                kind = %stats.kind,
                computed = stats.computed,
                insufficient = stats.insufficient,
                failed = stats.failed,
                "지표 요약"
            );
        }
        info!(
            source = %self.source,
            rows = self.rows,
            tickers = self.tickers,
            trend_tickers = self.trend_tickers,
            signal_tickers = self.signal_tickers,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "파이프라인 완료"
        );
    }
}

/// 파이프라인 결과.
#[derive(Debug)]
pub struct PipelineOutput {
    /// 지표가 병합된 패널
    pub panel: PanelStore,
    /// 종목별 추세
    pub trend: TrendTable,
    /// 종목별 매매 신호
    pub signals: SignalTable,
    pub stats: PipelineStats,
}

/// 기술적 지표 파이프라인.
#[derive(Debug, Default)]
pub struct Pipeline {
    engine: IndicatorEngine,
    trend: TrendAnalyzer,
    signal: SignalDetector,
    window: TrendWindow,
}

impl Pipeline {
    pub fn new(engine: IndicatorEngine, trend: TrendAnalyzer, signal: SignalDetector) -> Self {
        Self {
            engine,
            trend,
            signal,
            window: TrendWindow::default(),
        }
    }

    /// 설정에서 파이프라인 생성.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            IndicatorEngine::from_config(&config.indicators),
            TrendAnalyzer::from_config(&config.trend),
            SignalDetector::from_config(&config.signal),
        )
        .with_window(TrendWindow::new(
            config.trend.start_date,
            config.trend.end_date,
        ))
    }

    /// 추세 판정 구간을 지정합니다.
    pub fn with_window(mut self, window: TrendWindow) -> Self {
        self.window = window;
        self
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    /// 소스에서 패널을 받아 전체 단계를 실행합니다.
    ///
    /// 소스 실패 시 지표 계산 전에 `Source` 에러로 중단합니다.
    pub async fn run(&self, source: &dyn PanelSource) -> TechScanResult<PipelineOutput> {
        let started = Instant::now();
        info!(source = source.name(), "원시 패널 수집 시작");

        let raw = source.fetch().await?;
        let panel = PanelStore::load(&raw)?;

        let mut output = self.run_panel(panel)?;
        output.stats.source = source.name().to_string();
        output.stats.elapsed = started.elapsed();
        output.stats.log_summary();

        Ok(output)
    }

    /// 적재된 패널에 대해 지표 계산, 병합, 분류를 실행합니다.
    pub fn run_panel(&self, mut panel: PanelStore) -> TechScanResult<PipelineOutput> {
        let started = Instant::now();

        let indicators = self.augment(&mut panel)?;

        let trend = match self.window.resolve(&panel) {
            Some((start, end)) => self.trend.judge_trend(&panel, start, end)?,
            None => TrendTable::new(),
        };
        let signals = self.signal.judge_buy_or_sell(&panel);

        let stats = PipelineStats {
            source: String::new(),
            rows: panel.len(),
            tickers: panel.ticker_count(),
            indicators,
            trend_tickers: trend.len(),
            signal_tickers: signals.len(),
            elapsed: started.elapsed(),
        };

        Ok(PipelineOutput {
            panel,
            trend,
            signals,
            stats,
        })
    }

    /// 네 종류의 지표를 계산해 패널에 병합합니다.
    pub fn augment(&self, panel: &mut PanelStore) -> TechScanResult<Vec<ComputeStats>> {
        let mut all_stats = Vec::with_capacity(IndicatorKind::ALL.len());

        for kind in IndicatorKind::ALL {
            let (frame, stats) = self.engine.compute_with_stats(panel, kind)?;
            panel.merge(frame)?;
            all_stats.push(stats);
        }

        Ok(all_stats)
    }
}
