//! 기술적 지표 모듈.
//!
//! 패널의 종목별 시계열에서 지표를 계산하고, 전 종목 결과를 지표 종류별
//! 프레임(`IndicatorFrame`)으로 모읍니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균
//! - **EMA**: 지수 이동평균 (첫 관측값 시작)
//! - **MACD**: DIF / DEA / MACD 막대
//! - **BBI**: 다공지수 (SMA 3/6/12/24 평균)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **KDJ**: RSV(9) 기반 K/D 평활 + J선
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **BOLL**: 볼린저 밴드 (모표준편차)
//!
//! # 사용 예시
//!
//! ```ignore
//! use techscan_analytics::indicators::IndicatorEngine;
//! use techscan_core::IndicatorKind;
//!
//! let engine = IndicatorEngine::new();
//! let frame = engine.compute(&panel, IndicatorKind::Kdj)?;
//! panel.merge(frame)?;
//! ```

pub mod momentum;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use techscan_core::{
    IndicatorConfig, IndicatorFrame, IndicatorKind, IndicatorRow, IndicatorValues, PriceField,
    TechScanError, TechScanResult,
};
use techscan_data::PanelStore;

pub use momentum::{KdjParams, KdjResult, MomentumCalculator};
pub use trend::{BbiParams, EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 전체 지표 파라미터.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub bbi: BbiParams,
    pub kdj: KdjParams,
    pub macd: MacdParams,
    pub boll: BollingerBandsParams,
}

impl From<&IndicatorConfig> for IndicatorParams {
    fn from(config: &IndicatorConfig) -> Self {
        Self {
            bbi: BbiParams {
                periods: config.bbi.periods.clone(),
            },
            kdj: KdjParams {
                period: config.kdj.period,
                k_smooth: config.kdj.k_smooth,
                d_smooth: config.kdj.d_smooth,
            },
            macd: MacdParams {
                fast_period: config.macd.fast_period,
                slow_period: config.macd.slow_period,
                signal_period: config.macd.signal_period,
            },
            boll: BollingerBandsParams {
                period: config.boll.period,
                std_dev_multiplier: config.boll.std_dev_multiplier,
            },
        }
    }
}

/// 한 지표 종류의 계산 통계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeStats {
    pub kind: IndicatorKind,
    /// 값이 계산된 종목 수
    pub computed: usize,
    /// 히스토리 부족으로 미계산된 종목 수
    pub insufficient: usize,
    /// 계산 오류로 미계산된 종목 수
    pub failed: usize,
    /// 프레임 행 수
    pub rows: usize,
}

impl ComputeStats {
    fn new(kind: IndicatorKind) -> Self {
        Self {
            kind,
            computed: 0,
            insufficient: 0,
            failed: 0,
            rows: 0,
        }
    }
}

/// 통합 지표 엔진.
///
/// 종목별 계산은 서로 독립적이며, 한 종목의 히스토리 부족은 그 종목의
/// 값만 미계산으로 남기고 다른 종목에 영향을 주지 않습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    params: IndicatorParams,
}

impl IndicatorEngine {
    /// 기본 파라미터로 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 파라미터를 지정해 엔진 생성.
    pub fn with_params(params: IndicatorParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// 설정에서 엔진 생성.
    pub fn from_config(config: &IndicatorConfig) -> Self {
        Self::with_params(IndicatorParams::from(config))
    }

    /// 현재 파라미터.
    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    // ==================== 시계열 계산 ====================

    /// 단순 이동평균 (SMA) 계산.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Decimal>> {
        self.trend.ema(prices, params)
    }

    /// BBI 계산.
    pub fn bbi(&self, close: &[Decimal]) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.bbi(close, &self.params.bbi)
    }

    /// MACD 계산.
    pub fn macd(&self, close: &[Decimal]) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(close, self.params.macd)
    }

    /// KDJ 계산.
    pub fn kdj(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
    ) -> IndicatorResult<Vec<KdjResult>> {
        self.momentum.kdj(high, low, close, self.params.kdj)
    }

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(&self, close: &[Decimal]) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(close, self.params.boll)
    }

    /// 한 종목 시계열에 대해 한 종류의 지표 값을 계산합니다 (반올림 전).
    pub fn compute_series(
        &self,
        kind: IndicatorKind,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
    ) -> IndicatorResult<Vec<IndicatorValues>> {
        let values = match kind {
            IndicatorKind::Bbi => self
                .bbi(close)?
                .into_iter()
                .map(|bbi| IndicatorValues::Bbi { bbi })
                .collect(),
            IndicatorKind::Kdj => self
                .kdj(high, low, close)?
                .into_iter()
                .map(|r| IndicatorValues::Kdj {
                    k: r.k,
                    d: r.d,
                    j: r.j,
                })
                .collect(),
            IndicatorKind::Macd => self
                .macd(close)?
                .into_iter()
                .map(|r| IndicatorValues::Macd {
                    dif: Some(r.dif),
                    dea: Some(r.dea),
                    macd: Some(r.macd),
                })
                .collect(),
            IndicatorKind::Boll => self
                .bollinger_bands(close)?
                .into_iter()
                .map(|r| IndicatorValues::Boll {
                    upper: r.upper,
                    mid: r.middle,
                    lower: r.lower,
                })
                .collect(),
        };

        Ok(values)
    }

    // ==================== 패널 계산 ====================

    /// 패널 전 종목에 대해 한 종류의 지표 프레임을 계산합니다.
    pub fn compute(&self, panel: &PanelStore, kind: IndicatorKind) -> TechScanResult<IndicatorFrame> {
        self.compute_with_stats(panel, kind).map(|(frame, _)| frame)
    }

    /// 네 종류의 지표 프레임을 모두 계산합니다.
    pub fn compute_all(&self, panel: &PanelStore) -> TechScanResult<Vec<IndicatorFrame>> {
        IndicatorKind::ALL
            .iter()
            .map(|&kind| self.compute(panel, kind))
            .collect()
    }

    /// 프레임과 계산 통계를 함께 반환합니다.
    ///
    /// 프레임은 패널의 모든 (종목, 날짜) 키를 정확히 한 번씩 포함하며, 값은
    /// 소수점 2자리로 반올림됩니다.
    ///
    /// # 에러
    /// - 잘못된 파라미터는 `Config` 에러로 전체 계산을 중단합니다.
    pub fn compute_with_stats(
        &self,
        panel: &PanelStore,
        kind: IndicatorKind,
    ) -> TechScanResult<(IndicatorFrame, ComputeStats)> {
        let mut stats = ComputeStats::new(kind);
        let mut parts = Vec::with_capacity(panel.ticker_count());

        for ticker in panel.tickers() {
            let _span = techscan_core::ticker_span!("indicator", ticker, kind).entered();
            let dates = panel.dates_for(ticker);
            let high = panel.series_for(ticker, PriceField::High);
            let low = panel.series_for(ticker, PriceField::Low);
            let close = panel.series_for(ticker, PriceField::Close);

            let values = match self.compute_series(kind, &high, &low, &close) {
                Ok(values) => {
                    stats.computed += 1;
                    values.into_iter().map(IndicatorValues::rounded).collect()
                }
                Err(IndicatorError::InsufficientData { required, provided }) => {
                    stats.insufficient += 1;
                    debug!(
                        ticker,
                        kind = %kind,
                        required,
                        provided,
                        "히스토리 부족, 미계산 처리"
                    );
                    vec![IndicatorValues::undefined(kind); dates.len()]
                }
                Err(IndicatorError::InvalidParameter(msg)) => {
                    return Err(TechScanError::Config(format!("{} 파라미터 오류: {}", kind, msg)));
                }
                Err(IndicatorError::CalculationError(msg)) => {
                    stats.failed += 1;
                    warn!(ticker, kind = %kind, error = %msg, "지표 계산 실패, 미계산 처리");
                    vec![IndicatorValues::undefined(kind); dates.len()]
                }
            };

            let rows: Vec<IndicatorRow> = dates
                .into_iter()
                .zip(values)
                .map(|(date, values)| IndicatorRow {
                    ticker: ticker.to_string(),
                    date,
                    values,
                })
                .collect();
            parts.push(rows);
        }

        // 종목별 결과를 한 번에 결합
        let frame = IndicatorFrame::from_parts(kind, parts);
        stats.rows = frame.len();

        info!(
            kind = %kind,
            rows = stats.rows,
            computed = stats.computed,
            insufficient = stats.insufficient,
            failed = stats.failed,
            "지표 계산 완료"
        );

        Ok((frame, stats))
    }
}
