//! 기술적 지표 계산 및 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (BBI, KDJ, MACD, BOLL) 및 통합 지표 엔진
//! - BBI 기울기 기반 구간 추세 판정
//! - KDJ-J 기반 매매 신호 판정
//! - 수집부터 분류까지의 파이프라인
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 계산기와 `IndicatorEngine`
//! - [`pipeline`]: `Pipeline`, `PipelineOutput`, `PipelineStats`

pub mod indicators;
pub mod pipeline;
pub mod signal_detector;
pub mod trend_analyzer;

// Indicators 모듈 re-exports
pub use indicators::{
    // 변동성 지표
    BollingerBandsParams,
    BollingerBandsResult,
    ComputeStats,
    EmaParams,
    IndicatorEngine,
    IndicatorError,
    IndicatorParams,
    IndicatorResult,
    // 모멘텀 지표
    KdjParams,
    KdjResult,
    MacdParams,
    MacdResult,
    MomentumCalculator,
    // 추세 지표
    BbiParams,
    SmaParams,
    TrendIndicators,
    VolatilityIndicators,
};

pub use pipeline::{Pipeline, PipelineOutput, PipelineStats, TrendWindow};
pub use signal_detector::SignalDetector;
pub use trend_analyzer::{mean_first_difference, TrendAnalyzer};
