//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (DIF / DEA / MACD 막대)
//! - BBI (Bull and Bear Index, 다공지수)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// DEA 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
///
/// EMA가 첫 관측값에서 시작하므로 모든 시점에서 정의됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdResult {
    /// DIF (단기 EMA - 장기 EMA).
    pub dif: Decimal,
    /// DEA (DIF의 EMA).
    pub dea: Decimal,
    /// MACD 막대 (2 × (DIF - DEA)).
    pub macd: Decimal,
}

/// BBI 파라미터.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BbiParams {
    /// 평균할 SMA 기간들 (기본: 3, 6, 12, 24).
    pub periods: Vec<usize>,
}

impl Default for BbiParams {
    fn default() -> Self {
        Self {
            periods: vec![3, 6, 12, 24],
        }
    }
}

impl BbiParams {
    /// 첫 값이 정의되기까지 필요한 봉 수.
    pub fn warm_up(&self) -> usize {
        self.periods.iter().copied().max().unwrap_or(0)
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let period_decimal = Decimal::from(period);

        // 구간 합을 이동시키며 계산
        let mut sum = Decimal::ZERO;
        for (i, price) in prices.iter().enumerate() {
            sum += *price;
            if i >= period {
                sum -= prices[i - period];
            }

            if i + 1 < period {
                result.push(None);
            } else {
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA_0 = P_0
    /// EMA_t = α × P_t + (1 - α) × EMA_{t-1}, α = 2 / (period + 1)
    ///
    /// 첫 관측값에서 시작하므로 워밍업 구간이 없습니다.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Decimal>> {
        if params.period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let Some(&first) = prices.first() else {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        };

        let alpha = dec!(2) / Decimal::from(params.period + 1);
        let mut result = Vec::with_capacity(prices.len());

        let mut prev_ema = first;
        result.push(first);
        for price in prices.iter().skip(1) {
            let ema = (*price * alpha) + (prev_ema * (Decimal::ONE - alpha));
            result.push(ema);
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// DIF = EMA(fast) - EMA(slow)
    /// DEA = EMA(DIF, signal)
    /// MACD = 2 × (DIF - DEA)
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        let dif: Vec<Decimal> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| fast - slow)
            .collect();

        let dea = self.ema(
            &dif,
            EmaParams {
                period: params.signal_period,
            },
        )?;

        Ok(dif
            .into_iter()
            .zip(dea)
            .map(|(dif, dea)| MacdResult {
                dif,
                dea,
                macd: dec!(2) * (dif - dea),
            })
            .collect())
    }

    /// BBI (다공지수) 계산.
    ///
    /// BBI = (SMA(3) + SMA(6) + SMA(12) + SMA(24)) / 4
    ///
    /// # 반환
    /// 각 시점의 BBI 값 (모든 SMA가 정의된 시점부터 Some)
    pub fn bbi(&self, prices: &[Decimal], params: &BbiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        if params.periods.is_empty() {
            return Err(IndicatorError::InvalidParameter(
                "BBI 기간이 비어 있습니다".to_string(),
            ));
        }

        let averages = params
            .periods
            .iter()
            .map(|&period| self.sma(prices, SmaParams { period }))
            .collect::<IndicatorResult<Vec<_>>>()?;

        let count = Decimal::from(averages.len());

        Ok((0..prices.len())
            .map(|i| {
                averages
                    .iter()
                    .map(|sma| sma[i])
                    .sum::<Option<Decimal>>()
                    .map(|sum| sum / count)
            })
            .collect())
    }
}
