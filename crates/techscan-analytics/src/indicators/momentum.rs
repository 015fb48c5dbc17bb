//! 모멘텀 지표 (Momentum Indicators).
//!
//! - RSV (Raw Stochastic Value)
//! - KDJ (스토캐스틱 K/D에 J선을 더한 지표)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// KDJ 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KdjParams {
    /// RSV 기간 (기본: 9).
    pub period: usize,
    /// K 평활 기간 (기본: 3).
    pub k_smooth: usize,
    /// D 평활 기간 (기본: 3).
    pub d_smooth: usize,
}

impl Default for KdjParams {
    fn default() -> Self {
        Self {
            period: 9,
            k_smooth: 3,
            d_smooth: 3,
        }
    }
}

/// KDJ 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdjResult {
    pub k: Option<Decimal>,
    pub d: Option<Decimal>,
    /// J = 3K - 2D (0-100 범위를 벗어날 수 있음)
    pub j: Option<Decimal>,
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSV 계산.
    ///
    /// RSV = (종가 - LLV(저가, n)) / (HHV(고가, n) - LLV(저가, n)) × 100
    ///
    /// 고가 최댓값과 저가 최솟값이 같으면 중립값 50을 사용합니다.
    ///
    /// # 반환
    /// 각 시점의 RSV (처음 period-1개는 None)
    pub fn rsv(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let len = high.len().min(low.len()).min(close.len());

        if len < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: len,
            });
        }

        let mut result = Vec::with_capacity(len);

        for i in 0..len {
            if i + 1 < period {
                result.push(None);
                continue;
            }

            let start = i + 1 - period;
            let highest = high[start..=i]
                .iter()
                .max()
                .copied()
                .unwrap_or(Decimal::ZERO);
            let lowest = low[start..=i]
                .iter()
                .min()
                .copied()
                .unwrap_or(Decimal::ZERO);

            let range = highest - lowest;
            if range == Decimal::ZERO {
                result.push(Some(dec!(50))); // 범위가 0이면 중립값
            } else {
                result.push(Some((close[i] - lowest) / range * dec!(100)));
            }
        }

        Ok(result)
    }

    /// KDJ 계산.
    ///
    /// K_t = ((s - 1) × K_{t-1} + RSV_t) / s, K 초기값 50
    /// D_t = ((s - 1) × D_{t-1} + K_t) / s, D 초기값 50
    /// J_t = 3 × K_t - 2 × D_t
    ///
    /// 기본 s = 3. RSV가 정의되지 않은 처음 period-1개는 None입니다.
    pub fn kdj(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: KdjParams,
    ) -> IndicatorResult<Vec<KdjResult>> {
        if params.k_smooth == 0 || params.d_smooth == 0 {
            return Err(IndicatorError::InvalidParameter(
                "평활 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let rsv = self.rsv(high, low, close, params.period)?;

        let k_smooth = Decimal::from(params.k_smooth);
        let d_smooth = Decimal::from(params.d_smooth);

        let mut prev_k = dec!(50);
        let mut prev_d = dec!(50);

        Ok(rsv
            .into_iter()
            .map(|rsv| match rsv {
                Some(rsv) => {
                    let k = ((k_smooth - Decimal::ONE) * prev_k + rsv) / k_smooth;
                    let d = ((d_smooth - Decimal::ONE) * prev_d + k) / d_smooth;
                    prev_k = k;
                    prev_d = d;
                    KdjResult {
                        k: Some(k),
                        d: Some(d),
                        j: Some(dec!(3) * k - dec!(2) * d),
                    }
                }
                None => KdjResult {
                    k: None,
                    d: None,
                    j: None,
                },
            })
            .collect())
    }
}
