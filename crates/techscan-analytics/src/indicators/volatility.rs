//! 변동성 지표 (Volatility Indicators).
//!
//! - Bollinger Bands (볼린저 밴드, BOLL)

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

impl BollingerBandsResult {
    fn undefined() -> Self {
        Self {
            upper: None,
            middle: None,
            lower: None,
        }
    }
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 구간의 모표준편차(n으로 나눔)입니다.
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드 값들 (처음 period-1개는 None)
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
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

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(BollingerBandsResult::undefined());
                continue;
            }

            let window = &prices[i + 1 - period..=i];

            // 이동평균 (중간 밴드)
            let sum: Decimal = window.iter().sum();
            let ma = sum / period_decimal;

            // 모분산
            let variance: Decimal = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / period_decimal;

            let std_dev = variance.sqrt().ok_or_else(|| {
                IndicatorError::CalculationError(format!("분산의 제곱근 계산 실패: {}", variance))
            })?;

            let deviation = params.std_dev_multiplier * std_dev;

            result.push(BollingerBandsResult {
                upper: Some(ma + deviation),
                middle: Some(ma),
                lower: Some(ma - deviation),
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bollinger_warm_up() {
        let volatility = VolatilityIndicators::new();
        let prices: Vec<Decimal> = (0..25).map(|i| Decimal::from(100 + i % 5)).collect();

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        assert_eq!(bands.len(), 25);
        assert!(bands[..19].iter().all(|b| b.middle.is_none()));
        assert!(bands[19..].iter().all(|b| b.middle.is_some()));
    }

    #[test]
    fn test_bollinger_population_std_dev() {
        let volatility = VolatilityIndicators::new();
        // 2, 4, 4, 4, 5, 5, 7, 9 → 평균 5, 모표준편차 2
        let prices = vec![
            dec!(2),
            dec!(4),
            dec!(4),
            dec!(4),
            dec!(5),
            dec!(5),
            dec!(7),
            dec!(9),
        ];

        let bands = volatility
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 8,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        let last = bands[7];
        assert_eq!(last.middle, Some(dec!(5)));
        assert_eq!(last.upper.map(|v| v.round_dp(8)), Some(dec!(9)));
        assert_eq!(last.lower.map(|v| v.round_dp(8)), Some(dec!(1)));
    }

    #[test]
    fn test_bollinger_constant_series_collapses() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(10); 20];

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        assert_eq!(bands[19].upper, Some(dec!(10)));
        assert_eq!(bands[19].middle, Some(dec!(10)));
        assert_eq!(bands[19].lower, Some(dec!(10)));
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let volatility = VolatilityIndicators::new();
        let prices: Vec<Decimal> = (0..40)
            .map(|i| Decimal::from(100 + (i * 7) % 11))
            .collect();

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        for b in bands.iter().skip(19) {
            let (upper, middle, lower) = (b.upper.unwrap(), b.middle.unwrap(), b.lower.unwrap());
            assert!(lower <= middle && middle <= upper);
        }
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(10); 19];

        assert!(matches!(
            volatility.bollinger_bands(&prices, BollingerBandsParams::default()),
            Err(IndicatorError::InsufficientData {
                required: 20,
                provided: 19
            })
        ));
    }
}
