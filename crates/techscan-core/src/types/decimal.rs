//! 지표 값 표현을 위한 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};

/// 가격 타입.
pub type Price = Decimal;

/// 지표 값의 소수점 자릿수.
pub const INDICATOR_DP: u32 = 2;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 지표 출력 자릿수(소수점 2자리)로 반올림합니다.
    ///
    /// 정확히 중간값이면 짝수 쪽으로 반올림합니다.
    fn round_indicator(&self) -> Decimal;

    /// 지표 출력 자릿수에 맞춰져 있는지 확인합니다.
    fn is_indicator_rounded(&self) -> bool;
}

impl DecimalExt for Decimal {
    fn round_indicator(&self) -> Decimal {
        self.round_dp_with_strategy(INDICATOR_DP, RoundingStrategy::MidpointNearestEven)
    }

    fn is_indicator_rounded(&self) -> bool {
        self.round_indicator() == *self
    }
}

/// `Option<Decimal>` 지표 값을 반올림합니다. `None`은 그대로 유지됩니다.
pub fn round_opt(value: Option<Decimal>) -> Option<Decimal> {
    value.map(|v| v.round_indicator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_indicator() {
        assert_eq!(dec!(12.3456).round_indicator(), dec!(12.35));
        assert_eq!(dec!(-0.004).round_indicator(), dec!(0.00));
        // 중간값은 짝수 쪽으로
        assert_eq!(dec!(2.125).round_indicator(), dec!(2.12));
        assert_eq!(dec!(2.135).round_indicator(), dec!(2.14));
    }

    #[test]
    fn test_round_opt_keeps_none() {
        assert_eq!(round_opt(None), None);
        assert_eq!(round_opt(Some(dec!(1.999))), Some(dec!(2.00)));
    }

    proptest! {
        #[test]
        fn prop_rounded_has_at_most_two_decimals(mantissa in -10_000_000_000i64..10_000_000_000i64, scale in 0u32..10) {
            let value = Decimal::new(mantissa, scale);
            let rounded = value.round_indicator();
            prop_assert!(rounded.scale() <= INDICATOR_DP);
            prop_assert!(rounded.is_indicator_rounded());
            prop_assert!((rounded - value).abs() <= dec!(0.005));
        }
    }
}
