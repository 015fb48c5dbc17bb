//! 일봉 레코드 타입.
//!
//! - `Bar` - 종목 하루치 시세 레코드 (적재 후 불변)
//! - `PriceField` - 종목별 시계열로 꺼낼 수 있는 숫자 필드

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// 입력 패널의 필수 컬럼 (순서는 출력 헤더 순서).
pub const BAR_COLUMNS: [&str; 14] = [
    "date",
    "tic",
    "tic_name",
    "day_of_week",
    "open",
    "close",
    "high",
    "low",
    "volume",
    "amount",
    "price_swing",
    "change_pct",
    "change",
    "turnover_rate",
];

/// 종목 하루치 시세 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 거래일
    pub date: NaiveDate,
    /// 종목 코드
    pub ticker: String,
    /// 종목명
    pub name: String,
    /// 요일 (월요일 = 1 ... 일요일 = 7)
    pub day_of_week: u8,
    /// 시가
    pub open: Price,
    /// 종가
    pub close: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 거래량
    pub volume: Decimal,
    /// 거래대금
    pub amount: Decimal,
    /// 진폭 (%)
    pub price_swing: Decimal,
    /// 등락률 (%)
    pub change_pct: Decimal,
    /// 등락폭
    pub change: Decimal,
    /// 회전율 (%)
    pub turnover_rate: Decimal,
}

impl Bar {
    /// 날짜로부터 ISO 요일 번호(월요일 = 1)를 계산합니다.
    pub fn iso_day_of_week(date: NaiveDate) -> u8 {
        date.weekday().number_from_monday() as u8
    }

    /// 정렬 키 (date, ticker).
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.date, self.ticker.as_str())
    }

    /// 지정한 필드 값을 반환합니다.
    pub fn field(&self, field: PriceField) -> Decimal {
        match field {
            PriceField::Open => self.open,
            PriceField::Close => self.close,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Volume => self.volume,
            PriceField::Amount => self.amount,
            PriceField::PriceSwing => self.price_swing,
            PriceField::ChangePct => self.change_pct,
            PriceField::Change => self.change,
            PriceField::TurnoverRate => self.turnover_rate,
        }
    }
}

/// 시계열로 조회 가능한 숫자 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    Close,
    High,
    Low,
    Volume,
    Amount,
    PriceSwing,
    ChangePct,
    Change,
    TurnoverRate,
}

impl PriceField {
    /// 입력 패널의 컬럼명.
    pub fn column(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::Close => "close",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Volume => "volume",
            PriceField::Amount => "amount",
            PriceField::PriceSwing => "price_swing",
            PriceField::ChangePct => "change_pct",
            PriceField::Change => "change",
            PriceField::TurnoverRate => "turnover_rate",
        }
    }
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_bar() -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2025, 5, 30).unwrap(),
            ticker: "600000".to_string(),
            name: "浦发银行".to_string(),
            day_of_week: 5,
            open: dec!(12.10),
            close: dec!(12.35),
            high: dec!(12.40),
            low: dec!(12.01),
            volume: dec!(523001),
            amount: dec!(643120000),
            price_swing: dec!(3.22),
            change_pct: dec!(2.07),
            change: dec!(0.25),
            turnover_rate: dec!(0.18),
        }
    }

    #[test]
    fn test_iso_day_of_week() {
        // 2025-05-30은 금요일
        let friday = NaiveDate::from_ymd_opt(2025, 5, 30).unwrap();
        assert_eq!(Bar::iso_day_of_week(friday), 5);

        let sunday = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(Bar::iso_day_of_week(sunday), 7);
    }

    #[test]
    fn test_field_access() {
        let bar = sample_bar();
        assert_eq!(bar.field(PriceField::Close), dec!(12.35));
        assert_eq!(bar.field(PriceField::High), dec!(12.40));
        assert_eq!(bar.field(PriceField::TurnoverRate), dec!(0.18));
    }

    #[test]
    fn test_price_field_columns_are_required_columns() {
        let fields = [
            PriceField::Open,
            PriceField::Close,
            PriceField::High,
            PriceField::Low,
            PriceField::Volume,
            PriceField::Amount,
            PriceField::PriceSwing,
            PriceField::ChangePct,
            PriceField::Change,
            PriceField::TurnoverRate,
        ];
        for field in fields {
            assert!(BAR_COLUMNS.contains(&field.column()));
        }
    }
}
