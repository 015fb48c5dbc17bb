//! 추세 라벨과 매매 신호.
//!
//! - `TrendLabel` - 구간 내 BBI 기울기로 판정한 추세 (+1 / 0 / -1)
//! - `TradingSignal` - 최신 봉의 KDJ-J로 판정한 매수/매도/미정
//! - `TrendTable`, `SignalTable` - 종목 코드 → (종목명, 판정) 매핑

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 구간 추세 라벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    /// 상승 추세 (+1)
    Up,
    /// 하락 추세 (-1)
    Down,
    /// 횡보 (0)
    Flat,
}

impl TrendLabel {
    /// 출력용 정수 값.
    pub fn value(&self) -> i8 {
        match self {
            TrendLabel::Up => 1,
            TrendLabel::Down => -1,
            TrendLabel::Flat => 0,
        }
    }
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// 최신 봉 기준 매매 신호.
///
/// "판정 없음"은 매도와 다르므로 bool이 아닌 3상태로 표현합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingSignal {
    /// 매수 (출력: `true`)
    Buy,
    /// 매도 (출력: `false`)
    Sell,
    /// 판정 없음 (출력: `undetermined`)
    Undetermined,
}

impl TradingSignal {
    /// 출력 테이블의 `trading_signal` 값.
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingSignal::Buy => "true",
            TradingSignal::Sell => "false",
            TradingSignal::Undetermined => "undetermined",
        }
    }

    /// bool로 변환합니다. 판정 없음은 `None`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TradingSignal::Buy => Some(true),
            TradingSignal::Sell => Some(false),
            TradingSignal::Undetermined => None,
        }
    }
}

impl std::fmt::Display for TradingSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 추세 판정 결과 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub name: String,
    pub trend: TrendLabel,
}

/// 매매 신호 판정 결과 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalEntry {
    pub name: String,
    pub signal: TradingSignal,
}

/// 종목 코드 → 추세 판정 (코드 오름차순).
pub type TrendTable = BTreeMap<String, TrendEntry>;

/// 종목 코드 → 매매 신호 (코드 오름차순).
pub type SignalTable = BTreeMap<String, SignalEntry>;
