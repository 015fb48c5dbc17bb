//! 최신 봉의 KDJ-J 기반 매매 신호 판정.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use techscan_core::{IndicatorKind, SignalConfig, SignalEntry, SignalTable, TradingSignal};
use techscan_data::PanelStore;

/// 매매 신호 판정기.
///
/// 각 종목의 가장 최근 거래일 값만 보며 과거 신호를 기억하지 않습니다.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    buy_below: Decimal,
    sell_above: Decimal,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self {
            buy_below: dec!(20),
            sell_above: dec!(80),
        }
    }
}

impl SignalDetector {
    /// 기본 임계값(J < 20 매수, J > 80 매도)으로 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 임계값을 지정해 생성.
    pub fn with_thresholds(buy_below: Decimal, sell_above: Decimal) -> Self {
        Self {
            buy_below,
            sell_above,
        }
    }

    /// 설정에서 생성.
    pub fn from_config(config: &SignalConfig) -> Self {
        Self::with_thresholds(config.buy_below, config.sell_above)
    }

    /// 전 종목의 매매 신호를 판정합니다.
    ///
    /// 패널의 모든 종목이 결과에 포함됩니다. KDJ 컬럼이 없거나 최신 봉의 J가
    /// 미계산이면 `Undetermined`입니다.
    pub fn judge_buy_or_sell(&self, panel: &PanelStore) -> SignalTable {
        let has_kdj = panel.has_column(IndicatorKind::Kdj);
        let mut table = SignalTable::new();

        for ticker in panel.tickers() {
            let latest = panel.rows_for(ticker).max_by_key(|row| row.bar.date);

            let j = if has_kdj {
                latest.and_then(|row| row.indicators.kdj_j)
            } else {
                None
            };

            table.insert(
                ticker.to_string(),
                SignalEntry {
                    name: panel.name_of(ticker).unwrap_or_default().to_string(),
                    signal: self.classify(j),
                },
            );
        }

        info!(
            tickers = table.len(),
            buy = count(&table, TradingSignal::Buy),
            sell = count(&table, TradingSignal::Sell),
            undetermined = count(&table, TradingSignal::Undetermined),
            "매매 신호 판정 완료"
        );

        table
    }

    /// J 값을 매매 신호로 분류합니다.
    pub fn classify(&self, j: Option<Decimal>) -> TradingSignal {
        match j {
            Some(j) if j < self.buy_below => TradingSignal::Buy,
            Some(j) if j > self.sell_above => TradingSignal::Sell,
            _ => TradingSignal::Undetermined,
        }
    }
}

fn count(table: &SignalTable, signal: TradingSignal) -> usize {
    table.values().filter(|entry| entry.signal == signal).count()
}
