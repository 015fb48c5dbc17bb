//! BBI 기울기 기반 구간 추세 판정.
//!
//! 구간 `[start, end]` 안에서 종목별 BBI의 1차 차분 평균을 구하고 임계값과
//! 비교해 상승(+1), 하락(-1), 횡보(0)로 분류합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use techscan_core::{
    IndicatorKind, TechScanError, TechScanResult, TrendConfig, TrendEntry, TrendLabel, TrendTable,
};
use techscan_data::PanelStore;

/// 구간 추세 판정기.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    threshold: Decimal,
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self {
            threshold: dec!(0.5),
        }
    }
}

impl TrendAnalyzer {
    /// 기본 임계값(0.5)으로 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 임계값을 지정해 생성.
    pub fn with_threshold(threshold: Decimal) -> Self {
        Self { threshold }
    }

    /// 설정에서 생성.
    pub fn from_config(config: &TrendConfig) -> Self {
        Self::with_threshold(config.threshold)
    }

    /// 상승/하락 임계값.
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// 구간 내 종목별 추세를 판정합니다.
    ///
    /// 구간에 행이 없거나 구간 내 BBI가 하나도 계산되지 않은 종목은 결과에서
    /// 제외됩니다. BBI 컬럼이 병합되지 않은 패널이면 빈 테이블을 반환합니다.
    ///
    /// # 에러
    /// - `start > end`이면 `InvalidInput`
    pub fn judge_trend(
        &self,
        panel: &PanelStore,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TechScanResult<TrendTable> {
        if start > end {
            return Err(TechScanError::InvalidInput(format!(
                "시작일({})이 종료일({})보다 늦습니다",
                start, end
            )));
        }

        let mut table = TrendTable::new();

        if !panel.has_column(IndicatorKind::Bbi) {
            debug!("BBI 컬럼 없음, 추세 판정 생략");
            return Ok(table);
        }

        for ticker in panel.tickers() {
            let bbi: Vec<Option<Decimal>> = panel
                .rows_for(ticker)
                .filter(|row| row.bar.date >= start && row.bar.date <= end)
                .map(|row| row.indicators.bbi)
                .collect();

            if bbi.iter().all(Option::is_none) {
                continue;
            }

            let slope = mean_first_difference(&bbi);
            let trend = self.classify(slope);

            debug!(ticker, %slope, trend = trend.value(), "추세 판정");

            table.insert(
                ticker.to_string(),
                TrendEntry {
                    name: panel.name_of(ticker).unwrap_or_default().to_string(),
                    trend,
                },
            );
        }

        info!(
            %start,
            %end,
            tickers = table.len(),
            up = count(&table, TrendLabel::Up),
            down = count(&table, TrendLabel::Down),
            "추세 판정 완료"
        );

        Ok(table)
    }

    /// 기울기를 추세 라벨로 분류합니다.
    pub fn classify(&self, slope: Decimal) -> TrendLabel {
        if slope > self.threshold {
            TrendLabel::Up
        } else if slope < -self.threshold {
            TrendLabel::Down
        } else {
            TrendLabel::Flat
        }
    }
}

/// 연속한 값의 1차 차분 평균. 미계산 값이 걸린 차분은 건너뛰며, 차분이 없으면 0.
pub fn mean_first_difference(values: &[Option<Decimal>]) -> Decimal {
    let diffs: Vec<Decimal> = values
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(curr)) => Some(curr - prev),
            _ => None,
        })
        .collect();

    if diffs.is_empty() {
        return Decimal::ZERO;
    }

    diffs.iter().sum::<Decimal>() / Decimal::from(diffs.len())
}

fn count(table: &TrendTable, label: TrendLabel) -> usize {
    table.values().filter(|entry| entry.trend == label).count()
}
