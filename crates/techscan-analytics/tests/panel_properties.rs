//! 패널 병합 / 반올림 성질 테스트

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use techscan_analytics::{IndicatorEngine, Pipeline};
use techscan_core::{Bar, DecimalExt, IndicatorKind};
use techscan_data::PanelStore;

fn bars(series: &[Vec<u32>]) -> Vec<Bar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let mut bars = Vec::new();

    for (idx, closes) in series.iter().enumerate() {
        let ticker = format!("{:06}", 600000 + idx);
        for (day, cents) in closes.iter().enumerate() {
            let date = start + Duration::days(day as i64);
            let close = Decimal::new(*cents as i64, 2);
            bars.push(Bar {
                date,
                ticker: ticker.clone(),
                name: format!("T{}", idx),
                day_of_week: Bar::iso_day_of_week(date),
                open: close,
                close,
                high: close + Decimal::new(*cents as i64 % 50, 2),
                low: close - Decimal::new(*cents as i64 % 30, 2),
                volume: Decimal::from(1000),
                amount: Decimal::from(10000),
                price_swing: Decimal::ZERO,
                change_pct: Decimal::ZERO,
                change: Decimal::ZERO,
                turnover_rate: Decimal::ZERO,
            });
        }
    }

    bars
}

fn series_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    prop::collection::vec(prop::collection::vec(100u32..100_000, 1..45), 1..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn merge_preserves_cardinality(series in series_strategy()) {
        let input = bars(&series);
        let mut panel = PanelStore::from_bars(input.clone()).unwrap();
        let before: Vec<(String, usize)> = panel
            .tickers()
            .map(|t| (t.to_string(), panel.rows_for(t).count()))
            .collect();

        Pipeline::default().augment(&mut panel).unwrap();

        prop_assert_eq!(panel.len(), input.len());
        for (ticker, count) in before {
            prop_assert_eq!(panel.rows_for(&ticker).count(), count);
        }
    }

    #[test]
    fn defined_values_have_two_decimal_places(series in series_strategy()) {
        let mut panel = PanelStore::from_bars(bars(&series)).unwrap();
        Pipeline::default().augment(&mut panel).unwrap();

        for row in panel.rows() {
            for value in row.indicators.to_vec().into_iter().flatten() {
                prop_assert!(value.is_indicator_rounded());
            }
        }
    }

    #[test]
    fn merge_order_does_not_matter(series in series_strategy()) {
        let input = bars(&series);
        let engine = IndicatorEngine::new();

        let mut forward = PanelStore::from_bars(input.clone()).unwrap();
        for kind in IndicatorKind::ALL {
            let frame = engine.compute(&forward, kind).unwrap();
            forward.merge(frame).unwrap();
        }

        let mut reverse = PanelStore::from_bars(input).unwrap();
        for kind in IndicatorKind::ALL.iter().rev() {
            let frame = engine.compute(&reverse, *kind).unwrap();
            reverse.merge(frame).unwrap();
        }

        prop_assert_eq!(forward.rows(), reverse.rows());
    }

    #[test]
    fn warm_up_cells_stay_undefined(series in series_strategy()) {
        let mut panel = PanelStore::from_bars(bars(&series)).unwrap();
        Pipeline::default().augment(&mut panel).unwrap();

        let tickers: Vec<String> = panel.tickers().map(str::to_string).collect();
        for ticker in tickers {
            for (idx, row) in panel.rows_for(&ticker).enumerate() {
                prop_assert_eq!(row.indicators.bbi.is_some(), idx >= 23);
                prop_assert_eq!(row.indicators.kdj_j.is_some(), idx >= 8);
                prop_assert_eq!(row.indicators.boll_mid.is_some(), idx >= 19);
                prop_assert!(row.indicators.dif.is_some());
            }
        }
    }
}
