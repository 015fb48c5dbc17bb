//! 적재 순서 독립성 테스트

use proptest::prelude::*;
use techscan_data::{PanelStore, RawTable};

const HEADER: &str = "date,tic,tic_name,day_of_week,open,close,high,low,volume,amount,price_swing,change_pct,change,turnover_rate";

fn lines(tickers: usize, days: usize) -> Vec<String> {
    let mut out = Vec::new();
    for t in 0..tickers {
        for d in 0..days {
            out.push(format!(
                "2025-01-{:02},T{},Name{},3,10,{}.5,{},9,100,1000,0,0,0,0",
                d + 1,
                t,
                t,
                10 + d,
                11 + d
            ));
        }
    }
    out
}

fn load(rows: &[String]) -> PanelStore {
    let csv = format!("{}\n{}\n", HEADER, rows.join("\n"));
    PanelStore::load(&RawTable::from_csv_reader(csv.as_bytes()).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn load_is_independent_of_row_order(
        tickers in 1usize..4,
        days in 1usize..20,
        seed in any::<u64>(),
    ) {
        let ordered = lines(tickers, days);

        // 결정적 셔플 (선형 합동 생성기)
        let mut shuffled = ordered.clone();
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        let a = load(&ordered);
        let b = load(&shuffled);

        prop_assert_eq!(a.rows(), b.rows());
        prop_assert_eq!(a.len(), tickers * days);
        for ticker in a.tickers() {
            let dates = a.dates_for(ticker);
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
