//! 다종목 일봉 패널 저장소.
//!
//! 패널은 (date, ticker) 오름차순으로 정렬된 행 목록이며, 각 행은 불변 `Bar`와
//! 지표 컬럼(`IndicatorSet`)을 가집니다. 종목별 행 인덱스와 (종목, 날짜) 키
//! 인덱스를 적재 시 한 번 만들어 두고, 이후 조회와 병합은 인덱스로 처리합니다.
//!
//! 지표 컬럼은 추가만 되고 제거되지 않습니다. 병합은 left join 의미를 가지므로
//! 행 수는 항상 보존됩니다.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use tracing::{debug, info, warn};

use techscan_core::{
    Bar, IndicatorFrame, IndicatorKind, IndicatorSet, PriceField, TechScanError,
    TechScanResult, BAR_COLUMNS,
};

use crate::table::RawTable;

/// 입력 날짜 형식.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 패널의 한 행.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub bar: Bar,
    pub indicators: IndicatorSet,
}

/// 병합 결과 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// 값이 채워진 패널 행 수
    pub matched: usize,
    /// 프레임에 없어 기존 값을 유지한 패널 행 수
    pub untouched: usize,
}

/// 패널 저장소.
#[derive(Debug, Clone, Default)]
pub struct PanelStore {
    rows: Vec<PanelRow>,
    /// 종목 → 날짜 오름차순 행 인덱스
    by_ticker: BTreeMap<String, Vec<usize>>,
    /// (종목, 날짜) → 행 인덱스
    by_key: HashMap<(String, NaiveDate), usize>,
    /// 종목 → 종목명
    names: BTreeMap<String, String>,
    /// 병합된 지표 종류
    columns: BTreeSet<IndicatorKind>,
}

impl PanelStore {
    /// 문자열 테이블에서 패널을 적재합니다.
    ///
    /// # 에러
    /// - 필수 컬럼 누락, 날짜/숫자 파싱 실패, (date, tic) 중복 시 `Format`
    ///
    /// 필수 셀이 비어 있는 행은 경고 로그와 함께 제외됩니다.
    pub fn load(table: &RawTable) -> TechScanResult<Self> {
        let layout = ColumnLayout::resolve(table)?;

        let mut bars = Vec::with_capacity(table.len());
        let mut dropped = 0usize;

        for (idx, record) in table.records().iter().enumerate() {
            // 헤더가 1행이므로 데이터 행 번호는 2부터
            let line = idx + 2;
            match layout.parse_bar(record, line)? {
                Some(bar) => bars.push(bar),
                None => {
                    dropped += 1;
                    warn!(line, "필수 값이 비어 있는 행 제외");
                }
            }
        }

        let store = Self::from_bars(bars)?;

        info!(
            rows = store.len(),
            tickers = store.ticker_count(),
            dropped,
            "패널 적재 완료"
        );

        Ok(store)
    }

    /// `Bar` 목록으로 패널을 생성합니다. 입력 순서와 무관하게 (date, ticker)로 정렬됩니다.
    pub fn from_bars(mut bars: Vec<Bar>) -> TechScanResult<Self> {
        bars.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        if let Some(pair) = bars
            .windows(2)
            .find(|pair| pair[0].sort_key() == pair[1].sort_key())
        {
            return Err(TechScanError::Format(format!(
                "중복 키: (date={}, tic={})",
                pair[0].date, pair[0].ticker
            )));
        }

        let rows: Vec<PanelRow> = bars
            .into_iter()
            .map(|bar| PanelRow {
                bar,
                indicators: IndicatorSet::default(),
            })
            .collect();

        let mut by_ticker: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_key = HashMap::with_capacity(rows.len());
        let mut names = BTreeMap::new();

        for (idx, row) in rows.iter().enumerate() {
            by_ticker
                .entry(row.bar.ticker.clone())
                .or_default()
                .push(idx);
            by_key.insert((row.bar.ticker.clone(), row.bar.date), idx);
            // 날짜 오름차순이므로 가장 최근 행의 종목명이 남음
            names.insert(row.bar.ticker.clone(), row.bar.name.clone());
        }

        Ok(Self {
            rows,
            by_ticker,
            by_key,
            names,
            columns: BTreeSet::new(),
        })
    }

    /// 종목의 한 필드 값을 날짜 순으로 반환합니다. 없는 종목이면 빈 벡터입니다.
    pub fn series_for(&self, ticker: &str, field: PriceField) -> Vec<Decimal> {
        self.rows_for(ticker).map(|row| row.bar.field(field)).collect()
    }

    /// 종목의 거래일 목록 (오름차순).
    pub fn dates_for(&self, ticker: &str) -> Vec<NaiveDate> {
        self.rows_for(ticker).map(|row| row.bar.date).collect()
    }

    /// 종목의 행을 날짜 순으로 순회합니다.
    pub fn rows_for<'a>(&'a self, ticker: &str) -> impl Iterator<Item = &'a PanelRow> + 'a {
        self.by_ticker
            .get(ticker)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&idx| &self.rows[idx])
    }

    /// 지표 프레임을 (ticker, date) 키로 left join 합니다.
    ///
    /// 프레임에 없는 패널 행은 해당 지표 컬럼의 기존 값을 유지합니다 (첫 병합이면
    /// 미계산). 검증을 먼저 끝낸 뒤 반영하므로 실패 시 패널은 변경되지 않습니다.
    ///
    /// # 에러
    /// - 패널에 없는 키, 프레임 내 중복 키, 프레임 종류와 다른 값이 있으면 `Consistency`
    pub fn merge(&mut self, frame: IndicatorFrame) -> TechScanResult<MergeStats> {
        let mut targets = Vec::with_capacity(frame.rows.len());
        let mut seen = vec![false; self.rows.len()];

        for row in &frame.rows {
            if row.values.kind() != frame.kind {
                return Err(TechScanError::Consistency(format!(
                    "{} 프레임에 {} 값이 섞여 있습니다: (tic={}, date={})",
                    frame.kind,
                    row.values.kind(),
                    row.ticker,
                    row.date
                )));
            }

            let idx = self
                .by_key
                .get(&(row.ticker.clone(), row.date))
                .copied()
                .ok_or_else(|| {
                    TechScanError::Consistency(format!(
                        "{} 행의 키가 패널에 없습니다: (tic={}, date={})",
                        frame.kind, row.ticker, row.date
                    ))
                })?;

            if seen[idx] {
                return Err(TechScanError::Consistency(format!(
                    "{} 프레임에 중복 키: (tic={}, date={})",
                    frame.kind, row.ticker, row.date
                )));
            }
            seen[idx] = true;
            targets.push(idx);
        }

        for (idx, row) in targets.iter().zip(frame.rows) {
            self.rows[*idx].indicators.apply(row.values);
        }
        self.columns.insert(frame.kind);

        let stats = MergeStats {
            matched: targets.len(),
            untouched: self.rows.len() - targets.len(),
        };

        debug!(
            kind = %frame.kind,
            matched = stats.matched,
            untouched = stats.untouched,
            "지표 병합"
        );

        Ok(stats)
    }

    /// 전체 행 (date, ticker 오름차순).
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    /// 종목 코드 목록 (오름차순).
    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.by_ticker.keys().map(String::as_str)
    }

    /// 종목 수.
    pub fn ticker_count(&self) -> usize {
        self.by_ticker.len()
    }

    /// 종목명을 조회합니다.
    pub fn name_of(&self, ticker: &str) -> Option<&str> {
        self.names.get(ticker).map(String::as_str)
    }

    /// 지표 종류가 병합되었는지 확인합니다.
    pub fn has_column(&self, kind: IndicatorKind) -> bool {
        self.columns.contains(&kind)
    }

    /// 병합된 지표 종류.
    pub fn columns(&self) -> impl Iterator<Item = IndicatorKind> + '_ {
        self.columns.iter().copied()
    }

    /// 패널의 첫 날짜와 마지막 날짜.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.bar.date, last.bar.date)),
            _ => None,
        }
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 필수 컬럼의 위치.
struct ColumnLayout {
    indices: [usize; BAR_COLUMNS.len()],
}

impl ColumnLayout {
    fn resolve(table: &RawTable) -> TechScanResult<Self> {
        let mut indices = [0usize; BAR_COLUMNS.len()];
        let mut missing = Vec::new();

        for (slot, name) in BAR_COLUMNS.iter().enumerate() {
            match table.column_index(name) {
                Some(idx) => indices[slot] = idx,
                None => missing.push(*name),
            }
        }

        if !missing.is_empty() {
            return Err(TechScanError::Format(format!(
                "필수 컬럼 누락: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { indices })
    }

    /// 한 레코드를 `Bar`로 변환합니다. 필수 셀이 비어 있으면 `None`.
    fn parse_bar(&self, record: &[String], line: usize) -> TechScanResult<Option<Bar>> {
        let mut cells = [""; BAR_COLUMNS.len()];
        for (slot, &idx) in self.indices.iter().enumerate() {
            let cell = record.get(idx).map(|s| s.trim()).unwrap_or("");
            if cell.is_empty() {
                return Ok(None);
            }
            cells[slot] = cell;
        }

        let date = NaiveDate::parse_from_str(cells[0], DATE_FORMAT).map_err(|_| {
            TechScanError::Format(format!(
                "{}행: 날짜 형식 오류 '{}' (YYYY-MM-DD 필요)",
                line, cells[0]
            ))
        })?;

        let number = |slot: usize| parse_decimal(cells[slot], BAR_COLUMNS[slot], line);

        let day_of_week = Some(number(3)?)
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_u8())
            .filter(|d| (1..=7).contains(d))
            .ok_or_else(|| {
                TechScanError::Format(format!(
                    "{}행: day_of_week는 1~7이어야 합니다: '{}'",
                    line, cells[3]
                ))
            })?;

        Ok(Some(Bar {
            date,
            ticker: cells[1].to_string(),
            name: cells[2].to_string(),
            day_of_week,
            open: number(4)?,
            close: number(5)?,
            high: number(6)?,
            low: number(7)?,
            volume: number(8)?,
            amount: number(9)?,
            price_swing: number(10)?,
            change_pct: number(11)?,
            change: number(12)?,
            turnover_rate: number(13)?,
        }))
    }
}

fn parse_decimal(cell: &str, column: &str, line: usize) -> TechScanResult<Decimal> {
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .map_err(|_| {
            TechScanError::Format(format!(
                "{}행: {} 컬럼 숫자 형식 오류 '{}'",
                line, column, cell
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use techscan_core::{IndicatorRow, IndicatorValues};

    const HEADER: &str = "date,tic,tic_name,day_of_week,open,close,high,low,volume,amount,price_swing,change_pct,change,turnover_rate";

    fn line(date: &str, tic: &str, close: &str) -> String {
        format!(
            "{},{},{}-name,2,10,{},11,9,1000,10000,2.0,0.5,0.05,0.1",
            date, tic, tic, close
        )
    }

    fn table(lines: &[String]) -> RawTable {
        let csv = format!("{}\n{}\n", HEADER, lines.join("\n"));
        RawTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    fn bbi_row(ticker: &str, date: NaiveDate, bbi: Decimal) -> IndicatorRow {
        IndicatorRow {
            ticker: ticker.to_string(),
            date,
            values: IndicatorValues::Bbi { bbi: Some(bbi) },
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_sorts_by_date_then_ticker() {
        let store = PanelStore::load(&table(&[
            line("2025-05-07", "B", "10.2"),
            line("2025-05-06", "B", "10.1"),
            line("2025-05-07", "A", "20.2"),
            line("2025-05-06", "A", "20.1"),
        ]))
        .unwrap();

        let keys: Vec<(NaiveDate, &str)> = store.rows().iter().map(|r| r.bar.sort_key()).collect();
        assert_eq!(
            keys,
            vec![
                (ymd(2025, 5, 6), "A"),
                (ymd(2025, 5, 6), "B"),
                (ymd(2025, 5, 7), "A"),
                (ymd(2025, 5, 7), "B"),
            ]
        );
        assert_eq!(store.ticker_count(), 2);
    }

    #[test]
    fn test_load_missing_column_is_format_error() {
        let csv = "date,tic,close\n2025-05-06,A,10\n";
        let raw = RawTable::from_csv_reader(csv.as_bytes()).unwrap();

        let err = PanelStore::load(&raw).unwrap_err();
        match err {
            TechScanError::Format(msg) => {
                assert!(msg.contains("tic_name"));
                assert!(msg.contains("turnover_rate"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_bad_date_is_format_error() {
        let err = PanelStore::load(&table(&[line("2025/05/06", "A", "10")])).unwrap_err();
        assert!(matches!(err, TechScanError::Format(_)));
    }

    #[test]
    fn test_load_bad_number_is_format_error() {
        let err = PanelStore::load(&table(&[line("2025-05-06", "A", "ten")])).unwrap_err();
        assert!(matches!(err, TechScanError::Format(_)));
    }

    #[test]
    fn test_load_fractional_day_of_week_is_format_error() {
        let row = line("2025-05-06", "A", "10").replacen(",2,", ",2.7,", 1);
        let err = PanelStore::load(&table(&[row])).unwrap_err();
        assert!(matches!(err, TechScanError::Format(_)));

        // 정수 표기는 허용
        let row = line("2025-05-06", "A", "10").replacen(",2,", ",2.0,", 1);
        let store = PanelStore::load(&table(&[row])).unwrap();
        assert_eq!(store.rows()[0].bar.day_of_week, 2);
    }

    #[test]
    fn test_load_duplicate_key_is_format_error() {
        let err = PanelStore::load(&table(&[
            line("2025-05-06", "A", "10"),
            line("2025-05-06", "A", "11"),
        ]))
        .unwrap_err();
        assert!(matches!(err, TechScanError::Format(_)));
    }

    #[test]
    fn test_load_drops_rows_with_empty_cells() {
        let store = PanelStore::load(&table(&[
            line("2025-05-06", "A", "10"),
            line("2025-05-07", "A", ""),
        ]))
        .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_keeps_leading_zeros_and_scientific_numbers() {
        let csv = format!(
            "{}\n2025-05-06,000001,平安银行,2,10,10.5,11,9,1.2e6,1.26e7,2,0.5,0.05,0.1\n",
            HEADER
        );
        let store = PanelStore::load(&RawTable::from_csv_reader(csv.as_bytes()).unwrap()).unwrap();

        assert_eq!(store.tickers().collect::<Vec<_>>(), vec!["000001"]);
        assert_eq!(store.name_of("000001"), Some("平安银行"));
        assert_eq!(store.rows()[0].bar.volume, dec!(1200000));
    }

    #[test]
    fn test_series_for() {
        let store = PanelStore::load(&table(&[
            line("2025-05-07", "A", "10.2"),
            line("2025-05-06", "A", "10.1"),
            line("2025-05-06", "B", "99"),
        ]))
        .unwrap();

        assert_eq!(
            store.series_for("A", PriceField::Close),
            vec![dec!(10.1), dec!(10.2)]
        );
        assert!(store.series_for("Z", PriceField::Close).is_empty());
    }

    #[test]
    fn test_merge_preserves_cardinality_and_marks_unmatched_as_not_computed() {
        let mut store = PanelStore::load(&table(&[
            line("2025-05-06", "A", "10"),
            line("2025-05-07", "A", "11"),
            line("2025-05-06", "B", "20"),
        ]))
        .unwrap();

        let mut frame = IndicatorFrame::new(IndicatorKind::Bbi);
        frame.rows.push(bbi_row("A", ymd(2025, 5, 7), dec!(10.5)));

        let stats = store.merge(frame).unwrap();
        assert_eq!(stats, MergeStats { matched: 1, untouched: 2 });
        assert_eq!(store.len(), 3);
        assert!(store.has_column(IndicatorKind::Bbi));
        assert!(!store.has_column(IndicatorKind::Kdj));

        let a: Vec<Option<Decimal>> = store.rows_for("A").map(|r| r.indicators.bbi).collect();
        assert_eq!(a, vec![None, Some(dec!(10.5))]);
    }

    #[test]
    fn test_merge_keeps_prior_values_for_unmatched_rows() {
        let mut store = PanelStore::load(&table(&[
            line("2025-05-06", "A", "10"),
            line("2025-05-07", "A", "11"),
        ]))
        .unwrap();

        let mut first = IndicatorFrame::new(IndicatorKind::Bbi);
        first.rows.push(bbi_row("A", ymd(2025, 5, 6), dec!(1)));
        first.rows.push(bbi_row("A", ymd(2025, 5, 7), dec!(2)));
        store.merge(first).unwrap();

        let mut second = IndicatorFrame::new(IndicatorKind::Bbi);
        second.rows.push(bbi_row("A", ymd(2025, 5, 7), dec!(3)));
        store.merge(second).unwrap();

        let a: Vec<Option<Decimal>> = store.rows_for("A").map(|r| r.indicators.bbi).collect();
        assert_eq!(a, vec![Some(dec!(1)), Some(dec!(3))]);
    }

    #[test]
    fn test_merge_unknown_key_is_consistency_error_and_leaves_panel_unchanged() {
        let mut store = PanelStore::load(&table(&[line("2025-05-06", "A", "10")])).unwrap();

        let mut frame = IndicatorFrame::new(IndicatorKind::Bbi);
        frame.rows.push(bbi_row("A", ymd(2025, 5, 6), dec!(1)));
        frame.rows.push(bbi_row("Z", ymd(2025, 5, 6), dec!(1)));

        let err = store.merge(frame).unwrap_err();
        assert!(matches!(err, TechScanError::Consistency(_)));
        assert_eq!(store.rows()[0].indicators.bbi, None);
        assert!(!store.has_column(IndicatorKind::Bbi));
    }

    #[test]
    fn test_merge_mixed_kind_is_consistency_error() {
        let mut store = PanelStore::load(&table(&[line("2025-05-06", "A", "10")])).unwrap();

        let mut frame = IndicatorFrame::new(IndicatorKind::Kdj);
        frame.rows.push(bbi_row("A", ymd(2025, 5, 6), dec!(1)));

        assert!(matches!(
            store.merge(frame),
            Err(TechScanError::Consistency(_))
        ));
    }

    #[test]
    fn test_merges_commute() {
        let lines = [
            line("2025-05-06", "A", "10"),
            line("2025-05-06", "B", "20"),
        ];
        let bbi = || {
            let mut f = IndicatorFrame::new(IndicatorKind::Bbi);
            f.rows.push(bbi_row("B", ymd(2025, 5, 6), dec!(7)));
            f
        };
        let kdj = || {
            let mut f = IndicatorFrame::new(IndicatorKind::Kdj);
            f.rows.push(IndicatorRow {
                ticker: "A".to_string(),
                date: ymd(2025, 5, 6),
                values: IndicatorValues::Kdj {
                    k: Some(dec!(50)),
                    d: Some(dec!(50)),
                    j: Some(dec!(50)),
                },
            });
            f
        };

        let mut left = PanelStore::load(&table(&lines)).unwrap();
        left.merge(bbi()).unwrap();
        left.merge(kdj()).unwrap();

        let mut right = PanelStore::load(&table(&lines)).unwrap();
        right.merge(kdj()).unwrap();
        right.merge(bbi()).unwrap();

        assert_eq!(left.rows(), right.rows());
    }

    #[test]
    fn test_name_lookup_uses_latest_row() {
        let csv = format!(
            "{}\n2025-05-06,A,Old,2,1,1,1,1,1,1,1,1,1,1\n2025-05-07,A,New,3,1,1,1,1,1,1,1,1,1,1\n",
            HEADER
        );
        let store = PanelStore::load(&RawTable::from_csv_reader(csv.as_bytes()).unwrap()).unwrap();
        assert_eq!(store.name_of("A"), Some("New"));
        assert_eq!(store.name_of("B"), None);
    }
}
