//! CSV 내보내기.
//!
//! 지표 패널, 추세 테이블, 매매 신호 테이블을 CSV로 기록합니다.
//! 미계산(`None`) 지표는 이 단계에서만 0으로 기록됩니다.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use techscan_core::{
    SignalTable, TechScanResult, TrendTable, BAR_COLUMNS, INDICATOR_COLUMNS,
};

use crate::error::csv_write_error;
use crate::panel::PanelStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// 기본 출력 파일 경로.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// 지표 패널 (`<stem>_tech.csv`)
    pub panel: PathBuf,
    /// 추세 테이블 (`<stem>_tech_trend.csv`)
    pub trend: PathBuf,
    /// 매매 신호 테이블 (`<stem>_tech_trading.csv`)
    pub signals: PathBuf,
}

impl OutputPaths {
    /// 입력 파일 이름에서 출력 경로를 만듭니다.
    pub fn for_input(data_dir: &Path, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "panel".to_string());

        Self {
            panel: data_dir.join(format!("{}_tech.csv", stem)),
            trend: data_dir.join(format!("{}_tech_trend.csv", stem)),
            signals: data_dir.join(format!("{}_tech_trading.csv", stem)),
        }
    }
}

/// 지표가 병합된 패널을 기록합니다.
///
/// 헤더는 원본 14개 컬럼 다음 지표 10개 컬럼입니다. 병합되지 않은 종류의
/// 컬럼도 0으로 기록해 헤더를 고정합니다.
pub fn write_panel<W: Write>(store: &PanelStore, writer: W) -> TechScanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header: Vec<&str> = BAR_COLUMNS
        .iter()
        .chain(INDICATOR_COLUMNS.iter())
        .copied()
        .collect();
    wtr.write_record(&header).map_err(csv_write_error)?;

    for row in store.rows() {
        let bar = &row.bar;
        let mut record = vec![
            bar.date.format(DATE_FORMAT).to_string(),
            bar.ticker.clone(),
            bar.name.clone(),
            bar.day_of_week.to_string(),
            bar.open.to_string(),
            bar.close.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.volume.to_string(),
            bar.amount.to_string(),
            bar.price_swing.to_string(),
            bar.change_pct.to_string(),
            bar.change.to_string(),
            bar.turnover_rate.to_string(),
        ];
        record.extend(
            row.indicators
                .to_export_vec()
                .into_iter()
                .map(|v| v.to_string()),
        );
        wtr.write_record(&record).map_err(csv_write_error)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 추세 테이블을 기록합니다 (`tic, tic_name, trend`).
pub fn write_trend_table<W: Write>(table: &TrendTable, writer: W) -> TechScanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["tic", "tic_name", "trend"])
        .map_err(csv_write_error)?;

    for (ticker, entry) in table {
        let trend = entry.trend.value().to_string();
        wtr.write_record([ticker.as_str(), entry.name.as_str(), trend.as_str()])
            .map_err(csv_write_error)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 매매 신호 테이블을 기록합니다 (`tic, tic_name, trading_signal`).
pub fn write_signal_table<W: Write>(table: &SignalTable, writer: W) -> TechScanResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["tic", "tic_name", "trading_signal"])
        .map_err(csv_write_error)?;

    for (ticker, entry) in table {
        wtr.write_record([ticker.as_str(), entry.name.as_str(), entry.signal.as_str()])
            .map_err(csv_write_error)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 지표 패널을 파일로 기록합니다. 상위 디렉토리가 없으면 생성합니다.
pub fn write_panel_to_path(store: &PanelStore, path: &Path) -> TechScanResult<()> {
    let file = create_file(path)?;
    write_panel(store, file)?;
    info!(path = %path.display(), rows = store.len(), "지표 패널 저장");
    Ok(())
}

/// 추세 테이블을 파일로 기록합니다.
pub fn write_trend_table_to_path(table: &TrendTable, path: &Path) -> TechScanResult<()> {
    let file = create_file(path)?;
    write_trend_table(table, file)?;
    info!(path = %path.display(), tickers = table.len(), "추세 테이블 저장");
    Ok(())
}

/// 매매 신호 테이블을 파일로 기록합니다.
pub fn write_signal_table_to_path(table: &SignalTable, path: &Path) -> TechScanResult<()> {
    let file = create_file(path)?;
    write_signal_table(table, file)?;
    info!(path = %path.display(), tickers = table.len(), "매매 신호 테이블 저장");
    Ok(())
}

fn create_file(path: &Path) -> TechScanResult<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(fs::File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RawTable;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use techscan_core::{
        IndicatorFrame, IndicatorKind, IndicatorRow, IndicatorValues, SignalEntry,
        TradingSignal, TrendEntry, TrendLabel,
    };

    fn store() -> PanelStore {
        let csv = "date,tic,tic_name,day_of_week,open,close,high,low,volume,amount,price_swing,change_pct,change,turnover_rate\n\
                   2025-05-06,600000,浦发银行,2,10,10.5,11,9,1000,10000,2,0.5,0.05,0.1\n";
        PanelStore::load(&RawTable::from_csv_reader(csv.as_bytes()).unwrap()).unwrap()
    }

    fn output(buf: Vec<u8>) -> Vec<String> {
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_write_panel_resolves_none_to_zero() {
        let mut store = store();
        let mut frame = IndicatorFrame::new(IndicatorKind::Kdj);
        frame.rows.push(IndicatorRow {
            ticker: "600000".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
            values: IndicatorValues::Kdj {
                k: Some(dec!(55.56)),
                d: Some(dec!(51.85)),
                j: Some(dec!(62.96)),
            },
        });
        store.merge(frame).unwrap();

        let mut buf = Vec::new();
        write_panel(&store, &mut buf).unwrap();
        let lines = output(buf);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("bbi,kdj_k,kdj_d,kdj_j,dif,dea,macd,upper,mid,lower"));
        assert!(lines[1].starts_with("2025-05-06,600000,浦发银行,2,"));
        assert!(lines[1].ends_with(",0,55.56,51.85,62.96,0,0,0,0,0,0"));
    }

    #[test]
    fn test_write_trend_table() {
        let mut table = TrendTable::new();
        table.insert(
            "B".to_string(),
            TrendEntry {
                name: "Beta".to_string(),
                trend: TrendLabel::Down,
            },
        );
        table.insert(
            "A".to_string(),
            TrendEntry {
                name: "Alpha".to_string(),
                trend: TrendLabel::Up,
            },
        );

        let mut buf = Vec::new();
        write_trend_table(&table, &mut buf).unwrap();

        assert_eq!(
            output(buf),
            vec!["tic,tic_name,trend", "A,Alpha,1", "B,Beta,-1"]
        );
    }

    #[test]
    fn test_write_signal_table_uses_tri_state_strings() {
        let mut table = SignalTable::new();
        for (ticker, signal) in [
            ("A", TradingSignal::Buy),
            ("B", TradingSignal::Sell),
            ("C", TradingSignal::Undetermined),
        ] {
            table.insert(
                ticker.to_string(),
                SignalEntry {
                    name: ticker.to_lowercase(),
                    signal,
                },
            );
        }

        let mut buf = Vec::new();
        write_signal_table(&table, &mut buf).unwrap();

        assert_eq!(
            output(buf),
            vec![
                "tic,tic_name,trading_signal",
                "A,a,true",
                "B,b,false",
                "C,c,undetermined",
            ]
        );
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::for_input(Path::new("data"), Path::new("/tmp/data_sse50.csv"));
        assert_eq!(paths.panel, Path::new("data/data_sse50_tech.csv"));
        assert_eq!(paths.trend, Path::new("data/data_sse50_tech_trend.csv"));
        assert_eq!(paths.signals, Path::new("data/data_sse50_tech_trading.csv"));
    }
}
