//! 분류 결과 출력 (table / csv / json).

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

use techscan_core::{SignalTable, TechScanError, TechScanResult, TrendTable};
use techscan_data::{write_signal_table, write_trend_table};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Invalid format: {}. Use: table, csv, json",
                s
            )),
        }
    }
}

#[derive(Serialize)]
struct TrendRecord<'a> {
    tic: &'a str,
    tic_name: &'a str,
    trend: i8,
}

#[derive(Serialize)]
struct SignalRecord<'a> {
    tic: &'a str,
    tic_name: &'a str,
    /// 판정 없음은 null
    trading_signal: Option<bool>,
}

/// 추세 테이블을 문자열로 만듭니다.
pub fn render_trend(table: &TrendTable, format: OutputFormat) -> TechScanResult<String> {
    match format {
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&format!("{:<10} {:<24} {:>5}\n", "TIC", "NAME", "TREND"));
            output.push_str(&"-".repeat(41));
            output.push('\n');
            for (ticker, entry) in table {
                output.push_str(&format!(
                    "{:<10} {:<24} {:>5}\n",
                    ticker,
                    truncate(&entry.name, 24),
                    entry.trend.value()
                ));
            }
            output.push('\n');
            output.push_str(&format!("Total: {} tickers", table.len()));
            Ok(output)
        }
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_trend_table(table, &mut buf)?;
            utf8(buf)
        }
        OutputFormat::Json => {
            let records: Vec<TrendRecord> = table
                .iter()
                .map(|(ticker, entry)| TrendRecord {
                    tic: ticker,
                    tic_name: &entry.name,
                    trend: entry.trend.value(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}

/// 매매 신호 테이블을 문자열로 만듭니다.
pub fn render_signals(table: &SignalTable, format: OutputFormat) -> TechScanResult<String> {
    match format {
        OutputFormat::Table => {
            let mut output = String::new();
            output.push_str(&format!("{:<10} {:<24} {:<14}\n", "TIC", "NAME", "SIGNAL"));
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for (ticker, entry) in table {
                output.push_str(&format!(
                    "{:<10} {:<24} {:<14}\n",
                    ticker,
                    truncate(&entry.name, 24),
                    entry.signal.as_str()
                ));
            }
            output.push('\n');
            output.push_str(&format!("Total: {} tickers", table.len()));
            Ok(output)
        }
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_signal_table(table, &mut buf)?;
            utf8(buf)
        }
        OutputFormat::Json => {
            let records: Vec<SignalRecord> = table
                .iter()
                .map(|(ticker, entry)| SignalRecord {
                    tic: ticker,
                    tic_name: &entry.name,
                    trading_signal: entry.signal.as_bool(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}

fn utf8(buf: Vec<u8>) -> TechScanResult<String> {
    String::from_utf8(buf)
        .map_err(|e| TechScanError::Serialization(format!("CSV 출력이 UTF-8이 아닙니다: {}", e)))
}

/// 파일 또는 stdout에 출력합니다.
pub fn emit(content: &str, output_path: Option<&Path>) -> Result<()> {
    if let Some(path) = output_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        info!("Output written to: {}", path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// 문자열 자르기 (UTF-8 안전).
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
