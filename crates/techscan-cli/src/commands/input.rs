//! 명령 인자 해석 (입력 경로, 날짜, 추세 구간).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use techscan_analytics::TrendWindow;
use techscan_core::AppConfig;

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
}

/// 입력 경로. 지정하지 않으면 설정의 `data_dir/input_file`.
pub fn resolve_input(config: &AppConfig, input: Option<&str>) -> PathBuf {
    input
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data.input_path())
}

/// 추세 판정 구간.
///
/// 명령행 값이 우선이고, 없으면 설정의 `trend.start_date` / `trend.end_date`,
/// 그것도 없으면 패널의 날짜 범위가 쓰입니다.
pub fn resolve_window(
    config: &AppConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<TrendWindow> {
    let start = match from {
        Some(s) => Some(parse_date(s)?),
        None => config.trend.start_date,
    };
    let end = match to {
        Some(s) => Some(parse_date(s)?),
        None => config.trend.end_date,
    };

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            bail!("Start date must be before end date: {} > {}", start, end);
        }
    }

    Ok(TrendWindow::new(start, end))
}
