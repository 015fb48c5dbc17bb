//! 저장소 기본 설정 파일 로딩 테스트

use rust_decimal_macros::dec;
use std::path::PathBuf;
use techscan_core::{AppConfig, LogConfig, LogFormat};

fn repo_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../config/default.toml")
}

#[test]
fn test_default_toml_matches_builtin_defaults() {
    let loaded = AppConfig::load(repo_config()).unwrap();
    let builtin = AppConfig::default();

    assert_eq!(loaded.indicators.bbi.periods, builtin.indicators.bbi.periods);
    assert_eq!(loaded.indicators.kdj.period, 9);
    assert_eq!(loaded.indicators.macd.slow_period, 26);
    assert_eq!(loaded.indicators.boll.std_dev_multiplier, dec!(2));
    assert_eq!(loaded.trend.threshold, builtin.trend.threshold);
    assert_eq!(loaded.trend.start_date, None);
    assert_eq!(loaded.signal.buy_below, dec!(20));
    assert_eq!(loaded.signal.sell_above, dec!(80));
    assert_eq!(loaded.data.input_path(), builtin.data.input_path());
}

#[test]
fn test_logging_section_converts_to_log_config() {
    let loaded = AppConfig::load(repo_config()).unwrap();
    let log = LogConfig::from(&loaded.logging);

    assert_eq!(log.level, "info");
    assert_eq!(log.format, LogFormat::Pretty);
}
