//! 설정 관리.
//!
//! 설정은 기본값 → TOML 파일 → 환경 변수(`TECHSCAN__SECTION__KEY`) 순으로
//! 덮어씁니다. 모든 섹션은 `Default`를 구현하므로 설정 파일 없이도 실행됩니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TechScanError, TechScanResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "TECHSCAN";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 데이터 파일 설정
    pub data: DataConfig,
    /// 지표 파라미터
    pub indicators: IndicatorConfig,
    /// 추세 판정 설정
    pub trend: TrendConfig,
    /// 매매 신호 설정
    pub signal: SignalConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 데이터 파일 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 입출력 파일 디렉토리
    pub data_dir: PathBuf,
    /// 기본 입력 파일명
    pub input_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_file: "data_sse50.csv".to_string(),
        }
    }
}

impl DataConfig {
    /// 기본 입력 파일의 전체 경로.
    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(&self.input_file)
    }
}

/// 지표 파라미터 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub bbi: BbiConfig,
    pub kdj: KdjConfig,
    pub macd: MacdConfig,
    pub boll: BollConfig,
}

/// BBI 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BbiConfig {
    /// 평균할 이동평균 기간들
    pub periods: Vec<usize>,
}

impl Default for BbiConfig {
    fn default() -> Self {
        Self {
            periods: vec![3, 6, 12, 24],
        }
    }
}

/// KDJ 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KdjConfig {
    /// RSV 윈도우
    pub period: usize,
    /// K 평활 기간
    pub k_smooth: usize,
    /// D 평활 기간
    pub d_smooth: usize,
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self {
            period: 9,
            k_smooth: 3,
            d_smooth: 3,
        }
    }
}

/// MACD 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// 볼린저 밴드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BollConfig {
    pub period: usize,
    pub std_dev_multiplier: Decimal,
}

impl Default for BollConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 추세 판정 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendConfig {
    /// BBI 1차 차분 평균의 상승/하락 임계값
    pub threshold: Decimal,
    /// 판정 구간 시작일 (없으면 패널의 첫 날짜)
    pub start_date: Option<NaiveDate>,
    /// 판정 구간 종료일 (없으면 패널의 마지막 날짜)
    pub end_date: Option<NaiveDate>,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            threshold: dec!(0.5),
            start_date: None,
            end_date: None,
        }
    }
}

/// 매매 신호 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalConfig {
    /// KDJ-J가 이 값보다 작으면 매수
    pub buy_below: Decimal,
    /// KDJ-J가 이 값보다 크면 매도
    pub sell_above: Decimal,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            buy_below: dec!(20),
            sell_above: dec!(80),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TechScanResult<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TechScanResult<Self> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정 값의 일관성을 검사합니다.
    pub fn validate(&self) -> TechScanResult<()> {
        if self.signal.buy_below > self.signal.sell_above {
            return Err(TechScanError::Config(format!(
                "signal.buy_below({})가 signal.sell_above({})보다 큽니다",
                self.signal.buy_below, self.signal.sell_above
            )));
        }
        if self.trend.threshold < Decimal::ZERO {
            return Err(TechScanError::Config(format!(
                "trend.threshold는 음수일 수 없습니다: {}",
                self.trend.threshold
            )));
        }
        if let (Some(start), Some(end)) = (self.trend.start_date, self.trend.end_date) {
            if start > end {
                return Err(TechScanError::Config(format!(
                    "trend.start_date({})가 trend.end_date({})보다 늦습니다",
                    start, end
                )));
            }
        }
        if self.indicators.bbi.periods.is_empty() || self.indicators.bbi.periods.contains(&0) {
            return Err(TechScanError::Config(
                "indicators.bbi.periods는 0이 아닌 기간을 하나 이상 포함해야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
