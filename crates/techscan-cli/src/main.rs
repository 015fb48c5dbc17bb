//! 기술적 지표 파이프라인 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 지표 컬럼 추가 (data/data_sse50_tech.csv)
//! techscan indicators -i data/data_sse50.csv
//!
//! # 2025-05-01 ~ 2025-05-30 구간 추세
//! techscan trend -i data/data_sse50.csv -f 2025-05-01 -t 2025-05-30
//!
//! # 최신 봉 매매 신호를 JSON으로
//! techscan signals -i data/data_sse50.csv --format json
//!
//! # 세 결과 파일 일괄 생성
//! techscan run -i data/data_sse50.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::{error, info};

use techscan_cli::commands::analyze::{judge_signals, judge_trend, SignalsCommand, TrendCommand};
use techscan_cli::commands::indicators::{compute_indicators, IndicatorsCommand};
use techscan_cli::commands::input::{resolve_input, resolve_window};
use techscan_cli::commands::output::OutputFormat;
use techscan_cli::commands::run::{run_pipeline, RunCommand};
use techscan_core::{init_logging, AppConfig, LogConfig, TechScanError, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "techscan")]
#[command(about = "Daily panel technical indicators - BBI / KDJ / MACD / BOLL, trend and signal", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 원시 패널에 지표 컬럼 추가
    Indicators {
        /// 원시 패널 CSV (기본: 설정의 data_dir/input_file)
        #[arg(short, long)]
        input: Option<String>,

        /// 출력 파일 경로 (기본: <data_dir>/<stem>_tech.csv)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// BBI 기울기로 구간 추세 판정
    Trend {
        /// 원시 패널 CSV
        #[arg(short, long)]
        input: Option<String>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 상승/하락 임계값 (기본: 설정의 trend.threshold)
        #[arg(long)]
        threshold: Option<Decimal>,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 최신 봉 KDJ-J로 매매 신호 판정
    Signals {
        /// 원시 패널 CSV
        #[arg(short, long)]
        input: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 지표 / 추세 / 신호 세 파일 일괄 생성
    Run {
        /// 원시 패널 CSV
        #[arg(short, long)]
        input: Option<String>,

        /// 추세 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 추세 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 출력 디렉토리 (기본: 설정의 data_dir)
        #[arg(long)]
        output_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config))?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Err(err) = execute(cli.command, &config).await {
        match err.downcast_ref::<TechScanError>() {
            Some(e) if e.is_defect() => error!(error = %e, "내부 일관성 오류"),
            Some(e) if e.is_fatal() => error!(error = %e, "파이프라인 중단"),
            _ => error!(error = %err, "명령 실패"),
        }
        return Err(err);
    }

    Ok(())
}

async fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Indicators { input, output } => {
            let cmd = IndicatorsCommand {
                input: resolve_input(config, input.as_deref()),
                output: output.map(PathBuf::from),
            };

            let path = compute_indicators(config, &cmd).await?;
            println!("지표 패널 저장 위치: {}", path.display());
        }

        Commands::Trend {
            input,
            from,
            to,
            threshold,
            format,
            output,
        } => {
            let cmd = TrendCommand {
                input: resolve_input(config, input.as_deref()),
                window: resolve_window(config, from.as_deref(), to.as_deref())?,
                threshold,
                format: OutputFormat::parse(&format)?,
                output: output.map(PathBuf::from),
            };

            judge_trend(config, &cmd).await?;
        }

        Commands::Signals {
            input,
            format,
            output,
        } => {
            let cmd = SignalsCommand {
                input: resolve_input(config, input.as_deref()),
                format: OutputFormat::parse(&format)?,
                output: output.map(PathBuf::from),
            };

            judge_signals(config, &cmd).await?;
        }

        Commands::Run {
            input,
            from,
            to,
            output_dir,
        } => {
            let cmd = RunCommand {
                input: resolve_input(config, input.as_deref()),
                window: resolve_window(config, from.as_deref(), to.as_deref())?,
                output_dir: output_dir.map(PathBuf::from),
            };

            let report = run_pipeline(config, &cmd).await?;
            info!(
                rows = report.stats.rows,
                tickers = report.stats.tickers,
                "일괄 실행 완료"
            );
            println!("\n지표 패널: {}", report.paths.panel.display());
            println!("추세 테이블: {}", report.paths.trend.display());
            println!("매매 신호: {}", report.paths.signals.display());
        }
    }

    Ok(())
}
