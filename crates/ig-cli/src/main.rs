//! 전략 통계 대시보드 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # Momentum vs Hodl BTC 요약 (스냅샷)
//! ig stats
//!
//! # 설정의 [quotes] 현재가로 최신 기간 재평가
//! ig stats --live --format json
//!
//! # 수익/손실 분포 (이상치 제외)
//! ig describe --exclude-outliers
//!
//! # BTC, ETH 기준 -0.5 미만의 음의 상관
//! ig correlation --threshold -0.5 --base BTC,ETH
//!
//! # 복리 수익률 동학
//! ig compound --sheet hodl_btc
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use ig_analytics::StatsService;
use ig_cli::commands::compound::{run_compound, CompoundConfig};
use ig_cli::commands::correlation::{run_correlation, CorrelationConfig};
use ig_cli::commands::describe::{run_describe, DescribeConfig};
use ig_cli::commands::stats::{run_stats, StatsConfig};
use ig_cli::commands::OutputFormat;
use ig_cli::CsvSheetSource;
use ig_core::{init_logging, AppConfig, LogConfig};
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "ig")]
#[command(about = "Strategy statistics dashboard - Momentum vs HODL BTC", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: String,

    /// 시트 CSV 디렉토리 (기본: 설정의 sources.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 전략 요약 비교
    Stats {
        /// 최신 기간을 현재가로 재평가
        #[arg(long)]
        live: bool,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 수익/손실 분포와 수익률 범주 비중
    Describe {
        /// 시트 이름 (기본: 모멘텀 시트)
        #[arg(short, long)]
        sheet: Option<String>,

        /// ±500% 밖의 수익률 제외
        #[arg(long)]
        exclude_outliers: bool,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 음의 상관관계 탐색
    Correlation {
        /// 상관계수 임계값 (-1.0 ~ 0.0)
        #[arg(short, long, allow_hyphen_values = true)]
        threshold: Option<f64>,

        /// 기준 코인 (쉼표로 구분, 예: BTC,ETH)
        #[arg(short, long, value_delimiter = ',')]
        base: Option<Vec<String>>,

        /// 가격 대신 변화율로 계산
        #[arg(long)]
        returns: bool,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// 복리 수익률 동학
    Compound {
        /// 시트 이름 (기본: 모멘텀 시트)
        #[arg(short, long)]
        sheet: Option<String>,

        /// 출력 형식 (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    // .env 파일은 없어도 됨
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config))?;
    if let Some(dir) = cli.data_dir {
        config.sources.data_dir = dir;
    }

    let log_format = std::env::var("LOG_FORMAT").ok();
    init_logging(LogConfig::from(&config.logging).with_format_override(log_format.as_deref()))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    config.validate()?;
    debug!(data_dir = %config.sources.data_dir, "설정 로드 완료");

    let source = CsvSheetSource::new(&config.sources.data_dir);
    let service = StatsService::new(source, config);

    let result = match cli.command {
        Commands::Stats { live, format } => run_stats(
            &service,
            StatsConfig {
                live,
                format: OutputFormat::parse(&format)?,
            },
        ),
        Commands::Describe {
            sheet,
            exclude_outliers,
            format,
        } => run_describe(
            &service,
            &DescribeConfig {
                sheet,
                exclude_outliers,
                format: OutputFormat::parse(&format)?,
            },
        ),
        Commands::Correlation {
            threshold,
            base,
            returns,
            format,
        } => run_correlation(
            &service,
            &CorrelationConfig {
                threshold,
                base_assets: base,
                use_returns: returns,
                format: OutputFormat::parse(&format)?,
            },
        ),
        Commands::Compound { sheet, format } => run_compound(
            &service,
            &CompoundConfig {
                sheet,
                format: OutputFormat::parse(&format)?,
            },
        ),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            Err(e)
        }
    }
}
