//! 전략 요약 비교 (Momentum vs Hodl BTC).

use anyhow::Result;
use ig_analytics::{compare_strategies, ComparisonRow, StatsService, StrategyReport};
use ig_core::{PriceLookup, StaticPriceLookup, TableSource};
use serde::Serialize;
use tracing::{info, warn};

use super::{format_json, format_value, OutputFormat};

/// 요약 명령 설정.
#[derive(Debug, Clone, Copy)]
pub struct StatsConfig {
    /// 최신 기간을 현재가로 재평가
    pub live: bool,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    strategies: &'a [StrategyReport],
    comparison: &'a [ComparisonRow],
}

/// 전략 요약을 계산하고 출력 문자열을 반환합니다.
///
/// 현재가 조회 실패 등 비치명적 알림은 경고 로그로 남기고 출력에도 포함합니다.
pub fn run_stats<S: TableSource>(service: &StatsService<S>, config: StatsConfig) -> Result<String> {
    let quotes = StaticPriceLookup::from_quotes(&service.config().quotes);
    let lookup: Option<&dyn PriceLookup> = if config.live {
        Some(&quotes as &dyn PriceLookup)
    } else {
        None
    };

    let reports = service.compare(lookup)?;
    for report in &reports {
        for notice in &report.report.notices {
            warn!(strategy = %report.name, "{}", notice);
        }
    }

    let named: Vec<(&str, &_)> = reports
        .iter()
        .map(|r| (r.name.as_str(), &r.report.summary))
        .collect();
    let rows = compare_strategies(&named);
    info!(strategies = reports.len(), live = config.live, "전략 요약 완료");

    match config.format {
        OutputFormat::Table => Ok(format_table(&reports, &rows)),
        OutputFormat::Json => format_json(&StatsOutput {
            strategies: &reports,
            comparison: &rows,
        }),
    }
}

fn format_table(reports: &[StrategyReport], rows: &[ComparisonRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{:<40}", "METRIC"));
    for report in reports {
        output.push_str(&format!(" {:>14}", report.name));
    }
    output.push('\n');
    output.push_str(&"-".repeat(40 + 15 * reports.len()));
    output.push('\n');

    for row in rows {
        output.push_str(&format!("{:<40}", row.metric));
        for value in &row.values {
            output.push_str(&format!(" {:>14}", format_value(*value)));
        }
        output.push('\n');
    }

    let notices: Vec<String> = reports
        .iter()
        .flat_map(|r| r.report.notices.iter().map(move |n| format!("  [{}] {}", r.name, n)))
        .collect();
    if !notices.is_empty() {
        output.push_str("\nNotices:\n");
        output.push_str(&notices.join("\n"));
        output.push('\n');
    }

    output
}
