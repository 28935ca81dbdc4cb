//! 음의 상관관계 탐색.

use anyhow::Result;
use ig_analytics::{CorrelationFilter, CorrelationReport, StatsService};
use ig_core::TableSource;

use super::{format_json, OutputFormat};

/// 상관관계 명령 설정. 지정하지 않은 값은 설정 파일의 `[correlation]`을 따릅니다.
#[derive(Debug, Clone)]
pub struct CorrelationConfig {
    pub threshold: Option<f64>,
    pub base_assets: Option<Vec<String>>,
    /// 가격 대신 변화율 사용
    pub use_returns: bool,
    pub format: OutputFormat,
}

pub fn run_correlation<S: TableSource>(
    service: &StatsService<S>,
    config: &CorrelationConfig,
) -> Result<String> {
    let section = &service.config().correlation;
    let threshold = config.threshold.unwrap_or(section.threshold);
    let base_assets = config
        .base_assets
        .clone()
        .unwrap_or_else(|| section.base_assets.clone())
        .into_iter()
        .map(|b| b.trim().to_uppercase())
        .filter(|b| !b.is_empty())
        .collect();

    let filter = CorrelationFilter::new(threshold, base_assets)?;
    let report = service.correlation(&filter, config.use_returns || section.use_returns)?;

    match config.format {
        OutputFormat::Table => Ok(format_table(&report, &filter)),
        OutputFormat::Json => format_json(&report),
    }
}

fn format_table(report: &CorrelationReport, filter: &CorrelationFilter) -> String {
    let mut output = String::new();
    let assets = report.matrix.assets();

    output.push_str("Correlation matrix:\n");
    output.push_str(&format!("{:<10}", ""));
    for asset in assets {
        output.push_str(&format!(" {:>8}", asset));
    }
    output.push('\n');
    for (asset, row) in assets.iter().zip(&report.matrix.values) {
        output.push_str(&format!("{:<10}", asset));
        for value in row {
            output.push_str(&format!(" {:>8.3}", value));
        }
        output.push('\n');
    }

    let bases = if filter.base_assets.is_empty() {
        "All".to_string()
    } else {
        filter.base_assets.join(", ")
    };
    output.push_str(&format!(
        "\nNegative correlations (threshold < {}, base coins: {}):\n",
        filter.threshold, bases
    ));
    for base in report.filtered.base_assets() {
        let Some(others) = report.filtered.counterparts(base) else {
            continue;
        };
        if others.is_empty() {
            continue;
        }
        let pairs: Vec<String> = others
            .iter()
            .map(|(other, value)| format!("{} ({:.2})", other, value))
            .collect();
        output.push_str(&format!("  {:<8} {}\n", base, pairs.join(", ")));
    }

    if !report.related.is_empty() {
        output.push_str(&format!("\nRelated assets: {}\n", report.related.join(", ")));
    }

    output
}
