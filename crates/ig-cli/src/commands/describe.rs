//! 수익/손실 분포 및 수익률 범주 비중.

use anyhow::Result;
use ig_analytics::{ProfitLossDescription, ReturnShares, StatsService};
use ig_core::TableSource;
use serde::Serialize;

use super::{format_json, format_value, OutputFormat};

/// 분포 명령 설정.
#[derive(Debug, Clone)]
pub struct DescribeConfig {
    /// 시트 이름 (기본: 모멘텀 시트)
    pub sheet: Option<String>,
    /// ±500% 밖의 수익률 제외
    pub exclude_outliers: bool,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DescribeOutput<'a> {
    sheet: &'a str,
    description: &'a ProfitLossDescription,
    shares: &'a ReturnShares,
}

pub fn run_describe<S: TableSource>(
    service: &StatsService<S>,
    config: &DescribeConfig,
) -> Result<String> {
    let sheet = config
        .sheet
        .as_deref()
        .unwrap_or(&service.config().sources.momentum_sheet);
    let exclude = config.exclude_outliers || service.config().analytics.exclude_outliers;

    let description = service.profit_loss(sheet, exclude)?;
    let shares = service.shares(sheet)?;

    match config.format {
        OutputFormat::Table => Ok(format_table(&description, &shares)),
        OutputFormat::Json => format_json(&DescribeOutput {
            sheet,
            description: &description,
            shares: &shares,
        }),
    }
}

fn format_table(description: &ProfitLossDescription, shares: &ReturnShares) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<8} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for (label, d) in description.rows() {
        output.push_str(&format!(
            "{:<8} {:>6} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}\n",
            label, d.count, d.mean, d.std, d.min, d.q25, d.q50, d.q75, d.max
        ));
    }

    output.push_str("\nReturn shares:\n");
    for (label, share) in shares.entries() {
        output.push_str(&format!("  {:<8} {}\n", label, format_value(share)));
    }

    output
}
