//! 복리 수익률 동학 출력.

use anyhow::Result;
use ig_analytics::StatsService;
use ig_core::TableSource;

use super::{format_json, OutputFormat};

#[derive(Debug, Clone)]
pub struct CompoundConfig {
    /// 시트 이름 (기본: 모멘텀 시트)
    pub sheet: Option<String>,
    pub format: OutputFormat,
}

pub fn run_compound<S: TableSource>(
    service: &StatsService<S>,
    config: &CompoundConfig,
) -> Result<String> {
    let sheet = config
        .sheet
        .as_deref()
        .unwrap_or(&service.config().sources.momentum_sheet);
    let series = service.compound(sheet)?;

    match config.format {
        OutputFormat::Json => format_json(&series),
        OutputFormat::Table => {
            let mut output = format!("{:<12} {:>10}\n", "DATE", "COMPOUND");
            for point in &series {
                output.push_str(&format!(
                    "{:<12} {:>10.4}\n",
                    point.date.to_string(),
                    point.value
                ));
            }
            Ok(output)
        }
    }
}
