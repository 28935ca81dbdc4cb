//! CSV 파일 기반 시트 소스.
//!
//! 시트 이름 `name`을 `<data_dir>/<name>.csv`로 읽습니다.

use ig_core::{Cell, StatsError, StatsResult, Table, TableSource};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV 디렉토리를 시트 저장소로 사용하는 테이블 소스.
#[derive(Debug, Clone)]
pub struct CsvSheetSource {
    dir: PathBuf,
}

impl CsvSheetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 시트 이름에 해당하는 파일 경로.
    ///
    /// 디렉토리 밖을 가리키는 이름은 거부합니다.
    pub fn sheet_path(&self, sheet: &str) -> StatsResult<PathBuf> {
        if sheet.is_empty() || sheet.contains(['/', '\\']) || sheet.contains("..") {
            return Err(StatsError::InvalidParameter(format!(
                "잘못된 시트 이름: {:?}",
                sheet
            )));
        }
        Ok(self.dir.join(format!("{}.csv", sheet)))
    }
}

impl TableSource for CsvSheetSource {
    fn query(&self, query: &str) -> StatsResult<Table> {
        let path = self.sheet_path(query)?;
        let source_err = |e: csv::Error| StatsError::Source(format!("{}: {}", path.display(), e));

        let mut reader = csv::Reader::from_path(&path).map_err(source_err)?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(source_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut table = Table::new(headers);
        for result in reader.records() {
            let record = result.map_err(source_err)?;
            table.push_row(record.iter().map(Cell::parse).collect())?;
        }

        debug!(sheet = query, rows = table.len(), "시트 로드");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_sheet() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("raw_data.csv"),
            "datetime, BTC,ETH\n2024-01-01,100,50\n2024-01-02,,51\n",
        )
        .unwrap();

        let table = CsvSheetSource::new(dir.path()).query("raw_data").unwrap();
        assert_eq!(table.columns(), &["datetime", "BTC", "ETH"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1], Cell::Number(100.0));
        assert!(table.rows()[1][1].is_empty());
    }

    #[test]
    fn test_missing_sheet_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvSheetSource::new(dir.path()).query("nope").unwrap_err();
        assert!(matches!(err, StatsError::Source(_)));
    }

    #[test]
    fn test_rejects_path_traversal() {
        let source = CsvSheetSource::new("data");
        assert!(source.sheet_path("../secret").is_err());
        assert!(source.sheet_path("a/b").is_err());
        assert_eq!(
            source.sheet_path("streamlit").unwrap(),
            Path::new("data").join("streamlit.csv")
        );
    }
}
