//! 시트 기반 테이블 모델.
//!
//! 스프레드시트에서 읽은 원시 데이터를 컬럼 이름과 셀 행으로 보관합니다.
//! 타입이 있는 레코드로의 변환은 [`crate::domain::trade`]와
//! [`crate::domain::price_table`]이 담당합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{StatsError, StatsResult};

/// 테이블 셀 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// 빈 셀
    Empty,
    /// 숫자
    Number(f64),
    /// 문자열
    Text(String),
}

impl Cell {
    /// 시트 문자열을 셀로 변환합니다.
    ///
    /// 공백만 있으면 `Empty`, 숫자로 읽히면 `Number`, 그 외에는 `Text`입니다.
    /// `nan`, `inf`처럼 유한하지 않은 숫자는 누락 값으로 보고 `Empty`가 됩니다.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Cell::from(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// 숫자 값 (숫자 셀만).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// 빈 셀 여부.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// 키 비교 및 표시용 문자열.
    pub fn as_key(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(value) => value.to_string(),
            Cell::Text(text) => text.clone(),
        }
    }
}

/// `Number`는 항상 유한한 값만 담습니다. 직렬화된 셀이 셀 내용을 그대로 구분해야
/// 캐시 지문이 겹치지 않습니다 (JSON은 NaN과 무한대를 모두 `null`로 씁니다).
impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Empty
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// 컬럼 이름과 셀 행으로 구성된 테이블.
///
/// 행 순서는 시트 순서를 그대로 유지합니다 (거래 테이블은 시간순).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 컬럼 목록으로 빈 테이블을 생성합니다.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 행을 추가합니다. 셀 개수가 컬럼 수와 다르면 에러입니다.
    pub fn push_row(&mut self, row: Vec<Cell>) -> StatsResult<()> {
        if row.len() != self.columns.len() {
            return Err(StatsError::LengthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// 빌더 스타일 행 추가.
    pub fn with_row(mut self, row: Vec<Cell>) -> StatsResult<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 컬럼 존재 여부.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// 컬럼 인덱스를 찾습니다. 없으면 `MissingColumn`.
    pub fn column_index(&self, name: &str) -> StatsResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| StatsError::MissingColumn(name.to_string()))
    }

    /// 컬럼 셀 반복자.
    pub fn column(&self, name: &str) -> StatsResult<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// 숫자 컬럼을 읽습니다. 숫자가 아닌 셀이 있으면 `InvalidValue`.
    pub fn numeric_column(&self, name: &str) -> StatsResult<Vec<f64>> {
        self.column(name)?
            .enumerate()
            .map(|(row, cell)| {
                cell.as_f64().ok_or_else(|| StatsError::InvalidValue {
                    column: name.to_string(),
                    row,
                    value: cell.as_key(),
                })
            })
            .collect()
    }

    /// 모든 셀이 숫자 또는 빈 셀인 컬럼 이름 목록 (숫자가 최소 하나 필요).
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                let mut any_number = false;
                for row in &self.rows {
                    match &row[*idx] {
                        Cell::Number(_) => any_number = true,
                        Cell::Empty => {}
                        Cell::Text(_) => return false,
                    }
                }
                any_number
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// 지정 컬럼 중 빈 셀이 있는 행을 제거한 새 테이블을 반환합니다.
    ///
    /// `columns`가 비어 있으면 모든 컬럼을 검사합니다.
    pub fn drop_incomplete_rows(&self, columns: &[&str]) -> StatsResult<Table> {
        let indices: Vec<usize> = if columns.is_empty() {
            (0..self.columns.len()).collect()
        } else {
            columns
                .iter()
                .map(|c| self.column_index(c))
                .collect::<StatsResult<_>>()?
        };

        Ok(Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| indices.iter().all(|&i| !row[i].is_empty()))
                .cloned()
                .collect(),
        })
    }

    /// 키 컬럼 기준으로 중복 행을 제거합니다 (첫 번째 행 유지).
    pub fn dedup_by(&self, key_column: &str) -> StatsResult<Table> {
        let idx = self.column_index(key_column)?;
        let mut seen = HashSet::new();

        Ok(Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| seen.insert(row[idx].as_key()))
                .cloned()
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(["datetime", "BTC", "ETH"]);
        for (ts, btc, eth) in [
            ("2024-01-01", "42000", "2300"),
            ("2024-01-02", "43000", ""),
            ("2024-01-02", "43100", "2350"),
            ("2024-01-03", "41000", "2200"),
        ] {
            table
                .push_row(vec![Cell::parse(ts), Cell::parse(btc), Cell::parse(eth)])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("  "), Cell::Empty);
        assert_eq!(Cell::parse("1.5"), Cell::Number(1.5));
        assert_eq!(Cell::parse("-0.25"), Cell::Number(-0.25));
        assert_eq!(Cell::parse("BTC"), Cell::Text("BTC".to_string()));
    }

    #[test]
    fn test_non_finite_numbers_are_empty() {
        for raw in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert_eq!(Cell::parse(raw), Cell::Empty, "{raw}");
        }
        assert_eq!(Cell::from(f64::NAN), Cell::Empty);

        // 숫자 셀은 JSON에서 null로 뭉개지지 않음
        let mut table = Table::new(["BTC"]);
        table.push_row(vec![Cell::parse("1e308")]).unwrap();
        table.push_row(vec![Cell::parse("inf")]).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json.matches("null").count(), 1);
    }

    #[test]
    fn test_push_row_length_check() {
        let mut table = Table::new(["a", "b"]);
        let err = table.push_row(vec![Cell::Number(1.0)]).unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_missing_column() {
        let table = sample();
        assert_eq!(
            table.numeric_column("SOL").unwrap_err(),
            StatsError::MissingColumn("SOL".to_string())
        );
    }

    #[test]
    fn test_numeric_columns_skip_text() {
        let table = sample();
        assert_eq!(table.numeric_columns(), vec!["BTC", "ETH"]);
    }

    #[test]
    fn test_drop_incomplete_rows() {
        let table = sample().drop_incomplete_rows(&[]).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table
            .rows()
            .iter()
            .all(|row| row.iter().all(|c| !c.is_empty())));
    }

    #[test]
    fn test_dedup_keeps_first() {
        let table = sample().dedup_by("datetime").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[1][1], Cell::Number(43000.0));
    }

    #[test]
    fn test_invalid_numeric_value() {
        let table = Table::new(["x"])
            .with_row(vec![Cell::Number(1.0)])
            .unwrap()
            .with_row(vec![Cell::Text("n/a".to_string())])
            .unwrap();

        assert_eq!(
            table.numeric_column("x").unwrap_err(),
            StatsError::InvalidValue {
                column: "x".to_string(),
                row: 1,
                value: "n/a".to_string()
            }
        );
    }
}
