//! 코인 가격 와이드 테이블.
//!
//! 시간축 키 컬럼 하나와 코인별 숫자 컬럼으로 구성됩니다.
//! 상관관계 계산 전에 [`Table::dedup_by`]로 키 기준 중복 제거가 선행되어야 합니다:
//! 중복 타임스탬프는 변화율과 상관계수를 모두 왜곡합니다.

use serde::{Deserialize, Serialize};

use super::table::Table;
use crate::error::{StatsError, StatsResult};

/// 코인별 가격 시계열 묶음.
///
/// 누락된 값은 `NaN`으로 보관하며 상관계수 계산 시 쌍 단위로 건너뜁니다.
/// 값은 유한하거나 `NaN`뿐이므로 JSON 지문에서 `null`은 항상 누락을 뜻합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    /// 키(시간축) 값
    pub keys: Vec<String>,
    /// 코인 이름 (컬럼 순서)
    pub assets: Vec<String>,
    /// 코인별 값 (`values[asset][row]`)
    pub values: Vec<Vec<f64>>,
}

impl PriceTable {
    /// 시트 테이블에서 키 컬럼과 모든 숫자 컬럼을 추출합니다.
    pub fn from_table(table: &Table, key_column: &str) -> StatsResult<Self> {
        let key_idx = table.column_index(key_column)?;
        let keys = table.rows().iter().map(|row| row[key_idx].as_key()).collect();

        let mut assets = Vec::new();
        let mut values = Vec::new();
        for name in table.numeric_columns() {
            if name == key_column {
                continue;
            }
            let series = table
                .column(name)?
                .map(|cell| cell.as_f64().unwrap_or(f64::NAN))
                .collect();
            assets.push(name.to_string());
            values.push(series);
        }

        Self::new(keys, assets, values)
    }

    /// 구성 요소로 생성합니다. 모든 시계열 길이는 키 길이와 같아야 합니다.
    pub fn new(keys: Vec<String>, assets: Vec<String>, values: Vec<Vec<f64>>) -> StatsResult<Self> {
        if assets.len() != values.len() {
            return Err(StatsError::LengthMismatch {
                expected: assets.len(),
                actual: values.len(),
            });
        }
        if let Some(series) = values.iter().find(|s| s.len() != keys.len()) {
            return Err(StatsError::LengthMismatch {
                expected: keys.len(),
                actual: series.len(),
            });
        }

        Ok(Self {
            keys,
            assets,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 코인 시계열.
    pub fn series(&self, asset: &str) -> Option<&[f64]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.values[i].as_slice())
    }

    /// 직전 행 대비 변화율 테이블 (첫 행은 `NaN`).
    ///
    /// 직전 값이 0이거나 누락이면 결과도 `NaN`입니다. 무한대는 만들지 않습니다.
    pub fn pct_change(&self) -> Self {
        let values = self
            .values
            .iter()
            .map(|series| {
                std::iter::once(f64::NAN)
                    .chain(series.windows(2).map(|w| {
                        let change = (w[1] - w[0]) / w[0];
                        if change.is_finite() {
                            change
                        } else {
                            f64::NAN
                        }
                    }))
                    .take(series.len())
                    .collect()
            })
            .collect();

        Self {
            keys: self.keys.clone(),
            assets: self.assets.clone(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    fn table() -> Table {
        let mut table = Table::new(["datetime", "BTC", "ETH", "note"]);
        for (ts, btc, eth, note) in [
            ("t1", "100", "10", "a"),
            ("t2", "110", "", "b"),
            ("t2", "111", "11", "c"),
            ("t3", "99", "12", "d"),
        ] {
            table
                .push_row(vec![
                    Cell::parse(ts),
                    Cell::parse(btc),
                    Cell::parse(eth),
                    Cell::parse(note),
                ])
                .unwrap();
        }
        table
    }

    #[test]
    fn test_from_table_selects_numeric_columns() {
        let prices = PriceTable::from_table(&table(), "datetime").unwrap();
        assert_eq!(prices.assets, vec!["BTC", "ETH"]);
        assert_eq!(prices.len(), 4);
        assert!(prices.series("ETH").unwrap()[1].is_nan());
    }

    #[test]
    fn test_missing_key_column() {
        assert_eq!(
            PriceTable::from_table(&table(), "timestamp").unwrap_err(),
            StatsError::MissingColumn("timestamp".to_string())
        );
    }

    #[test]
    fn test_pct_change() {
        let prices = PriceTable::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["BTC".into()],
            vec![vec![100.0, 110.0, 99.0]],
        )
        .unwrap()
        .pct_change();

        let btc = prices.series("BTC").unwrap();
        assert!(btc[0].is_nan());
        assert!((btc[1] - 0.1).abs() < 1e-12);
        assert!((btc[2] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_never_infinite() {
        let prices = PriceTable::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["BTC".into()],
            vec![vec![0.0, 1e-310, 1e300]],
        )
        .unwrap()
        .pct_change();

        let btc = prices.series("BTC").unwrap();
        assert!(btc[1].is_nan());
        assert!(btc[2].is_nan());
    }

    #[test]
    fn test_new_rejects_ragged_series() {
        let err = PriceTable::new(
            vec!["a".into(), "b".into()],
            vec!["BTC".into()],
            vec![vec![1.0]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            StatsError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
