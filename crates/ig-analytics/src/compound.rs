//! 복리 수익률 동학.
//!
//! 포트폴리오 잔고 시계열에서 각 시점까지의 월 복리 수익률을 계산합니다:
//! `value[i] = (balance[i] / balance[0])^(1/i) - 1`, `value[0] = 0.0`.

use chrono::NaiveDate;
use ig_core::{StatsError, StatsResult, TradeRecord};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// 날짜별 복리 수익률.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// 잔고 시계열만으로 복리 수익률 시계열을 계산합니다.
///
/// 첫 잔고가 0이거나 비율이 음수여서 결과가 유한하지 않은 시점은 0.0입니다.
pub fn compound_interest_values(balances: &[f64]) -> Vec<f64> {
    let Some(&opening) = balances.first() else {
        return Vec::new();
    };

    balances
        .iter()
        .enumerate()
        .map(|(i, balance)| {
            if i == 0 {
                return 0.0;
            }
            let value = (balance / opening).powf(1.0 / i as f64) - 1.0;
            if value.is_finite() {
                value
            } else {
                0.0
            }
        })
        .collect()
}

/// 날짜와 정렬된 복리 수익률 시계열.
///
/// # 에러
///
/// - 빈 입력이면 `EmptyInput`
/// - 잔고와 날짜 길이가 다르면 `LengthMismatch`
pub fn compound_interest_series(
    balances: &[f64],
    dates: &[NaiveDate],
) -> StatsResult<Vec<CompoundPoint>> {
    if balances.is_empty() {
        return Err(StatsError::empty("잔고 시계열"));
    }
    if balances.len() != dates.len() {
        return Err(StatsError::LengthMismatch {
            expected: balances.len(),
            actual: dates.len(),
        });
    }

    Ok(dates
        .iter()
        .zip(compound_interest_values(balances))
        .map(|(date, value)| CompoundPoint { date: *date, value })
        .collect())
}

/// 거래 기록의 `Portfolio`와 `Purchase date`로 복리 수익률 시계열을 계산합니다.
///
/// 매수일이 비어 있는 행이 있으면 해당 행 번호와 함께 `InvalidValue`.
/// 컬럼 자체의 존재 여부는 테이블을 읽는 쪽에서 확인합니다.
pub fn compound_interest_from_records(
    records: &[TradeRecord],
) -> StatsResult<Vec<CompoundPoint>> {
    let dates = records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            r.purchase_date.ok_or_else(|| StatsError::InvalidValue {
                column: ig_core::columns::PURCHASE_DATE.to_string(),
                row,
                value: String::new(),
            })
        })
        .collect::<StatsResult<Vec<_>>>()?;
    let balances: Vec<f64> = records
        .iter()
        .map(|r| r.portfolio.to_f64().unwrap_or(f64::NAN))
        .collect();

    compound_interest_series(&balances, &dates)
}
