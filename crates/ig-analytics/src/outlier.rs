//! 이상치 필터.
//!
//! 수익/손실 분할 전에 수익률이 정확히 0인 행(수익도 손실도 아님)을 항상 제거하고,
//! 요청 시 ±500% 범위를 벗어난 행을 추가로 제외합니다.
//! ±500%는 "데이터 오류가 아닌 값"의 경계로 고정된 값입니다.

use ig_core::TradeRecord;

/// 이상치 경계 (비율, 5.0 = 500%).
pub const OUTLIER_BOUND: f64 = 5.0;

/// 수익률이 이상치 경계 `[-5, 5]` 안에 있는지 (경계 포함).
pub fn within_bounds(value: f64) -> bool {
    (-OUTLIER_BOUND..=OUTLIER_BOUND).contains(&value)
}

fn keep(value: f64, exclude_outliers: bool) -> bool {
    value != 0.0 && (!exclude_outliers || within_bounds(value))
}

/// 거래 기록을 필터링한 새 목록을 반환합니다. 입력은 변경하지 않습니다.
pub fn filter_trades(records: &[TradeRecord], exclude_outliers: bool) -> Vec<TradeRecord> {
    records
        .iter()
        .filter(|r| keep(r.return_pct, exclude_outliers))
        .cloned()
        .collect()
}

/// 수익률 시계열을 필터링합니다.
pub fn filter_returns(returns: &[f64], exclude_outliers: bool) -> Vec<f64> {
    returns
        .iter()
        .copied()
        .filter(|r| keep(*r, exclude_outliers))
        .collect()
}
