//! 위험 지표 라이브러리.
//!
//! 수익률 시계열에 대한 순수 함수 모음입니다:
//! - 샤프 비율 (Sharpe Ratio)
//! - 소르티노 비율 (Sortino Ratio)
//! - 최대 낙폭 (Maximum Drawdown)
//! - 최대 연속 손실 기간
//!
//! 비율 지표는 분모(표준편차)가 0이거나 정의되지 않으면 0.0을 반환합니다.
//! 에러가 아니라 정해진 규칙이며, 요약 레코드의 모든 비율이 유한한 실수임을
//! 보장합니다. 퇴화 여부가 필요한 호출자는 `try_*` 변형을 사용합니다.
//!
//! # 정규화 계수
//!
//! 분모는 `표준편차 × √normalization_factor` 입니다. 전략 요약은
//! `normalization_factor = √n`을 사용하여 길이가 다른 시계열 간에도 비교할 수
//! 있게 합니다.

use tracing::debug;

use crate::describe::{mean, sample_std};

/// 샤프 비율 (퇴화 시 `None`).
///
/// `(mean(returns) - risk_free_rate) / (std(returns) × √normalization_factor)`
pub fn try_sharpe_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    normalization_factor: f64,
) -> Option<f64> {
    let std = sample_std(returns);
    ratio(mean(returns) - risk_free_rate, std, normalization_factor)
}

/// 샤프 비율. 표준편차가 0이면 0.0.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, normalization_factor: f64) -> f64 {
    try_sharpe_ratio(returns, risk_free_rate, normalization_factor).unwrap_or_else(|| {
        debug!(len = returns.len(), "Sharpe ratio degenerate, using 0.0");
        0.0
    })
}

/// 소르티노 비율 (퇴화 시 `None`).
///
/// 분자는 샤프 비율과 같고, 분모는 음수 수익률만의 표준편차를 사용합니다.
pub fn try_sortino_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    normalization_factor: f64,
) -> Option<f64> {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return None;
    }
    ratio(
        mean(returns) - risk_free_rate,
        sample_std(&downside),
        normalization_factor,
    )
}

/// 소르티노 비율. 하방 수익률이 없거나 그 표준편차가 0이면 0.0.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, normalization_factor: f64) -> f64 {
    try_sortino_ratio(returns, risk_free_rate, normalization_factor).unwrap_or_else(|| {
        debug!(len = returns.len(), "Sortino ratio degenerate, using 0.0");
        0.0
    })
}

fn ratio(excess: f64, std: f64, normalization_factor: f64) -> Option<f64> {
    let denominator = std * normalization_factor.sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let value = excess / denominator;
    value.is_finite().then_some(value)
}

/// 누적 자산 지수: `(1 + r)`의 누적 곱.
pub fn wealth_index(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |wealth, r| {
            *wealth *= 1.0 + r;
            Some(*wealth)
        })
        .collect()
}

/// 각 시점의 낙폭 `(wealth - running_max) / running_max`.
///
/// 고점은 첫 시점의 자산 지수에서 시작합니다. 고점이 0 이하가 되는
/// 완전 손실 구간은 -1.0으로 기록합니다.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    wealth_index(returns)
        .into_iter()
        .map(|wealth| {
            peak = peak.max(wealth);
            if peak <= 0.0 || !peak.is_finite() {
                -1.0
            } else {
                (wealth - peak) / peak
            }
        })
        .collect()
}

/// 최대 낙폭 (가장 음수인 낙폭). 낙폭이 없으면 0.0.
pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns).into_iter().fold(0.0, f64::min)
}

/// 최대 연속 손실 기간 (`return < 0`이 연속된 가장 긴 구간의 길이).
pub fn max_loss_streak(returns: &[f64]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for r in returns {
        if *r < 0.0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
