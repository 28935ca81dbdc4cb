//! 전략 통계 집계기.
//!
//! 시간순 거래 기록에서 전략 요약 레코드 하나를 만듭니다:
//! 운용 기간, 수익/손실 횟수, MoM, ROI, 월 복리 수익률, 수익/손실 측 분포,
//! 샤프/소르티노 비율, 최대 낙폭, 최대 연속 손실 기간.
//!
//! # 두 가지 모드
//!
//! - **스냅샷**: 마지막 행의 `Portfolio`를 현재 잔고로, 마지막 수익률을 MoM으로 사용
//! - **실시간**: 마지막 코인의 현재가를 조회해 최신 기간을 재평가. 조회가 실패하면
//!   마지막 매도가(없으면 매수가)로 대체하고 [`StatsNotice::PriceFallback`]을 남김
//!
//! # 라벨 규칙
//!
//! `max_loss`는 손실 측의 **최솟값**(가장 큰 손실, 가장 음수), `min_loss`는 손실 측의
//! 최댓값입니다. 대시보드 라벨과 맞춘 규칙이므로 바꾸지 마세요.

use ig_core::{
    return_series, PriceLookup, StatsError, StatsNotice, StatsResult, Table, TradeRecord,
};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::describe::SideStats;
use crate::risk::{max_drawdown, max_loss_streak, try_sharpe_ratio, try_sortino_ratio};

/// 전략 요약 레코드.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    /// 운용 기간 (행 수)
    pub life_period: usize,
    /// 수익 기간 수
    pub profit_count: usize,
    /// 손실 기간 수
    pub loss_count: usize,
    /// 최근 기간 수익률 (Month-over-Month)
    pub mom: f64,
    /// 첫 잔고 대비 현재 잔고 수익률
    pub roi: f64,
    /// 월 복리 수익률 `(closing/opening)^(1/(n-1)) - 1`
    pub compound_monthly_return: f64,
    pub mean_profit: f64,
    pub mean_loss: f64,
    pub median_profit: f64,
    pub median_loss: f64,
    pub std_profit: f64,
    pub std_loss: f64,
    pub max_profit: f64,
    /// 손실 측 최솟값 (가장 큰 손실)
    pub max_loss: f64,
    pub min_profit: f64,
    /// 손실 측 최댓값 (가장 작은 손실)
    pub min_loss: f64,
    /// 샤프 비율 (√n 정규화)
    pub sharpe_ratio: f64,
    /// 소르티노 비율 (√n 정규화)
    pub sortino_ratio: f64,
    /// 최대 낙폭 (-1.0 ~ 0.0]
    pub max_drawdown: f64,
    /// 최대 연속 손실 기간
    pub max_loss_duration: usize,
}

impl StrategySummary {
    /// 대시보드 라벨 순서의 (지표, 값) 목록.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Life Period", self.life_period as f64),
            ("Profit Count", self.profit_count as f64),
            ("Loss Count", self.loss_count as f64),
            ("MoM", self.mom),
            ("ROI", self.roi),
            (
                "Monthly Return with Compound Interest",
                self.compound_monthly_return,
            ),
            ("Mean Profit", self.mean_profit),
            ("Mean Loss", self.mean_loss),
            ("Median Profit", self.median_profit),
            ("Median Loss", self.median_loss),
            ("Std Profit", self.std_profit),
            ("Std Loss", self.std_loss),
            ("Maximum Profit", self.max_profit),
            ("Maximum Loss", self.max_loss),
            ("Minimum Profit", self.min_profit),
            ("Minimum Loss", self.min_loss),
            ("Sharpe Ratio", self.sharpe_ratio),
            ("Sortino Ratio", self.sortino_ratio),
            ("Max Drawdown", self.max_drawdown),
            ("Max Periods in Loss", self.max_loss_duration as f64),
        ]
    }
}

/// 요약과 계산 중 발생한 비치명적 알림.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub summary: StrategySummary,
    pub notices: Vec<StatsNotice>,
}

/// 최신 기간 평가 결과.
struct LatestPeriod {
    closing_balance: Decimal,
    mom: f64,
}

/// 스냅샷 모드 전략 요약.
///
/// # 에러
///
/// 빈 기록이면 `EmptyInput`.
pub fn strategy_summary(
    records: &[TradeRecord],
    risk_free_rate: f64,
) -> StatsResult<SummaryReport> {
    let last = records
        .last()
        .ok_or_else(|| StatsError::empty("거래 기록"))?;

    let latest = LatestPeriod {
        closing_balance: last.portfolio,
        mom: last.return_pct,
    };
    Ok(summarize(records, risk_free_rate, latest, Vec::new()))
}

/// 실시간 모드 전략 요약.
///
/// 현재가 조회 실패는 계산을 중단시키지 않습니다.
/// `Quantity × 현재가`가 `Decimal` 범위를 넘으면 시트의 마지막 `Portfolio`를 잔고로 씁니다.
pub fn strategy_summary_live(
    records: &[TradeRecord],
    risk_free_rate: f64,
    lookup: &dyn PriceLookup,
) -> StatsResult<SummaryReport> {
    let last = records
        .last()
        .ok_or_else(|| StatsError::empty("거래 기록"))?;

    let mut notices = Vec::new();
    let current_price = match lookup.current_price(&last.coin) {
        Ok(price) => price,
        Err(err) => {
            let fallback = last.sell_price.unwrap_or(last.purchase_price);
            warn!(
                coin = %last.coin,
                error = %err,
                fallback = %fallback,
                "Current price lookup failed, using last known price"
            );
            notices.push(StatsNotice::PriceFallback {
                coin: last.coin.clone(),
                fallback_price: fallback,
                reason: err.to_string(),
            });
            fallback
        }
    };

    let mom = current_price
        .checked_sub(last.purchase_price)
        .and_then(|diff| diff.checked_div(last.purchase_price))
        .and_then(|ratio| ratio.to_f64())
        .unwrap_or_else(|| {
            notices.push(degenerate("mom"));
            0.0
        });

    let closing_balance = last
        .quantity
        .checked_mul(current_price)
        .unwrap_or_else(|| {
            notices.push(degenerate("closing_balance"));
            last.portfolio
        });

    let latest = LatestPeriod {
        closing_balance,
        mom,
    };
    Ok(summarize(records, risk_free_rate, latest, notices))
}

/// 시트 테이블에서 바로 스냅샷 요약을 계산합니다.
///
/// 필수 컬럼이 없으면 누락된 컬럼 이름과 함께 `MissingColumn`을 반환합니다.
pub fn strategy_summary_from_table(
    table: &Table,
    date_format: &str,
    risk_free_rate: f64,
) -> StatsResult<SummaryReport> {
    let records = TradeRecord::from_table(table, date_format)?;
    strategy_summary(&records, risk_free_rate)
}

fn summarize(
    records: &[TradeRecord],
    risk_free_rate: f64,
    latest: LatestPeriod,
    mut notices: Vec<StatsNotice>,
) -> SummaryReport {
    let n = records.len();
    let opening = records[0].portfolio;
    let closing = latest.closing_balance;

    let roi = closing
        .checked_sub(opening)
        .and_then(|diff| diff.checked_div(opening))
        .and_then(|ratio| ratio.to_f64())
        .unwrap_or_else(|| {
            notices.push(degenerate("roi"));
            0.0
        });

    let compound_monthly_return = compound_return(opening, closing, n, &mut notices);

    let mut returns = return_series(records);
    if let Some(last) = returns.last_mut() {
        *last = latest.mom;
    }

    let profits: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let profit = SideStats::from_values(&profits);
    let loss = SideStats::from_values(&losses);

    let normalization = (n as f64).sqrt();
    let sharpe_ratio = try_sharpe_ratio(&returns, risk_free_rate, normalization)
        .unwrap_or_else(|| {
            notices.push(degenerate("sharpe_ratio"));
            0.0
        });
    let sortino_ratio = try_sortino_ratio(&returns, risk_free_rate, normalization)
        .unwrap_or_else(|| {
            notices.push(degenerate("sortino_ratio"));
            0.0
        });

    let summary = StrategySummary {
        life_period: n,
        profit_count: profit.count,
        loss_count: loss.count,
        mom: latest.mom,
        roi,
        compound_monthly_return,
        mean_profit: profit.mean,
        mean_loss: loss.mean,
        median_profit: profit.median,
        median_loss: loss.median,
        std_profit: profit.std_dev,
        std_loss: loss.std_dev,
        max_profit: profit.max,
        max_loss: loss.min,
        min_profit: profit.min,
        min_loss: loss.max,
        sharpe_ratio,
        sortino_ratio,
        max_drawdown: max_drawdown(&returns),
        max_loss_duration: max_loss_streak(&returns),
    };

    debug!(
        periods = n,
        roi = summary.roi,
        sharpe = summary.sharpe_ratio,
        notices = notices.len(),
        "Strategy summary computed"
    );

    SummaryReport { summary, notices }
}

/// `(closing/opening)^(1/(n-1)) - 1`. 행이 하나뿐이거나 결과가 유한하지 않으면 0.0.
fn compound_return(
    opening: Decimal,
    closing: Decimal,
    n: usize,
    notices: &mut Vec<StatsNotice>,
) -> f64 {
    if n < 2 {
        return 0.0;
    }
    let growth = closing
        .checked_div(opening)
        .and_then(|ratio| ratio.to_f64())
        .unwrap_or(f64::NAN);
    let value = growth.powf(1.0 / (n - 1) as f64) - 1.0;
    if value.is_finite() {
        value
    } else {
        notices.push(degenerate("compound_monthly_return"));
        0.0
    }
}

fn degenerate(metric: &str) -> StatsNotice {
    StatsNotice::DegenerateMetric {
        metric: metric.to_string(),
    }
}

/// 여러 전략 요약을 나란히 배치한 비교표의 한 행.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub values: Vec<f64>,
}

/// 이름 붙은 전략 요약들을 지표별 행으로 합칩니다 (예: Momentum vs Hodl BTC).
pub fn compare_strategies(summaries: &[(&str, &StrategySummary)]) -> Vec<ComparisonRow> {
    let columns: Vec<Vec<(&'static str, f64)>> =
        summaries.iter().map(|(_, s)| s.metrics()).collect();

    StrategySummary::default()
        .metrics()
        .into_iter()
        .enumerate()
        .map(|(i, (metric, _))| ComparisonRow {
            metric,
            values: columns.iter().map(|c| c[i].1).collect(),
        })
        .collect()
}
