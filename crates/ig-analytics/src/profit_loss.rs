//! 수익/손실 분포 요약.
//!
//! 0 수익률을 제외하고 수익(> 0)과 손실(< 0) 그룹으로 나눈 뒤,
//! 각 그룹 수익률의 **절댓값** 분포를 요약합니다.

use ig_core::TradeRecord;
use serde::{Deserialize, Serialize};

use crate::describe::Description;
use crate::outlier::filter_returns;

/// `Profit`/`Loss` 두 행의 분포 요약.
///
/// 해당 그룹에 관측치가 없으면 행이 없습니다(`None`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfitLossDescription {
    pub profit: Option<Description>,
    pub loss: Option<Description>,
}

impl ProfitLossDescription {
    /// 출력용 (라벨, 요약) 행 목록. 손실 행이 먼저 옵니다.
    pub fn rows(&self) -> Vec<(&'static str, Description)> {
        let mut rows = Vec::with_capacity(2);
        if let Some(loss) = self.loss {
            rows.push(("Loss", loss));
        }
        if let Some(profit) = self.profit {
            rows.push(("Profit", profit));
        }
        rows
    }
}

/// 거래 기록의 수익/손실 분포를 요약합니다.
///
/// `exclude_outliers`가 참이면 `[-5, 5]` 밖의 수익률을 먼저 제외합니다.
/// 수익률이 정확히 0인 행은 플래그와 무관하게 항상 제외됩니다.
pub fn profit_loss_description(
    records: &[TradeRecord],
    exclude_outliers: bool,
) -> ProfitLossDescription {
    let returns: Vec<f64> = records.iter().map(|r| r.return_pct).collect();
    describe_returns(&returns, exclude_outliers)
}

/// 수익률 시계열 버전.
pub fn describe_returns(returns: &[f64], exclude_outliers: bool) -> ProfitLossDescription {
    let filtered = filter_returns(returns, exclude_outliers);

    let (profits, losses): (Vec<f64>, Vec<f64>) = filtered
        .iter()
        .copied()
        .filter(|r| !r.is_nan())
        .partition(|r| *r > 0.0);
    let losses: Vec<f64> = losses.into_iter().map(f64::abs).collect();

    ProfitLossDescription {
        profit: Description::from_values(&profits),
        loss: Description::from_values(&losses),
    }
}
