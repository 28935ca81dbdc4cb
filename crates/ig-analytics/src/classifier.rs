//! 수익률 분류기.
//!
//! 각 기간 수익률을 수익(PROFIT), 손실(LOSS), 보유(HODL)로 분류하고
//! 범주별 비중을 계산합니다.

use ig_core::{StatsError, StatsResult};
use serde::{Deserialize, Serialize};

/// 수익률 범주.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReturnClass {
    /// 수익 (> 0)
    Profit,
    /// 손실 (< 0)
    Loss,
    /// 변동 없음 (== 0)
    Hodl,
}

impl ReturnClass {
    pub fn label(&self) -> &'static str {
        match self {
            ReturnClass::Profit => "PROFIT",
            ReturnClass::Loss => "LOSS",
            ReturnClass::Hodl => "HODL",
        }
    }
}

/// 수익률 하나를 분류합니다. `NaN`은 양수도 음수도 아니므로 HODL입니다.
pub fn classify(value: f64) -> ReturnClass {
    if value > 0.0 {
        ReturnClass::Profit
    } else if value < 0.0 {
        ReturnClass::Loss
    } else {
        ReturnClass::Hodl
    }
}

/// 범주별 비중 (합계 1.0). 세 키는 항상 존재하며 없는 범주는 0.0입니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct ReturnShares {
    pub profit: f64,
    pub loss: f64,
    pub hodl: f64,
}

impl ReturnShares {
    /// 범주 비중.
    pub fn share(&self, class: ReturnClass) -> f64 {
        match class {
            ReturnClass::Profit => self.profit,
            ReturnClass::Loss => self.loss,
            ReturnClass::Hodl => self.hodl,
        }
    }

    /// 차트 출력용 (라벨, 비중) 목록.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            (ReturnClass::Profit.label(), self.profit),
            (ReturnClass::Loss.label(), self.loss),
            (ReturnClass::Hodl.label(), self.hodl),
        ]
    }
}

/// 수익률 시계열의 수익/손실/보유 비중을 계산합니다.
///
/// # 에러
///
/// 빈 시계열이면 `EmptyInput`.
pub fn return_shares(returns: &[f64]) -> StatsResult<ReturnShares> {
    if returns.is_empty() {
        return Err(StatsError::empty("수익률 시계열"));
    }

    let (mut profit, mut loss, mut hodl) = (0usize, 0usize, 0usize);
    for r in returns {
        match classify(*r) {
            ReturnClass::Profit => profit += 1,
            ReturnClass::Loss => loss += 1,
            ReturnClass::Hodl => hodl += 1,
        }
    }

    let total = returns.len() as f64;
    Ok(ReturnShares {
        profit: profit as f64 / total,
        loss: loss as f64 / total,
        hodl: hodl as f64 / total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(0.01), ReturnClass::Profit);
        assert_eq!(classify(-0.01), ReturnClass::Loss);
        assert_eq!(classify(0.0), ReturnClass::Hodl);
        assert_eq!(classify(-0.0), ReturnClass::Hodl);
        assert_eq!(classify(f64::NAN), ReturnClass::Hodl);
    }

    #[test]
    fn test_return_shares_mixed() {
        let shares = return_shares(&[0.1, -0.05, 0.0, 0.2, -0.1]).unwrap();
        assert!((shares.profit - 0.4).abs() < 1e-12);
        assert!((shares.loss - 0.4).abs() < 1e-12);
        assert!((shares.hodl - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_absent_categories_are_zero() {
        let shares = return_shares(&[0.1, 0.2]).unwrap();
        assert_eq!(shares.profit, 1.0);
        assert_eq!(shares.share(ReturnClass::Loss), 0.0);
        assert_eq!(shares.share(ReturnClass::Hodl), 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            return_shares(&[]),
            Err(StatsError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(return_shares(&[0.1, -0.1]).unwrap()).unwrap();
        assert!(json.get("PROFIT").is_some());
        assert!(json.get("LOSS").is_some());
        assert!(json.get("HODL").is_some());
    }
}
