//! 기술 통계 공통 함수.
//!
//! 빈 입력이나 관측치 부족으로 정의되지 않는 값은 모두 0.0으로 반환합니다.
//! 하위 지표 집계가 항상 유한한 실수를 가정하기 때문입니다.

use serde::{Deserialize, Serialize};

/// 산술 평균 (빈 입력은 0.0).
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 표준편차 (n-1 분모, 관측치 2개 미만은 0.0).
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    // 부동소수점 평균 오차로 생기는 미세한 분산 방지
    if values.iter().all(|v| *v == values[0]) {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// 선형 보간 분위수 (`q`는 0.0 ~ 1.0).
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&sorted, q)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// 중앙값.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// 분포 요약 (count, mean, std, min, 25%, 50%, 75%, max).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub q50: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

impl Description {
    /// 값 목록을 요약합니다. 빈 입력이면 `None`.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            q50: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// 수익/손실 한쪽의 집계 (합계, 평균, 개수, 표준편차, 최소, 최대, 중앙값).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub total: f64,
    pub mean: f64,
    pub count: usize,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl SideStats {
    /// 빈 입력은 모든 값이 0인 집계를 반환합니다.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            total: values.iter().sum(),
            mean: mean(values),
            count: values.len(),
            std_dev: sample_std(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            median: median(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_std() {
        // pandas: pd.Series([1, 2, 3, 4]).std() == 1.2909944487358056
        let std = sample_std(&[1.0, 2.0, 3.0, 4.0]);
        assert!((std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(sample_std(&[5.0]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
    }

    #[test]
    fn test_quantile_linear() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert!((quantile(&values, 0.25) - 1.75).abs() < 1e-12);
        assert!((median(&values) - 2.5).abs() < 1e-12);
        assert!((quantile(&values, 0.75) - 3.25).abs() < 1e-12);
        assert_eq!(quantile(&[7.0], 0.3), 7.0);
    }

    #[test]
    fn test_description() {
        let desc = Description::from_values(&[0.1, 0.3, 0.2]).unwrap();
        assert_eq!(desc.count, 3);
        assert!((desc.mean - 0.2).abs() < 1e-12);
        assert_eq!(desc.min, 0.1);
        assert_eq!(desc.max, 0.3);
        assert!((desc.q50 - 0.2).abs() < 1e-12);
        assert!(Description::from_values(&[]).is_none());
    }

    #[test]
    fn test_side_stats() {
        let stats = SideStats::from_values(&[-0.1, -0.3]);
        assert_eq!(stats.count, 2);
        assert!((stats.total + 0.4).abs() < 1e-12);
        assert_eq!(stats.min, -0.3);
        assert_eq!(stats.max, -0.1);
        assert!((stats.median + 0.2).abs() < 1e-12);

        assert_eq!(SideStats::from_values(&[]), SideStats::default());
    }
}
