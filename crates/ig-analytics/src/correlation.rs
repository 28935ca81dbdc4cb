//! 상관계수 계산 모듈.
//!
//! 코인 간 가격 움직임의 상관관계를 계산하고 음의 상관관계를 찾아냅니다.
//! 분산 투자 후보를 고르는 데 활용됩니다.
//!
//! # 주요 기능
//!
//! - **Pearson 상관계수**: 두 시계열 간 선형 상관관계 측정 (쌍 단위 결측 제외)
//! - **상관행렬**: 여러 코인 간 상관관계를 N×N 행렬로 표현
//! - **음의 상관 구조**: 기준 코인별로 음의 상관을 가진 코인 목록
//! - **재필터링**: 임계값과 기준 코인 선택으로 구조를 좁힘
//!
//! # 예시
//!
//! ```rust
//! use ig_analytics::correlation::pearson_correlation;
//!
//! let a = vec![0.01, -0.02, 0.015, 0.005];
//! let b = vec![0.008, -0.015, 0.012, 0.003];
//!
//! let corr = pearson_correlation(&a, &b);
//! assert!(corr.unwrap_or(0.0) > 0.9);
//! ```

use ig_core::{PriceTable, StatsError, StatsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pearson 상관계수 계산.
///
/// 두 값이 모두 유한한 위치만 사용합니다(pairwise complete).
///
/// # 반환
///
/// 상관계수 (-1.0 ~ 1.0). 유효 관측치가 2개 미만이거나 한쪽 분산이 0이면 None
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // 변동 없음
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// 상관행렬 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// 코인 목록 (행/열 순서)
    pub assets: Vec<String>,
    /// 상관계수 행렬 (N×N, -1.0 ~ 1.0)
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    fn index_of(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    /// 두 코인의 상관계수.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[i][j])
    }

    /// 코인 목록.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// 대칭 행렬인지 확인합니다.
    pub fn is_symmetric(&self) -> bool {
        let n = self.assets.len();
        (0..n).all(|i| (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

/// 가격 테이블의 모든 숫자 컬럼 간 상관행렬 계산.
///
/// 정의되지 않는 쌍(분산 0, 공통 관측치 2개 미만)은 0.0으로 기록하고
/// 대각선은 항상 1.0입니다.
///
/// 키 기준 중복 제거는 호출 전에 수행해야 합니다.
pub fn correlation_matrix(prices: &PriceTable) -> StatsResult<CorrelationMatrix> {
    if prices.is_empty() {
        return Err(StatsError::empty("가격 테이블"));
    }
    if prices.assets.is_empty() {
        return Err(StatsError::empty("가격 테이블의 숫자 컬럼"));
    }

    let n = prices.assets.len();
    let mut values = vec![vec![0.0; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let corr = pearson_correlation(&prices.values[i], &prices.values[j]).unwrap_or(0.0);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    tracing::debug!(assets = n, rows = prices.len(), "상관행렬 계산 완료");

    Ok(CorrelationMatrix {
        assets: prices.assets.clone(),
        values,
    })
}

/// 기준 코인 → (상대 코인 → 음의 상관계수).
///
/// 자기 자신과의 쌍이나 0 이상의 값은 포함하지 않습니다.
/// 음의 상관 상대가 없는 기준 코인도 빈 맵으로 유지됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NegativeCorrelations(pub BTreeMap<String, BTreeMap<String, f64>>);

impl NegativeCorrelations {
    /// 기준 코인 목록.
    pub fn base_assets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// 특정 기준 코인의 상대 코인 맵.
    pub fn counterparts(&self, base: &str) -> Option<&BTreeMap<String, f64>> {
        self.0.get(base)
    }

    /// 전체 (기준, 상대) 쌍 개수.
    pub fn pair_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 상관행렬에서 기준 코인별 음의 상관 구조를 추출합니다.
pub fn negative_correlations(matrix: &CorrelationMatrix) -> NegativeCorrelations {
    let structure = matrix
        .assets
        .iter()
        .enumerate()
        .map(|(i, base)| {
            let negatives = matrix
                .assets
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .filter(|(j, _)| matrix.values[i][*j] < 0.0)
                .map(|(j, other)| (other.clone(), matrix.values[i][j]))
                .collect();
            (base.clone(), negatives)
        })
        .collect();

    NegativeCorrelations(structure)
}

/// 음의 상관 구조 재필터링 조건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFilter {
    /// 이 값보다 작은 상관계수만 유지 (-1.0 ~ 0.0)
    pub threshold: f64,
    /// 기준 코인 선택 (비어 있으면 제한 없음)
    pub base_assets: Vec<String>,
}

impl Default for CorrelationFilter {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            base_assets: Vec::new(),
        }
    }
}

impl CorrelationFilter {
    /// 임계값 범위를 검증하며 생성합니다.
    pub fn new(threshold: f64, base_assets: Vec<String>) -> StatsResult<Self> {
        if !(-1.0..=0.0).contains(&threshold) {
            return Err(StatsError::InvalidParameter(format!(
                "상관계수 임계값은 [-1, 0] 범위여야 합니다: {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            base_assets,
        })
    }

    fn selects(&self, base: &str) -> bool {
        self.base_assets.is_empty() || self.base_assets.iter().any(|b| b == base)
    }
}

/// 임계값 미만이면서 선택된 기준 코인에 속한 항목만 남깁니다.
///
/// 선택된 기준 코인은 남은 상대가 없어도 빈 맵으로 유지됩니다.
pub fn filter_negative_correlations(
    structure: &NegativeCorrelations,
    filter: &CorrelationFilter,
) -> NegativeCorrelations {
    let filtered = structure
        .0
        .iter()
        .filter(|(base, _)| filter.selects(base))
        .map(|(base, others)| {
            let kept = others
                .iter()
                .filter(|(_, value)| **value < filter.threshold)
                .map(|(other, value)| (other.clone(), *value))
                .collect();
            (base.clone(), kept)
        })
        .collect();

    NegativeCorrelations(filtered)
}

/// 선택된 기준 코인과 임계값 미만 상대 코인을 순서대로 중복 없이 나열합니다.
///
/// 기준 코인 선택이 비어 있으면 빈 목록입니다. 구조에 없는 기준 코인은 건너뜁니다.
pub fn related_assets(structure: &NegativeCorrelations, filter: &CorrelationFilter) -> Vec<String> {
    let mut assets: Vec<String> = Vec::new();

    for base in &filter.base_assets {
        let Some(others) = structure.counterparts(base) else {
            continue;
        };
        if !assets.contains(base) {
            assets.push(base.clone());
        }
        for (other, value) in others {
            if *value < filter.threshold && !assets.contains(other) {
                assets.push(other.clone());
            }
        }
    }

    assets
}
