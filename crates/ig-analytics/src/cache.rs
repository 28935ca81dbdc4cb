//! 계산 결과 메모이제이션.
//!
//! 지표 함수와 분리된 명시적 캐시 계층입니다.
//! 키는 `(함수 이름, 인자 지문)`이며 지문은 serde JSON 직렬화 결과의 SHA-256입니다.
//! 캐시를 거치지 않은 재계산과 결과가 완전히 같아야 하므로 에러는 저장하지 않습니다.
//! 만료된 엔트리는 새 값을 저장할 때마다 함께 제거되며, TTL이 0이면 아무것도 저장하지 않습니다.

use ig_core::StatsResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

/// TTL 기반 메모이제이션 캐시.
///
/// 계산 중에는 엔트리 맵 잠금을 유지하므로 TTL 안에서 같은 키는 최대 한 번만 계산됩니다.
pub struct MemoCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoCache {
    /// 새로운 캐시 인스턴스 생성.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 초 단위 TTL로 생성.
    pub fn with_ttl_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 캐시 키 생성.
    ///
    /// 형식: `{function}:{sha256(json(args))}`
    pub fn cache_key<A: Serialize + ?Sized>(
        function: &str,
        args: &A,
    ) -> serde_json::Result<String> {
        let encoded = serde_json::to_vec(args)?;
        let digest = Sha256::digest(&encoded);
        Ok(format!("{}:{}", function, hex::encode(digest)))
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // 계산 중 패닉이 나도 맵 자체는 일관된 상태
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 캐시된 값을 반환하거나 계산 후 저장합니다.
    ///
    /// 인자 직렬화에 실패하면 캐시를 건너뛰고 바로 계산합니다.
    pub fn get_or_compute<T, A, F>(&self, function: &str, args: &A, compute: F) -> StatsResult<T>
    where
        T: Clone + Send + Sync + 'static,
        A: Serialize + ?Sized,
        F: FnOnce() -> StatsResult<T>,
    {
        let key = match Self::cache_key(function, args) {
            Ok(key) => key,
            Err(e) => {
                debug!(function, error = %e, "캐시 키 생성 실패, 캐시 없이 계산");
                return compute();
            }
        };

        let mut entries = self.lock();
        let now = Instant::now();

        if let Some(entry) = entries.get(&key) {
            if entry.expires_at > now {
                if let Some(value) = entry.value.downcast_ref::<T>() {
                    trace!(function, "캐시 적중");
                    return Ok(value.clone());
                }
            }
        }

        debug!(function, "캐시 미스");
        let value = compute()?;
        if self.ttl.is_zero() {
            return Ok(value);
        }

        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.len() < before {
            trace!(function, evicted = before - entries.len(), "만료 엔트리 제거");
        }
        entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value.clone()),
                expires_at: now + self.ttl,
            },
        );
        Ok(value)
    }

    /// 모든 엔트리 제거.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
