// TTL cache with at most one computation in flight per key.
//
// Every key owns an async slot. A caller that finds the slot empty or expired
// computes while holding the slot lock; callers for the same key queue behind
// it and take its outcome. A failure is handed only to callers that were
// already waiting when it happened and is never served to later arrivals.
// A dropped computation leaves nothing behind. Expiry is checked lazily on
// read; nothing is evicted.

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

enum State<V, E> {
    Empty,
    Ready { value: V, expires_at: Instant },
    /// Outcome of the computation that finished at `generation`.
    Failed { error: E, generation: u64 },
}

struct Slot<V, E> {
    state: tokio::sync::Mutex<State<V, E>>,
    /// Bumped each time a computation finishes, under the state lock.
    generation: AtomicU64,
}

impl<V, E> Default for Slot<V, E> {
    fn default() -> Self {
        Self { state: tokio::sync::Mutex::new(State::Empty), generation: AtomicU64::new(0) }
    }
}

pub struct TtlCache<K, V, E> {
    name: &'static str,
    slots: Mutex<AHashMap<K, Arc<Slot<V, E>>>>,
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
    E: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self { name, slots: Mutex::new(AHashMap::new()) }
    }

    fn slot(&self, key: &K) -> Arc<Slot<V, E>> {
        let mut slots = self.slots.lock();
        slots.entry(key.clone()).or_default().clone()
    }

    /// Return the live entry for `key`, or run `compute` and store its result
    /// until `now + ttl`. Callers that queued behind a failing computation
    /// receive a clone of its error instead of computing again.
    pub async fn get_or_compute<F, Fut>(&self, key: &K, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let arrived_at = slot.generation.load(Ordering::Acquire);
        let mut state = slot.state.lock().await;

        match &*state {
            State::Ready { value, expires_at } if *expires_at > Instant::now() => {
                debug!(cache = self.name, key = %key, "cache hit");
                metrics::counter!("ltcx_cache_hits_total", "cache" => self.name).increment(1);
                return Ok(value.clone());
            }
            State::Failed { error, generation } if *generation > arrived_at => {
                debug!(cache = self.name, key = %key, "sharing failure of in-flight computation");
                return Err(error.clone());
            }
            _ => {}
        }

        debug!(cache = self.name, key = %key, ttl_secs = ttl.as_secs(), "cache miss");
        metrics::counter!("ltcx_cache_misses_total", "cache" => self.name).increment(1);

        let result = compute().await;
        let generation = slot.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *state = match &result {
            Ok(value) => State::Ready { value: value.clone(), expires_at: Instant::now() + ttl },
            Err(error) => State::Failed { error: error.clone(), generation },
        };
        result
    }

    /// Number of keys that currently hold an unexpired value.
    pub fn live_entries(&self) -> usize {
        let now = Instant::now();
        let slots: Vec<Arc<Slot<V, E>>> = self.slots.lock().values().cloned().collect();
        slots
            .iter()
            .filter(|slot| match slot.state.try_lock() {
                Ok(state) => matches!(&*state, State::Ready { expires_at, .. } if *expires_at > now),
                // Being recomputed right now
                Err(_) => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(180);

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_computes_once() {
        let cache: TtlCache<String, u32, ()> = TtlCache::new("test");
        let calls = AtomicUsize::new(0);
        let key = "snapshot:volume".to_string();

        for _ in 0..2 {
            let v = cache
                .get_or_compute(&key, TTL, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(7)
                })
                .await
                .unwrap();
            assert_eq!(v, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.live_entries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_recomputed() {
        let cache: TtlCache<String, u32, ()> = TtlCache::new("test");
        let calls = AtomicUsize::new(0);
        let key = "history:30:true".to_string();
        let compute = || async {
            Ok::<_, ()>(calls.fetch_add(1, Ordering::SeqCst) as u32)
        };

        assert_eq!(cache.get_or_compute(&key, TTL, compute).await.unwrap(), 0);
        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert_eq!(cache.live_entries(), 0);
        assert_eq!(cache.get_or_compute(&key, TTL, compute).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<String, u32, &str> = TtlCache::new("test");
        let key = "k".to_string();

        let err = cache.get_or_compute(&key, TTL, || async { Err::<u32, _>("upstream down") }).await;
        assert_eq!(err, Err("upstream down"));

        let ok = cache.get_or_compute(&key, TTL, || async { Ok::<_, &str>(3) }).await;
        assert_eq!(ok, Ok(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache: TtlCache<String, u32, ()> = TtlCache::new("test");
        let a = cache.get_or_compute(&"a".to_string(), TTL, || async { Ok::<_, ()>(1) }).await;
        let b = cache.get_or_compute(&"b".to_string(), TTL, || async { Ok::<_, ()>(2) }).await;
        assert_eq!((a, b), (Ok(1), Ok(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_misses_share_one_computation() {
        let cache = Arc::new(TtlCache::<String, u32, ()>::new("test"));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_compute(&"same".to_string(), TTL, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok::<_, ()>(42)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiters_share_a_failure_without_recomputing() {
        let cache = Arc::new(TtlCache::<String, u32, String>::new("test"));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_compute(&"same".to_string(), TTL, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_secs(10)).await;
                            Err::<u32, _>("timed out".to_string())
                        })
                        .await
                })
            })
            .collect();

        let started = Instant::now();
        for task in tasks {
            assert_eq!(task.await.unwrap(), Err("timed out".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(11));

        // A caller arriving after the failure computes afresh
        let ok = cache.get_or_compute(&"same".to_string(), TTL, || async { Ok::<_, String>(5) }).await;
        assert_eq!(ok, Ok(5));
        assert_eq!(cache.live_entries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_computation_is_retried_by_next_caller() {
        let cache = Arc::new(TtlCache::<String, u32, ()>::new("test"));
        let pending = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_compute(&"k".to_string(), TTL, || async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        Ok::<_, ()>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        let v = cache.get_or_compute(&"k".to_string(), TTL, || async { Ok::<_, ()>(2) }).await;
        assert_eq!(v, Ok(2));
    }
}
