use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe in-memory map from string keys to string values.
///
/// Every operation takes the same exclusive lock; the critical section is
/// just the map access, so contention is never the bottleneck for the small,
/// low-concurrency workload this store targets.
#[derive(Default)]
pub struct Store {
    inner: Mutex<HashMap<String, String>>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Last-writer-wins: overwrites any existing value for `key`.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut guard = self.inner.lock().unwrap();
        guard.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let guard = self.inner.lock().unwrap();
        guard.get(key).cloned()
    }

    /// Full snapshot of the store, for tests.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.inner.lock().unwrap().clone()
    }
}
