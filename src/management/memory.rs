use std::collections::{BTreeMap, HashSet};

use crate::{Error, Res, management::KvBackend};

/// In-process backend with Redis-like cursor paging.
///
/// The cursor is the offset of the next key in sorted order, so a scan with
/// `count = 2` over five keys takes three pages. Writes to keys registered
/// with [`MemoryBackend::fail_writes_for`] fail with [`Error::Store`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: BTreeMap<String, Vec<u8>>,
    failing_keys: HashSet<String>,
    scan_calls: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes, bypassing the record encoding.
    pub fn insert_raw(&mut self, key: &str, value: impl Into<Vec<u8>>) {
        self.entries.insert(key.to_string(), value.into());
    }

    pub fn fail_writes_for(&mut self, key: &str) {
        self.failing_keys.insert(key.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of `scan` calls served so far.
    pub fn scan_calls(&self) -> usize {
        self.scan_calls
    }
}

impl KvBackend for MemoryBackend {
    async fn set(&mut self, key: &str, value: Vec<u8>) -> Res<()> {
        if self.failing_keys.contains(key) {
            return Err(Error::Store(format!("write rejected for key {key}")));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&mut self, key: &str) -> Res<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> Res<(u64, Vec<String>)> {
        self.scan_calls += 1;
        let start = usize::try_from(cursor).map_err(|e| Error::Store(e.to_string()))?;
        let keys: Vec<String> = self
            .entries
            .keys()
            .skip(start)
            .take(count)
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();

        let end = start.saturating_add(count);
        let next = if end >= self.entries.len() { 0 } else { end as u64 };
        Ok((next, keys))
    }
}

/// `*` matches any run of characters, everything else matches literally.
fn glob_match(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == key,
        Some((prefix, rest)) => {
            let Some(tail) = key.strip_prefix(prefix) else {
                return false;
            };
            if rest.is_empty() {
                return true;
            }
            (0..=tail.len())
                .filter(|i| tail.is_char_boundary(*i))
                .any(|i| glob_match(rest, &tail[i..]))
        }
    }
}
