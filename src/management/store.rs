use std::collections::{HashSet, VecDeque};

use futures::{Stream, stream};

use crate::{Error, Res, types::Track};

/// Pattern passed to every `SCAN`; track ids are stored without a prefix.
pub const SCAN_PATTERN: &str = "*";

/// Minimal key-value capability the record store is built on.
///
/// `scan` follows the Redis cursor protocol: start with cursor `0`, feed the
/// returned cursor into the next call and stop once it is `0` again.
#[allow(async_fn_in_trait)]
pub trait KvBackend {
    async fn set(&mut self, key: &str, value: Vec<u8>) -> Res<()>;

    async fn get(&mut self, key: &str) -> Res<Option<Vec<u8>>>;

    async fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> Res<(u64, Vec<String>)>;
}

/// Track records keyed by track id.
pub struct RecordStore<B> {
    backend: B,
    scan_count: usize,
}

impl<B: KvBackend> RecordStore<B> {
    pub fn new(backend: B, scan_count: usize) -> Self {
        Self {
            backend,
            scan_count: scan_count.max(1),
        }
    }

    /// Writes the track as JSON under `key`, replacing any previous value.
    pub async fn put(&mut self, key: &str, track: &Track) -> Res<()> {
        let value = serde_json::to_vec(track).map_err(|e| Error::Store(e.to_string()))?;
        self.backend.set(key, value).await
    }

    pub async fn get(&mut self, key: &str) -> Res<Option<Track>> {
        match self.backend.get(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| Error::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Lazily enumerates every record in the store.
    ///
    /// Keys are pulled page by page with `SCAN` and each value is fetched and
    /// decoded on its own. A key whose value cannot be read or decoded shows
    /// up as an `Err` item and the scan moves on to the next key. A failing
    /// `SCAN` is yielded as the last item. Keys the backend returns more than
    /// once are yielded once, keys deleted mid-scan are skipped.
    ///
    /// # Memory
    ///
    /// Values are held one at a time, but every key seen so far is kept for
    /// the deduplication until the stream is dropped. Memory therefore grows
    /// with the number of keys in the store (the key strings only).
    pub fn scan_all(&mut self) -> impl Stream<Item = Res<(String, Track)>> + '_ {
        let state = ScanState {
            backend: &mut self.backend,
            count: self.scan_count,
            cursor: 0,
            pending: VecDeque::new(),
            seen: HashSet::new(),
            finished: false,
        };

        stream::unfold(state, |mut st| async move {
            loop {
                if let Some(key) = st.pending.pop_front() {
                    if !st.seen.insert(key.clone()) {
                        continue;
                    }
                    let fetched = st.backend.get(&key).await;
                    let item = match fetched {
                        Ok(Some(bytes)) => match serde_json::from_slice::<Track>(&bytes) {
                            Ok(track) => Ok((key, track)),
                            Err(source) => Err(Error::Corrupt { key, source }),
                        },
                        Ok(None) => continue,
                        Err(e) => Err(e),
                    };
                    return Some((item, st));
                }

                if st.finished {
                    return None;
                }

                match st.backend.scan(st.cursor, SCAN_PATTERN, st.count).await {
                    Ok((next, keys)) => {
                        st.pending.extend(keys);
                        st.cursor = next;
                        st.finished = next == 0;
                    }
                    Err(e) => {
                        st.finished = true;
                        st.pending.clear();
                        return Some((Err(e), st));
                    }
                }
            }
        })
    }

    /// Releases the backend connection.
    pub fn close(self) {
        drop(self.backend);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

struct ScanState<'a, B> {
    backend: &'a mut B,
    count: usize,
    cursor: u64,
    pending: VecDeque<String>,
    seen: HashSet<String>,
    finished: bool,
}
