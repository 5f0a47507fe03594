//! The liked tracks batch job.
//!
//! A run walks through fixed stages, in order, without going back:
//!
//! 1. **Init** - the caller connects the [`RecordStore`] and lends it out
//! 2. **Authenticate** - read the access token from the credential store
//! 3. **Fetch** - one `GET /me/tracks` call
//! 4. **Persist** - `put` every track under its id
//! 5. **Report** - scan the whole store and print every record
//!
//! Authenticate and Fetch failures end the run before anything is written
//! or reported. A track that cannot be saved is reported and skipped; a
//! stored record that cannot be read back is reported and skipped. The
//! report includes records from earlier runs since the store is cumulative.

use std::{io::Write, pin::pin};

use futures::StreamExt;

use crate::{
    Error, Res, info,
    management::{CredentialStore, KvBackend, RecordStore, get_token},
    spotify::SpotifyClient,
    success,
    types::Track,
    utils, warning,
};

/// Outcome of a full pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    pub fetched: usize,
    pub persisted: usize,
    /// Ids of the tracks whose `put` failed.
    pub failed: Vec<String>,
    pub report: Report,
}

/// Everything the report stage found in the store.
#[derive(Debug, Default)]
pub struct Report {
    pub records: Vec<(String, Track)>,
    pub anomalies: Vec<Error>,
}

pub struct Pipeline<'a, S, B> {
    credentials: &'a S,
    spotify: &'a SpotifyClient,
    store: &'a mut RecordStore<B>,
}

impl<'a, S, B> Pipeline<'a, S, B>
where
    S: CredentialStore,
    B: KvBackend,
{
    pub fn new(
        store: &'a mut RecordStore<B>,
        credentials: &'a S,
        spotify: &'a SpotifyClient,
    ) -> Self {
        Self {
            credentials,
            spotify,
            store,
        }
    }

    /// Runs the job and writes the record table to `out`.
    ///
    /// The store stays borrowed for the whole run; the caller closes it
    /// once the report has been written.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Res<RunSummary> {
        let token = get_token(self.credentials).await?;

        let pb = utils::spinner("Fetching liked tracks...");
        let fetched = self.spotify.fetch_favorites(&token).await;
        pb.finish_and_clear();
        let tracks = fetched?;
        info!("Fetched {} liked tracks (first page only)", tracks.len());

        let failed = persist(self.store, &tracks).await;
        let persisted = tracks.len() - failed.len();
        if failed.is_empty() {
            success!("Saved {} tracks to the store", persisted);
        } else {
            warning!(
                "Saved {} tracks to the store, {} failed",
                persisted,
                failed.len()
            );
        }

        let report = report(self.store, out).await?;

        Ok(RunSummary {
            fetched: tracks.len(),
            persisted,
            failed,
            report,
        })
    }
}

/// Saves every track under its id and returns the ids that failed.
pub async fn persist<B: KvBackend>(store: &mut RecordStore<B>, tracks: &[Track]) -> Vec<String> {
    let mut failed = Vec::new();
    for track in tracks {
        if let Err(e) = store.put(&track.id, track).await {
            warning!("Failed to save track {}: {}", track.id, e);
            failed.push(track.id.clone());
        }
    }
    failed
}

/// Scans the whole store, prints every decodable record to `out` and
/// reports every entry that could not be read.
pub async fn report<B: KvBackend, W: Write>(
    store: &mut RecordStore<B>,
    out: &mut W,
) -> Res<Report> {
    let mut report = Report::default();

    {
        let mut entries = pin!(store.scan_all());
        while let Some(entry) = entries.next().await {
            match entry {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    warning!("Skipping stored entry: {}", e);
                    report.anomalies.push(e);
                }
            }
        }
    }

    if report.records.is_empty() {
        writeln!(out, "No tracks stored.")?;
    } else {
        writeln!(out, "{}", utils::render_track_table(&report.records))?;
    }
    info!(
        "{} records in store, {} unreadable",
        report.records.len(),
        report.anomalies.len()
    );

    Ok(report)
}
