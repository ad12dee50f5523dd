//! Sequential photo collection over a registry.
//!
//! One session is opened for the whole run and closed exactly once, on every
//! exit path: normal completion, interruption, or a panic inside the loop.
//! Entries are processed strictly in registry order with a fixed pause between
//! them so the remote service sees a low, steady request rate.

use crate::config::BatchConfig;
use crate::credentials::Credentials;
use crate::registry::{ProfileEntry, Registry};
use crate::store::{PhotoStore, destination_for};
use crate::{Error, Result};
use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};

/// An authenticated session able to resolve profile photo URLs
#[async_trait]
pub trait PhotoSession: Send + Sync {
    /// Resolve the photo URL for `entry`; `None` when it cannot be found
    async fn locate_photo(&self, entry: &ProfileEntry) -> Option<String>;

    /// Release every resource held by the session
    async fn close(self);
}

/// Creates authenticated sessions
#[async_trait]
pub trait SessionOpener: Send + Sync {
    type Session: PhotoSession;

    /// Single attempt; authentication failures surface as `Error::Authentication`
    async fn open(&self, credentials: &Credentials) -> Result<Self::Session>;
}

/// What happened to a single registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Photo written to this path
    Saved(PathBuf),
    /// No photo URL could be located
    NoPhoto,
    /// A URL was located but the download or write failed
    NotSaved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    pub local_id: String,
    pub outcome: EntryOutcome,
}

/// Per-entry outcomes of a run, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub results: Vec<EntryResult>,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Saved(_)))
    }

    pub fn without_photo(&self) -> usize {
        self.count(|o| *o == EntryOutcome::NoPhoto)
    }

    pub fn not_saved(&self) -> usize {
        self.count(|o| *o == EntryOutcome::NotSaved)
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

pub struct BatchDriver<S> {
    store: S,
    config: BatchConfig,
}

impl<S: PhotoStore> BatchDriver<S> {
    pub fn new(store: S, config: BatchConfig) -> Self {
        Self { store, config }
    }

    /// Collect photos for every entry of `registry` into `output_dir`
    pub async fn run<O: SessionOpener>(
        &self,
        opener: &O,
        registry: &Registry,
        credentials: &Credentials,
        output_dir: &Path,
    ) -> Result<BatchReport> {
        self.run_until(
            opener,
            registry,
            credentials,
            output_dir,
            std::future::pending::<()>(),
        )
        .await
    }

    /// Like [`run`](Self::run), but stops with `Error::Interrupted` once `shutdown` completes
    pub async fn run_until<O, F>(
        &self,
        opener: &O,
        registry: &Registry,
        credentials: &Credentials,
        output_dir: &Path,
        shutdown: F,
    ) -> Result<BatchReport>
    where
        O: SessionOpener,
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        tracing::info!("Opening session for {} profiles", registry.len());
        // Dropping a half-finished open tears down whatever it launched
        let session = tokio::select! {
            opened = opener.open(credentials) => opened?,
            _ = &mut shutdown => {
                tracing::warn!("Shutdown requested while opening the session");
                return Err(Error::Interrupted);
            }
        };

        let outcome = {
            let work = AssertUnwindSafe(self.process(&session, registry, output_dir)).catch_unwind();
            tokio::select! {
                result = work => result.map(Ok),
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping batch");
                    Ok(Err(Error::Interrupted))
                }
            }
        };

        tracing::debug!("Closing session");
        session.close().await;

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    async fn process<P: PhotoSession>(
        &self,
        session: &P,
        registry: &Registry,
        output_dir: &Path,
    ) -> BatchReport {
        let total = registry.len();
        let mut report = BatchReport::default();

        for (idx, entry) in registry.iter().enumerate() {
            if idx > 0 && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }

            tracing::info!("[{}/{}] {}", idx + 1, total, entry.display_name);

            let outcome = match session.locate_photo(entry).await {
                Some(url) => {
                    let destination = destination_for(output_dir, &entry.local_id);
                    if self.store.fetch_and_persist(&url, &destination).await {
                        EntryOutcome::Saved(destination)
                    } else {
                        EntryOutcome::NotSaved
                    }
                }
                None => {
                    tracing::info!("No photo found for {}", entry.display_name);
                    EntryOutcome::NoPhoto
                }
            };

            report.results.push(EntryResult {
                local_id: entry.local_id.clone(),
                outcome,
            });
        }

        tracing::debug!(
            "Batch finished: {} saved, {} without photo, {} not saved",
            report.saved(),
            report.without_photo(),
            report.not_saved()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::persist;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        opened: AtomicUsize,
        closed: AtomicUsize,
        located: Mutex<Vec<String>>,
    }

    struct FakeOpener {
        photos: HashMap<String, String>,
        reject: bool,
        /// Time spent launching and signing in
        open_delay: Duration,
        counters: Arc<Counters>,
    }

    impl FakeOpener {
        fn new(photos: &[(&str, &str)]) -> Self {
            Self {
                photos: photos
                    .iter()
                    .map(|(h, u)| (h.to_string(), u.to_string()))
                    .collect(),
                reject: false,
                open_delay: Duration::ZERO,
                counters: Arc::default(),
            }
        }
    }

    struct FakeSession {
        photos: HashMap<String, String>,
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl PhotoSession for FakeSession {
        async fn locate_photo(&self, entry: &ProfileEntry) -> Option<String> {
            if entry.external_handle == "explodes" {
                panic!("page crashed");
            }
            self.counters
                .located
                .lock()
                .unwrap()
                .push(entry.external_handle.clone());
            self.photos.get(&entry.external_handle).cloned()
        }

        async fn close(self) {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SessionOpener for FakeOpener {
        type Session = FakeSession;

        async fn open(&self, _credentials: &Credentials) -> Result<FakeSession> {
            tokio::time::sleep(self.open_delay).await;
            if self.reject {
                return Err(Error::Authentication("credentials rejected".to_string()));
            }
            self.counters.opened.fetch_add(1, Ordering::SeqCst);
            Ok(FakeSession {
                photos: self.photos.clone(),
                counters: self.counters.clone(),
            })
        }
    }

    /// Writes the URL itself as the file body; URLs containing "broken" fail
    struct FakeStore;

    #[async_trait]
    impl PhotoStore for FakeStore {
        async fn fetch_and_persist(&self, url: &str, destination: &Path) -> bool {
            if url.contains("broken") {
                return false;
            }
            persist(url.as_bytes(), destination).is_ok()
        }
    }

    fn driver(delay: Duration) -> BatchDriver<FakeStore> {
        BatchDriver::new(FakeStore, BatchConfig { delay })
    }

    fn credentials() -> Credentials {
        Credentials::new("someone@example.com", "secret")
    }

    fn registry(ids: &[&str]) -> Registry {
        ids.iter()
            .map(|id| ProfileEntry::new(id.to_uppercase(), format!("{}1", id), *id))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_saves_located_photo() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[("a1", "http://img/a.jpg")]);

        let report = driver(Duration::from_secs(2))
            .run(&opener, &registry(&["a"]), &credentials(), dir.path())
            .await
            .unwrap();

        let expected = dir.path().join("a.jpg");
        assert_eq!(report.results[0].outcome, EntryOutcome::Saved(expected.clone()));
        assert_eq!(std::fs::read(&expected).unwrap(), b"http://img/a.jpg");
        assert_eq!(opener.counters.opened.load(Ordering::SeqCst), 1);
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_photo_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[("a1", "http://img/a.jpg")]);

        let report = driver(Duration::ZERO)
            .run(&opener, &registry(&["a", "b"]), &credentials(), dir.path())
            .await
            .unwrap();

        assert_eq!(report.saved(), 1);
        assert_eq!(report.without_photo(), 1);
        assert_eq!(report.results[1].outcome, EntryOutcome::NoPhoto);
        assert!(!dir.path().join("b.jpg").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[("a1", "http://img/broken.jpg"), ("b1", "http://img/b.jpg")]);

        let report = driver(Duration::ZERO)
            .run(&opener, &registry(&["a", "b"]), &credentials(), dir.path())
            .await
            .unwrap();

        assert_eq!(report.results[0].outcome, EntryOutcome::NotSaved);
        assert!(matches!(report.results[1].outcome, EntryOutcome::Saved(_)));
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_processed_in_order_with_delay_between() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[]);
        let started = tokio::time::Instant::now();

        driver(Duration::from_secs(2))
            .run(&opener, &registry(&["c", "a", "b"]), &credentials(), dir.path())
            .await
            .unwrap();

        // Two pauses for three entries, none after the last
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(
            *opener.counters.located.lock().unwrap(),
            vec!["c1".to_string(), "a1".to_string(), "b1".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_authentication_error_propagates_without_close() {
        let dir = tempfile::tempdir().unwrap();
        let mut opener = FakeOpener::new(&[("a1", "http://img/a.jpg")]);
        opener.reject = true;

        let result = driver(Duration::ZERO)
            .run(&opener, &registry(&["a"]), &credentials(), dir.path())
            .await;

        assert!(matches!(result, Err(Error::Authentication(_))));
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_closed_once_when_entry_panics() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[("a1", "http://img/a.jpg")]);
        let registry = Registry::new(vec![
            ProfileEntry::new("A", "a1", "a"),
            ProfileEntry::new("Boom", "explodes", "boom"),
            ProfileEntry::new("C", "c1", "c"),
        ]);
        let driver = driver(Duration::from_secs(1));

        let result = AssertUnwindSafe(driver.run(&opener, &registry, &credentials(), dir.path()))
            .catch_unwind()
            .await;

        assert!(result.is_err());
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 1);
        assert!(dir.path().join("a.jpg").exists());
        assert_eq!(*opener.counters.located.lock().unwrap(), vec!["a1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_and_closes() {
        let dir = tempfile::tempdir().unwrap();
        let opener = FakeOpener::new(&[("a1", "http://img/a.jpg"), ("b1", "http://img/b.jpg")]);

        let result = driver(Duration::from_secs(10))
            .run_until(
                &opener,
                &registry(&["a", "b"]),
                &credentials(),
                dir.path(),
                tokio::time::sleep(Duration::from_secs(5)),
            )
            .await;

        assert!(matches!(result, Err(Error::Interrupted)));
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 1);
        assert!(dir.path().join("a.jpg").exists());
        assert!(!dir.path().join("b.jpg").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_open_returns_without_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut opener = FakeOpener::new(&[("a1", "http://img/a.jpg")]);
        opener.open_delay = Duration::from_secs(30);
        let started = tokio::time::Instant::now();

        let result = driver(Duration::ZERO)
            .run_until(
                &opener,
                &registry(&["a"]),
                &credentials(),
                dir.path(),
                tokio::time::sleep(Duration::from_secs(5)),
            )
            .await;

        assert!(matches!(result, Err(Error::Interrupted)));
        assert!(started.elapsed() < Duration::from_secs(30));
        assert_eq!(opener.counters.opened.load(Ordering::SeqCst), 0);
        assert_eq!(opener.counters.closed.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("a.jpg").exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rerun_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let entries = registry(&["a"]);

        let first = FakeOpener::new(&[("a1", "http://img/a-old.jpg")]);
        driver(Duration::ZERO)
            .run(&first, &entries, &credentials(), dir.path())
            .await
            .unwrap();

        let second = FakeOpener::new(&[("a1", "http://img/a-new.jpg")]);
        driver(Duration::ZERO)
            .run(&second, &entries, &credentials(), dir.path())
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.jpg")).unwrap(), b"http://img/a-new.jpg");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
