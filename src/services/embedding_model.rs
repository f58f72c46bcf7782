use crate::error::EngineError;
use fastembed::{EmbeddingModel as FastEmbedModel, InitOptions, TextEmbedding};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// A loaded sentence-embedding model. Calls are blocking and CPU bound.
pub trait Embedder: Send + Sync {
    /// Mean-pooled, normalized embedding of `text`.
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Produces an [`Embedder`]. Runs on a blocking thread and may download weights.
pub trait EmbedderLoader: Send + Sync {
    fn load(&self) -> anyhow::Result<Arc<dyn Embedder>>;
}

pub struct FastEmbedder {
    model: TextEmbedding,
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut vectors = self.model.embed(vec![text], None)?;
        if vectors.is_empty() {
            anyhow::bail!("embedding model returned no vectors");
        }
        Ok(vectors.swap_remove(0))
    }
}

/// Loads all-MiniLM-L6-v2 through fastembed.
#[derive(Debug, Clone, Default)]
pub struct FastEmbedLoader {
    cache_dir: Option<PathBuf>,
}

impl FastEmbedLoader {
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        Self { cache_dir }
    }
}

impl EmbedderLoader for FastEmbedLoader {
    fn load(&self) -> anyhow::Result<Arc<dyn Embedder>> {
        let mut options =
            InitOptions::new(FastEmbedModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = &self.cache_dir {
            options = options.with_cache_dir(dir.clone());
        }
        let model = TextEmbedding::try_new(options)?;
        Ok(Arc::new(FastEmbedder { model }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

type LoadResult = Result<Arc<dyn Embedder>, EngineError>;

enum Slot {
    Uninitialized,
    Loading(watch::Receiver<Option<LoadResult>>),
    Ready(Arc<dyn Embedder>),
    Failed(EngineError),
}

/// Process-wide handle to the local embedding model.
///
/// Exactly one load is attempted. Callers arriving while it runs wait on the
/// same attempt; the outcome (ready or failed) is kept for the life of the
/// service. The load runs in its own task, so dropping a waiting caller does
/// not abort it.
#[derive(Clone)]
pub struct EmbeddingModel {
    loader: Arc<dyn EmbedderLoader>,
    slot: Arc<Mutex<Slot>>,
}

impl EmbeddingModel {
    pub fn new(loader: Arc<dyn EmbedderLoader>) -> Self {
        Self {
            loader,
            slot: Arc::new(Mutex::new(Slot::Uninitialized)),
        }
    }

    /// The loaded model, or `None` if loading failed.
    pub async fn get_instance(&self) -> Option<Arc<dyn Embedder>> {
        let mut rx = {
            let mut slot = self.slot.lock().expect("embedding model mutex poisoned");
            match &*slot {
                Slot::Ready(embedder) => return Some(embedder.clone()),
                Slot::Failed(_) => return None,
                Slot::Loading(rx) => rx.clone(),
                Slot::Uninitialized => {
                    let rx = self.start_load();
                    *slot = Slot::Loading(rx.clone());
                    rx
                }
            }
        };

        let instance = match rx.wait_for(|outcome| outcome.is_some()).await {
            Ok(outcome) => outcome
                .as_ref()
                .and_then(|res| res.as_ref().ok())
                .cloned(),
            Err(_) => None,
        };
        instance
    }

    /// Starts the load without waiting for it.
    pub fn prewarm(&self) {
        let model = self.clone();
        tokio::spawn(async move {
            model.get_instance().await;
        });
    }

    pub fn state(&self) -> ModelState {
        match &*self.slot.lock().expect("embedding model mutex poisoned") {
            Slot::Uninitialized => ModelState::Uninitialized,
            Slot::Loading(_) => ModelState::Loading,
            Slot::Ready(_) => ModelState::Ready,
            Slot::Failed(_) => ModelState::Failed,
        }
    }

    pub fn load_error(&self) -> Option<EngineError> {
        match &*self.slot.lock().expect("embedding model mutex poisoned") {
            Slot::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    fn start_load(&self) -> watch::Receiver<Option<LoadResult>> {
        let (tx, rx) = watch::channel(None);
        let loader = self.loader.clone();
        let slot = self.slot.clone();

        tokio::spawn(async move {
            tracing::info!("Loading embedding model");
            let started = std::time::Instant::now();
            let result: LoadResult = match tokio::task::spawn_blocking(move || loader.load()).await
            {
                Ok(Ok(embedder)) => Ok(embedder),
                Ok(Err(e)) => Err(EngineError::ModelLoadFailure(format!("{:#}", e))),
                Err(e) => Err(EngineError::ModelLoadFailure(format!(
                    "loader task failed: {}",
                    e
                ))),
            };

            match &result {
                Ok(_) => tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Embedding model ready"
                ),
                Err(e) => tracing::error!(
                    error = %e,
                    "Embedding model failed to load, answers will be scored by keyword overlap"
                ),
            }

            {
                let mut guard = slot.lock().expect("embedding model mutex poisoned");
                *guard = match &result {
                    Ok(embedder) => Slot::Ready(embedder.clone()),
                    Err(e) => Slot::Failed(e.clone()),
                };
            }
            let _ = tx.send(Some(result));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ConstEmbedder;

    impl Embedder for ConstEmbedder {
        fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct CountingLoader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLoader {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl EmbedderLoader for CountingLoader {
        fn load(&self) -> anyhow::Result<Arc<dyn Embedder>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(50));
            if self.fail {
                anyhow::bail!("weights not found");
            }
            Ok(Arc::new(ConstEmbedder))
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let loader = CountingLoader::new(false);
        let model = EmbeddingModel::new(loader.clone());
        assert_eq!(model.state(), ModelState::Uninitialized);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let model = model.clone();
                tokio::spawn(async move { model.get_instance().await.is_some() })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.state(), ModelState::Ready);
        assert!(model.get_instance().await.is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_terminal_and_not_retried() {
        let loader = CountingLoader::new(true);
        let model = EmbeddingModel::new(loader.clone());

        let (a, b) = tokio::join!(model.get_instance(), model.get_instance());
        assert!(a.is_none() && b.is_none());
        assert!(model.get_instance().await.is_none());

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.state(), ModelState::Failed);
        assert!(matches!(
            model.load_error(),
            Some(EngineError::ModelLoadFailure(msg)) if msg.contains("weights not found")
        ));
    }

    #[tokio::test]
    async fn dropped_caller_does_not_cancel_the_load() {
        let loader = CountingLoader::new(false);
        let model = EmbeddingModel::new(loader.clone());

        let waiting = model.get_instance();
        let _ = tokio::time::timeout(Duration::from_millis(5), waiting).await;
        assert_eq!(model.state(), ModelState::Loading);

        assert!(model.get_instance().await.is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn prewarm_starts_loading_in_background() {
        let loader = CountingLoader::new(false);
        let model = EmbeddingModel::new(loader.clone());
        model.prewarm();

        for _ in 0..100 {
            if model.state() == ModelState::Ready {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(model.state(), ModelState::Ready);
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }
}
