//! Process-wide, load-once access to the model artifact.
//!
//! The first caller loads the artifact under an init lock; every later call
//! gets the same instance without touching the filesystem.

use crate::artifact::ModelArtifact;
use crate::error::{ModelError, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// A model artifact slot that is filled at most once.
#[derive(Debug)]
pub struct ModelCache {
    slot: OnceLock<(PathBuf, ModelArtifact)>,
    init: Mutex<()>,
}

/// The cache shared by the whole process.
pub static MODEL_CACHE: ModelCache = ModelCache::new();

impl ModelCache {
    pub const fn new() -> Self {
        ModelCache {
            slot: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Artifact loaded so far, if any.
    pub fn get(&self) -> Option<&ModelArtifact> {
        self.slot.get().map(|(_, artifact)| artifact)
    }

    /// Return the cached artifact, loading it from `path` on first use.
    ///
    /// Once loaded, the artifact is never replaced: a later call naming a
    /// different path gets the original artifact and a warning.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<&ModelArtifact> {
        self.get_or_load_with(path.as_ref(), |p| ModelArtifact::from_path(p))
    }

    fn get_or_load_with<F>(&self, path: &Path, loader: F) -> Result<&ModelArtifact>
    where
        F: FnOnce(&Path) -> Result<ModelArtifact>,
    {
        if let Some(cached) = self.cached_for(path) {
            return Ok(cached);
        }
        let _guard = self.init.lock().map_err(|_| ModelError::Poisoned)?;
        // another caller may have finished loading while we waited
        if let Some(cached) = self.cached_for(path) {
            return Ok(cached);
        }
        let artifact = loader(path)?;
        let (_, artifact) = self
            .slot
            .get_or_init(|| (path.to_path_buf(), artifact));
        Ok(artifact)
    }

    fn cached_for(&self, path: &Path) -> Option<&ModelArtifact> {
        let (loaded_from, artifact) = self.slot.get()?;
        if loaded_from == path {
            debug!("Reusing cached model artifact {}", loaded_from.display());
        } else {
            warn!(
                "Model already loaded from {}; ignoring request for {}",
                loaded_from.display(),
                path.display()
            );
        }
        Some(artifact)
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::Regressor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn constant(value: f64) -> ModelArtifact {
        ModelArtifact {
            features: vec!["x".to_string()],
            model: Regressor::Linear {
                intercept: value,
                coefficients: vec![0.0],
            },
        }
    }

    #[test]
    fn test_loads_once() {
        let cache = ModelCache::new();
        let loads = AtomicUsize::new(0);
        let loader = |_: &Path| {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(constant(1.0))
        };
        let first = cache
            .get_or_load_with(Path::new("a.json"), loader)
            .unwrap() as *const ModelArtifact;
        let second = cache
            .get_or_load_with(Path::new("a.json"), loader)
            .unwrap() as *const ModelArtifact;
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_path_gets_cached_artifact() {
        let cache = ModelCache::new();
        cache
            .get_or_load_with(Path::new("a.json"), |_| Ok(constant(1.0)))
            .unwrap();
        let artifact = cache
            .get_or_load_with(Path::new("b.json"), |_| Ok(constant(2.0)))
            .unwrap();
        assert_eq!(artifact.predict(&[0.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_failed_load_leaves_cache_empty() {
        let cache = ModelCache::new();
        let err = cache
            .get_or_load_with(Path::new("a.json"), |_| {
                Err(ModelError::InvalidArtifact("broken".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidArtifact(_)));
        assert!(cache.get().is_none());
        let artifact = cache
            .get_or_load_with(Path::new("a.json"), |_| Ok(constant(3.0)))
            .unwrap();
        assert_eq!(artifact.predict(&[0.0]).unwrap(), 3.0);
    }

    #[test]
    fn test_concurrent_callers_share_one_load() {
        let cache = Arc::new(ModelCache::new());
        let loads = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let loads = Arc::clone(&loads);
                thread::spawn(move || {
                    let artifact = cache
                        .get_or_load_with(Path::new("a.json"), |_| {
                            loads.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(std::time::Duration::from_millis(10));
                            Ok(constant(4.0))
                        })
                        .unwrap();
                    artifact.predict(&[0.0]).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4.0);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_from_fixture() {
        let cache = ModelCache::new();
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/pm25_linear.json");
        let artifact = cache.load(path).unwrap();
        assert_eq!(artifact.features.len(), 9);
        assert!(cache.get().is_some());
    }
}
