//! Shared test utilities for integration tests

use geoctx::aggregate::SessionOptions;
use geoctx::provider::{ScriptedProvider, SourceRegistry};
use geoctx::types::GeoQuery;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

pub fn query() -> GeoQuery {
    GeoQuery::from_degrees(51.4775, -0.4614, 10.0).unwrap()
}

pub fn options() -> SessionOptions {
    SessionOptions {
        source_timeout: Some(Duration::from_secs(2)),
        session_timeout: Some(Duration::from_secs(5)),
        cancel_grace: Duration::from_millis(50),
    }
}

/// Registry over the given providers; handles are returned for call counting.
pub fn registry(providers: Vec<ScriptedProvider>) -> (SourceRegistry, Vec<Arc<ScriptedProvider>>) {
    let mut registry = SourceRegistry::new();
    let mut handles = Vec::with_capacity(providers.len());
    for provider in providers {
        let provider = Arc::new(provider);
        registry.register(provider.clone()).unwrap();
        handles.push(provider);
    }
    (registry, handles)
}

/// Isolated XDG config home and workspace. Holds the env lock until dropped.
pub struct IsolatedEnv {
    pub temp_dir: TempDir,
    saved: Vec<(&'static str, Option<String>)>,
    _guard: MutexGuard<'static, ()>,
}

impl IsolatedEnv {
    pub fn new() -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = TempDir::new().unwrap();
        let keys = [
            "XDG_CONFIG_HOME",
            "GEOCTX_ENV",
            "GEOCTX__AGGREGATION__SESSION_TIMEOUT_MS",
            "GEOCTX__AGGREGATION__SOURCE_TIMEOUT_MS",
        ];
        let saved = keys.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for key in keys {
            std::env::remove_var(key);
        }
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path().join("xdg"));
        Self {
            temp_dir,
            saved,
            _guard: guard,
        }
    }

    pub fn workspace(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("workspace")
    }

    pub fn global_config(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("xdg").join("geoctx").join("config.toml")
    }

    pub fn write(&self, path: &std::path::Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    pub fn set_var(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }
}

impl Drop for IsolatedEnv {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}
