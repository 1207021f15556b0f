use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-word struggle score, 0.0 = mastered, 1.0 = maximal struggle.
pub type PerformanceStore = HashMap<String, f64>;

/// Score assumed for words with no recorded history. Unseen words count as
/// maximally struggled so they get practiced eagerly, but nothing is written
/// for them until their first real outcome.
pub const DEFAULT_SCORE: f64 = 1.0;

/// EMA smoothing factor: weight kept on the previous estimate. At 0.7 a
/// struggled word needs several clean solves before its score drops much,
/// so one lucky round doesn't stop the selector from drilling it.
pub const SMOOTHING: f64 = 0.7;

/// Stored score for `word`, or [`DEFAULT_SCORE`] if it was never recorded.
pub fn score_for(store: &PerformanceStore, word: &str) -> f64 {
    store.get(word).copied().unwrap_or(DEFAULT_SCORE)
}

/// Struggle penalty for a round settled after `attempts` submissions.
pub fn penalty_for_attempts(attempts: u32) -> f64 {
    match attempts {
        0 | 1 => 0.0,
        2 => 0.5,
        _ => 1.0,
    }
}

/// Blend a round's penalty into the word's running score and return the new
/// value. Both inputs lie in [0,1] and the result is a convex combination of
/// them, so the score can never leave [0,1].
pub fn update_score(store: &mut PerformanceStore, word: &str, attempts: u32) -> f64 {
    let prev = score_for(store, word);
    let next = prev * SMOOTHING + penalty_for_attempts(attempts) * (1.0 - SMOOTHING);
    store.insert(word.to_string(), next);
    next
}

/// Persistence seam for the score map. The map is a cache of past outcomes,
/// so reads recover silently and write failures are left to the caller to
/// ignore.
pub trait HistoryStore {
    fn load(&self) -> PerformanceStore;
    fn save(&self, store: &PerformanceStore) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Default location prefers `~/.local/state/dikt/history.json`, falling
    /// back to the platform data dir and finally the working directory.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("dikt")
                .join("history.json")
        } else if let Some(pd) = ProjectDirs::from("", "", "dikt") {
            pd.data_local_dir().join("history.json")
        } else {
            PathBuf::from("dikt_history.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> PerformanceStore {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(raw) = serde_json::from_slice::<PerformanceStore>(&bytes) {
                // Hand-edited or corrupt values must not break the score
                // invariant; clamp the salvageable ones and drop the rest.
                return raw
                    .into_iter()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(k, v)| (k, v.clamp(0.0, 1.0)))
                    .collect();
            }
        }
        PerformanceStore::new()
    }

    fn save(&self, store: &PerformanceStore) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(store).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
