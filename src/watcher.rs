//! File watcher for continuous rebuilds
//!
//! Implements the `watch` command with:
//! - Debouncing (100ms)
//! - Full rescan and recompile per change batch
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::compiler::GrassCompiler;
use crate::error::{SasscadeError, SasscadeResult};
use crate::pipeline::{compile_all, BuildOptions};
use crate::scan::SASS_SUFFIX;

/// Debounce duration in milliseconds
const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Pipeline configuration used for every rebuild
    pub build: BuildOptions,
    /// Output as NDJSON
    pub json: bool,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Started { source_root: String },
    FileChanged { path: String },
    BuildStarted,
    BuildComplete { compiled: usize },
    BuildFailed { message: String },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        let value = match self {
            WatchEvent::Started { source_root } => {
                serde_json::json!({"event": "started", "source_root": source_root})
            }
            WatchEvent::FileChanged { path } => {
                serde_json::json!({"event": "file_changed", "path": path})
            }
            WatchEvent::BuildStarted => serde_json::json!({"event": "build_started"}),
            WatchEvent::BuildComplete { compiled } => {
                serde_json::json!({"event": "build_complete", "compiled": compiled})
            }
            WatchEvent::BuildFailed { message } => {
                serde_json::json!({"event": "build_failed", "message": message})
            }
            WatchEvent::Shutdown => serde_json::json!({"event": "shutdown"}),
        };
        value.to_string()
    }
}

/// Watcher state for debouncing
struct WatcherState {
    pending_changes: HashSet<PathBuf>,
    last_change: Option<Instant>,
}

impl WatcherState {
    fn new() -> Self {
        Self {
            pending_changes: HashSet::new(),
            last_change: None,
        }
    }

    fn add_change(&mut self, path: PathBuf) {
        self.pending_changes.insert(path);
        self.last_change = Some(Instant::now());
    }

    fn should_rebuild(&self) -> bool {
        if let Some(last) = self.last_change {
            !self.pending_changes.is_empty()
                && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
        } else {
            false
        }
    }

    fn take_changes(&mut self) -> Vec<PathBuf> {
        let changes: Vec<_> = self.pending_changes.drain().collect();
        self.last_change = None;
        changes
    }
}

/// Start watching for source changes
///
/// Performs an initial full build, then rebuilds (full rescan, full
/// recompile) whenever `.scss` files under the source root change. Partials
/// trigger rebuilds too since compilable files import them.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> SasscadeResult<()> {
    event_callback(WatchEvent::Started {
        source_root: options.build.source_root.display().to_string(),
    });

    do_build(&options, &event_callback)?;

    // Set up file watcher
    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        Config::default(),
    )
    .map_err(watch_error)?;

    watcher
        .watch(&options.build.source_root, RecursiveMode::Recursive)
        .map_err(watch_error)?;

    // Watch loop with debouncing
    let mut state = WatcherState::new();

    while running.load(Ordering::SeqCst) {
        // Check for file changes (non-blocking with timeout)
        if let Ok(path) = rx.recv_timeout(Duration::from_millis(50)) {
            let is_sass = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(SASS_SUFFIX))
                .unwrap_or(false);
            if is_sass {
                event_callback(WatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
                state.add_change(path);
            }
        }

        // Check if we should rebuild (debounced)
        if state.should_rebuild() {
            let _changes = state.take_changes();
            do_build(&options, &event_callback)?;
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

fn watch_error(e: notify::Error) -> SasscadeError {
    SasscadeError::Io(std::io::Error::other(e.to_string()))
}

fn do_build(options: &WatchOptions, callback: &impl Fn(WatchEvent)) -> SasscadeResult<()> {
    callback(WatchEvent::BuildStarted);

    let compiler = GrassCompiler::new();
    match compile_all(&options.build, &compiler, |_, _| {}) {
        Ok(summary) => {
            callback(WatchEvent::BuildComplete {
                compiled: summary.compiled,
            });
            Ok(())
        }
        // A broken source is reported and watching continues; the next save
        // triggers the rerun. Scan and I/O errors stay fatal.
        Err(e @ SasscadeError::Compile { .. }) => {
            callback(WatchEvent::BuildFailed {
                message: e.to_string(),
            });
            Ok(())
        }
        Err(e) => {
            callback(WatchEvent::BuildFailed {
                message: e.to_string(),
            });
            Err(e)
        }
    }
}
