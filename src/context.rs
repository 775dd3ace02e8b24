//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::LiveDescriber;
use crate::adapters::recording::RecordingDescriber;
use crate::adapters::replaying::ReplayingDescriber;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::clock::Clock;
use crate::ports::describer::DescriptionGenerator;
use crate::ports::filesystem::FileSystem;

/// Bundles the external boundaries a command needs.
///
/// Constructors differ only in how the description generator is wired; the
/// clock and filesystem are always live.
pub struct ServiceContext {
    /// Clock for failure timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem behind the link store.
    pub fs: Box<dyn FileSystem>,
    /// Description generator used by enrichment.
    pub describer: Box<dyn DescriptionGenerator>,
    /// Cassette written when the context is dropped.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Live context calling the real provider.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            describer: Box::new(LiveDescriber::new()),
            recorder: None,
        }
    }

    /// Live context that also records every generator call to `path`.
    ///
    /// The cassette is written when the context is dropped.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, "linkboard-session")));
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            describer: Box::new(RecordingDescriber::new(
                Box::new(LiveDescriber::new()),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        }
    }

    /// Context whose generator replays a cassette instead of calling out.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::load(path)?;
        Ok(Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            describer: Box::new(ReplayingDescriber::new(Arc::new(Mutex::new(replayer)))),
            recorder: None,
        })
    }

    /// Picks the constructor from `LINKBOARD_REPLAY` / `LINKBOARD_RECORD`.
    ///
    /// Replay wins when both are set.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_env() -> Result<Self, String> {
        if let Some(path) = env_path("LINKBOARD_REPLAY") {
            info!(cassette = %path.display(), "replaying description generator");
            return Self::replaying(&path);
        }
        if let Some(path) = env_path("LINKBOARD_RECORD") {
            info!(cassette = %path.display(), "recording description generator");
            return Ok(Self::recording(&path));
        }
        Ok(Self::live())
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let written = match recorder.lock() {
            Ok(guard) if guard.is_empty() => return,
            Ok(guard) => guard.write(),
            Err(_) => {
                warn!("cassette recorder lock poisoned; recording discarded");
                return;
            }
        };
        match written {
            Ok(path) => info!(cassette = %path.display(), "recording saved"),
            Err(e) => warn!(error = %e, "failed to write cassette"),
        }
    }
}
