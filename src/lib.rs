pub mod bbox;
pub mod blob;
pub mod category;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod memory;
pub mod policy;
pub mod rolling_avg;

mod circular_queue;

pub use blob::Blob;
pub use category::Category;
pub use config::MemoryConfig;
pub use detection::{Detection, Observation};
pub use frame::Frame;
pub use memory::BlobMemory;

use error::Error;
use std::collections::hash_map::{Entry, HashMap};
use std::rc::Rc;

pub trait Tracking {
    /// Feeds one frame of `src`, returns whether its blobs changed noticeably.
    fn update(&mut self, frame: &Frame, src: &str) -> Result<bool, Error>;
    fn blobs(&self, src: &str) -> Rc<[Blob]>;
    fn close(&mut self, src: &str);
}

/// Keeps one [`BlobMemory`] per video source.
pub struct MemoryTracker {
    config: MemoryConfig,
    sessions: HashMap<String, BlobMemory>,
}

impl MemoryTracker {
    pub fn new(config: MemoryConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            sessions: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    #[inline]
    pub fn memory(&self, src: &str) -> Option<&BlobMemory> {
        self.sessions.get(src)
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self {
            config: MemoryConfig::default(),
            sessions: HashMap::new(),
        }
    }
}

impl crate::Tracking for MemoryTracker {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<bool, Error> {
        let memory = match self.sessions.entry(src.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(src, "opening blob memory");
                entry.insert(BlobMemory::new(&self.config)?)
            }
        };

        let observations = frame.observations(self.config.min_confidence);
        tracing::trace!(
            src,
            detections = frame.len(),
            observations = observations.len(),
            "frame"
        );

        Ok(memory.update(&observations))
    }

    #[inline]
    fn blobs(&self, src: &str) -> Rc<[Blob]> {
        if let Some(memory) = self.sessions.get(src) {
            return memory.blobs().into();
        }

        Rc::new([])
    }

    fn close(&mut self, src: &str) {
        if self.sessions.remove(src).is_some() {
            tracing::debug!(src, "closed blob memory");
        }
    }
}
