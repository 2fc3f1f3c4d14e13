//! Generation of labeled object-detection datasets from repeated shatters.
//!
//! The renderer and the environment (backgrounds, lights) are provided by the caller
//! through the [`FrameCapture`] and [`Environment`] traits.

pub use self::collaborators::{
    CaptureError, CapturedImage, Environment, EnvironmentError, FrameCapture, SceneSnapshot,
    StaticEnvironment,
};
pub use self::config::DatasetConfig;
pub use self::orchestrator::{
    sample_name, DatasetBatch, DatasetOrchestrator, DatasetSample, OrchestratorState,
    SampleEntry,
};
pub use self::sink::{DirectorySink, SinkError};

mod collaborators;
mod config;
mod orchestrator;
mod sink;
