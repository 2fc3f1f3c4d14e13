use super::{
    CaptureError, CapturedImage, DatasetConfig, Environment, FrameCapture, SceneSnapshot,
};
use crate::projection::{label_text, project_fragments, Camera, OrbitCamera, YoloRecord};
use crate::shape::{GeometryLedger, TriangleSoup};
use crate::shatter::{shatter, ConfigError, Fragment};
use core::sync::atomic::{AtomicBool, Ordering};
use rand::RngCore;
use std::sync::Arc;

/// The name shared by the image and label files of a sample.
pub fn sample_name(index: usize) -> String {
    format!("sample_{:05}", index)
}

/// The stages of the generation of a dataset.
///
/// Every sample goes through `Reshatter`, the two optional randomization stages,
/// `CaptureImage`, `ComputeLabels` and `AppendSample`. After the last sample, or on
/// cancellation, the orchestrator goes through `Finalize` back to `Idle`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrchestratorState {
    /// No batch is running.
    Idle,
    /// Replacing the fragment set with a fresh shatter.
    Reshatter,
    /// Drawing a new camera.
    RandomizeCamera,
    /// Drawing a new background and lighting.
    RandomizeEnvironment,
    /// Rendering the posed fragments.
    CaptureImage,
    /// Projecting the posed fragments into annotations.
    ComputeLabels,
    /// Storing the finished sample.
    AppendSample,
    /// Closing the batch.
    Finalize,
}

/// A captured image with its annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetSample {
    /// The position of this sample in its batch.
    pub index: usize,
    /// The rendered image.
    pub image: CapturedImage,
    /// One annotation per visible fragment.
    pub records: Vec<YoloRecord>,
}

impl DatasetSample {
    /// The content of the label file of this sample.
    pub fn label_text(&self) -> String {
        label_text(&self.records)
    }
}

/// The outcome of one sample of a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleEntry {
    /// The sample was captured and labeled.
    Captured(DatasetSample),
    /// The capture failed; nothing is persisted for this index.
    Skipped {
        /// The position of this sample in its batch.
        index: usize,
        /// The capture error message.
        reason: String,
    },
}

impl SampleEntry {
    /// The position of this entry in its batch.
    pub fn index(&self) -> usize {
        match self {
            SampleEntry::Captured(sample) => sample.index,
            SampleEntry::Skipped { index, .. } => *index,
        }
    }

    /// The captured sample, if any.
    pub fn sample(&self) -> Option<&DatasetSample> {
        match self {
            SampleEntry::Captured(sample) => Some(sample),
            SampleEntry::Skipped { .. } => None,
        }
    }

    /// Was the capture of this entry skipped?
    pub fn is_skipped(&self) -> bool {
        matches!(self, SampleEntry::Skipped { .. })
    }
}

/// The output of a dataset generation run.
///
/// A cancelled batch is a valid, possibly partial, batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DatasetBatch {
    /// The entries, in index order.
    pub entries: Vec<SampleEntry>,
    /// The number of samples requested.
    pub requested: usize,
    /// Was the run stopped before producing `requested` entries?
    pub cancelled: bool,
}

impl DatasetBatch {
    /// The number of entries, captured or skipped.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Does this batch contain no entry?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The captured samples.
    pub fn samples(&self) -> impl Iterator<Item = &DatasetSample> {
        self.entries.iter().filter_map(SampleEntry::sample)
    }

    /// The number of skipped entries.
    pub fn num_skipped(&self) -> usize {
        self.entries.iter().filter(|e| e.is_skipped()).count()
    }

    /// The `(image, label text, index)` triples of the captured samples, for archiving.
    pub fn artifacts(&self) -> impl Iterator<Item = (&CapturedImage, String, usize)> {
        self.samples()
            .map(|sample| (&sample.image, sample.label_text(), sample.index))
    }
}

/// Generates datasets by repeatedly shattering a mesh, capturing it and labeling it.
///
/// Samples are produced strictly one after the other. [`Self::step`] runs one sample so
/// that a caller can refresh a display between samples; [`Self::generate`] runs a whole
/// batch. The cancellation flag is read before every sample.
pub struct DatasetOrchestrator<C, E, R> {
    mesh: TriangleSoup,
    config: DatasetConfig,
    capture: C,
    environment: E,
    rng: R,
    cancel: Arc<AtomicBool>,
    ledger: GeometryLedger,
    state: OrchestratorState,
    fragments: Vec<Fragment>,
    orbit: OrbitCamera,
    camera: Camera,
    requested: usize,
    next_index: usize,
    cancelled: bool,
    image: Option<CapturedImage>,
    records: Vec<YoloRecord>,
    entries: Vec<SampleEntry>,
}

impl<C, E, R> DatasetOrchestrator<C, E, R>
where
    C: FrameCapture,
    E: Environment,
    R: RngCore,
{
    /// Creates an idle orchestrator.
    ///
    /// Fails if `config` is invalid.
    pub fn new(
        mesh: TriangleSoup,
        config: DatasetConfig,
        capture: C,
        environment: E,
        rng: R,
        cancel: Arc<AtomicBool>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let orbit = config.camera;
        let camera = orbit.to_camera(config.viewport.aspect());

        Ok(Self {
            mesh,
            config,
            capture,
            environment,
            rng,
            cancel,
            ledger: GeometryLedger::new(),
            state: OrchestratorState::Idle,
            fragments: Vec::new(),
            orbit,
            camera,
            requested: 0,
            next_index: 0,
            cancelled: false,
            image: None,
            records: Vec::new(),
            entries: Vec::new(),
        })
    }

    /// The current stage.
    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// The fragments of the latest sample.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The camera of the latest sample.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The ledger tracking the fragment geometry of this orchestrator.
    pub fn ledger(&self) -> &GeometryLedger {
        &self.ledger
    }

    /// The entries of the running batch.
    pub fn entries(&self) -> &[SampleEntry] {
        &self.entries
    }

    /// The flag stopping the running batch when set.
    pub fn cancel_flag(&self) -> &Arc<AtomicBool> {
        &self.cancel
    }

    /// Starts a new batch of `sample_count` samples, discarding any unfinished one.
    pub fn begin(&mut self, sample_count: usize) {
        log::info!("Generating a dataset of {} samples.", sample_count);

        self.requested = sample_count;
        self.next_index = 0;
        self.cancelled = false;
        self.image = None;
        self.records.clear();
        self.entries.clear();
        self.state = if sample_count == 0 {
            OrchestratorState::Finalize
        } else {
            OrchestratorState::Reshatter
        };
    }

    /// Runs one full sample.
    ///
    /// Returns `false` once the batch is finished, either because every sample was
    /// produced or because it was cancelled. The batch can then be collected with
    /// [`Self::finish`].
    pub fn step(&mut self) -> bool {
        if self.state == OrchestratorState::Reshatter && self.cancel.load(Ordering::Acquire) {
            log::info!(
                "Dataset generation cancelled after {} of {} samples.",
                self.next_index,
                self.requested
            );
            self.cancelled = true;
            self.state = OrchestratorState::Finalize;
        }

        loop {
            match self.state {
                OrchestratorState::Idle => return false,
                OrchestratorState::Finalize => {
                    self.advance();
                    return false;
                }
                _ => {}
            }

            self.advance();

            if self.state == OrchestratorState::Reshatter {
                return true;
            }
        }
    }

    /// Closes the batch and returns its entries.
    pub fn finish(&mut self) -> DatasetBatch {
        if self.state != OrchestratorState::Idle {
            self.cancelled |= self.entries.len() < self.requested;
            self.state = OrchestratorState::Idle;
        }

        DatasetBatch {
            entries: core::mem::take(&mut self.entries),
            requested: self.requested,
            cancelled: self.cancelled,
        }
    }

    /// Runs a whole batch of `sample_count` samples.
    pub fn generate(&mut self, sample_count: usize) -> DatasetBatch {
        self.begin(sample_count);
        while self.step() {}
        self.finish()
    }

    fn advance(&mut self) {
        log::trace!("Sample {}: {:?}.", self.next_index, self.state);

        self.state = match self.state {
            OrchestratorState::Idle => OrchestratorState::Idle,
            OrchestratorState::Reshatter => {
                // Release the previous geometry before building the new set.
                self.fragments.clear();
                self.fragments = shatter(
                    &self.mesh,
                    &self.config.shatter,
                    &self.ledger,
                    &mut self.rng,
                );
                self.after_reshatter()
            }
            OrchestratorState::RandomizeCamera => {
                self.orbit = self
                    .config
                    .camera_jitter
                    .sample(&self.config.camera, &mut self.rng);
                self.camera = self.orbit.to_camera(self.config.viewport.aspect());
                self.after_camera()
            }
            OrchestratorState::RandomizeEnvironment => {
                if let Err(err) = self.environment.randomize(&mut self.rng) {
                    log::warn!(
                        "Sample {}: {}; using the fallback environment.",
                        self.next_index,
                        err
                    );
                    self.environment.use_fallback();
                }
                OrchestratorState::CaptureImage
            }
            OrchestratorState::CaptureImage => {
                let scene = SceneSnapshot {
                    fragments: &self.fragments,
                    camera: &self.camera,
                    viewport: self.config.viewport,
                    force: self.config.final_force,
                    rot_force: self.config.final_rot_force,
                };

                match self.capture.capture(&scene) {
                    Ok(image) if image.bytes.is_empty() => {
                        self.skip(CaptureError::EmptyImage)
                    }
                    Ok(image) => {
                        self.image = Some(image);
                        OrchestratorState::ComputeLabels
                    }
                    Err(err) => self.skip(err),
                }
            }
            OrchestratorState::ComputeLabels => {
                let class_id = self.config.class_id;
                self.records = project_fragments(
                    &self.fragments,
                    self.config.final_force,
                    self.config.final_rot_force,
                    &self.camera,
                    &self.config.viewport,
                )
                .iter()
                .map(|b| b.yolo(class_id))
                .collect();
                OrchestratorState::AppendSample
            }
            OrchestratorState::AppendSample => match self.image.take() {
                Some(image) => {
                    self.entries.push(SampleEntry::Captured(DatasetSample {
                        index: self.next_index,
                        image,
                        records: core::mem::take(&mut self.records),
                    }));
                    self.next_sample()
                }
                None => self.skip(CaptureError::EmptyImage),
            },
            OrchestratorState::Finalize => {
                log::info!(
                    "Dataset finished: {} entries, {} skipped.",
                    self.entries.len(),
                    self.entries.iter().filter(|e| e.is_skipped()).count()
                );
                OrchestratorState::Idle
            }
        };
    }

    fn after_reshatter(&self) -> OrchestratorState {
        if self.config.randomize_camera {
            OrchestratorState::RandomizeCamera
        } else {
            self.after_camera()
        }
    }

    fn after_camera(&self) -> OrchestratorState {
        if self.config.randomize_environment {
            OrchestratorState::RandomizeEnvironment
        } else {
            OrchestratorState::CaptureImage
        }
    }

    fn skip(&mut self, err: CaptureError) -> OrchestratorState {
        log::warn!("Sample {} skipped: {}.", self.next_index, err);
        self.entries.push(SampleEntry::Skipped {
            index: self.next_index,
            reason: err.to_string(),
        });
        self.next_sample()
    }

    fn next_sample(&mut self) -> OrchestratorState {
        self.next_index += 1;

        if self.next_index < self.requested {
            OrchestratorState::Reshatter
        } else {
            OrchestratorState::Finalize
        }
    }
}
