use super::cube;
use core::sync::atomic::{AtomicBool, Ordering};
use rand::{RngCore, SeedableRng};
use rand_isaac::IsaacRng;
use shard3d::dataset::{
    sample_name, CaptureError, CapturedImage, DatasetConfig, DatasetOrchestrator, DirectorySink,
    Environment, EnvironmentError, FrameCapture, OrchestratorState, SampleEntry, SceneSnapshot,
    StaticEnvironment,
};
use shard3d::projection::{project_fragments, YoloRecord};
use shard3d::shatter::ShatterConfig;
use std::sync::Arc;

#[derive(Default)]
struct FakeCapture {
    calls: usize,
    fail_at: Option<usize>,
    cancel_at: Option<(usize, Arc<AtomicBool>)>,
}

impl FrameCapture for FakeCapture {
    fn capture(&mut self, scene: &SceneSnapshot<'_>) -> Result<CapturedImage, CaptureError> {
        let call = self.calls;
        self.calls += 1;

        if let Some((at, flag)) = &self.cancel_at {
            if *at == call {
                flag.store(true, Ordering::Release);
            }
        }

        if self.fail_at == Some(call) {
            return Err(CaptureError::Renderer("device lost".to_string()));
        }

        Ok(CapturedImage {
            width: scene.viewport.width,
            height: scene.viewport.height,
            bytes: vec![call as u8; 4],
            extension: "png".to_string(),
        })
    }
}

#[derive(Default)]
struct BrokenEnvironment {
    attempts: usize,
    fallbacks: usize,
}

impl Environment for BrokenEnvironment {
    fn randomize(&mut self, _: &mut dyn RngCore) -> Result<(), EnvironmentError> {
        self.attempts += 1;
        Err(EnvironmentError::AssetLoad {
            asset: "studio.hdr".to_string(),
            reason: "not found".to_string(),
        })
    }

    fn use_fallback(&mut self) {
        self.fallbacks += 1;
    }
}

fn config() -> DatasetConfig {
    DatasetConfig {
        shatter: ShatterConfig {
            fragment_count: 4,
            ..ShatterConfig::default()
        },
        ..DatasetConfig::default()
    }
}

#[test]
fn batch_has_one_entry_per_requested_sample() {
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        FakeCapture::default(),
        StaticEnvironment,
        IsaacRng::seed_from_u64(0),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    let batch = orchestrator.generate(5);

    assert_eq!(batch.len(), 5);
    assert!(!batch.cancelled);
    assert_eq!(batch.num_skipped(), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);

    for (i, entry) in batch.entries.iter().enumerate() {
        assert_eq!(entry.index(), i);
        let sample = entry.sample().unwrap();
        assert!(sample.records.len() <= 4);
        assert_eq!(sample.image.extension, "png");
        assert_eq!(sample.label_text().lines().count(), sample.records.len());
    }

    // Only the last shatter is still alive.
    assert_eq!(orchestrator.ledger().live(), orchestrator.fragments().len());
}

#[test]
fn capture_failures_are_skipped_entries() {
    let mut capture = FakeCapture {
        fail_at: Some(2),
        ..FakeCapture::default()
    };
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        &mut capture,
        StaticEnvironment,
        IsaacRng::seed_from_u64(1),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    let batch = orchestrator.generate(4);

    assert_eq!(batch.len(), 4);
    assert_eq!(batch.num_skipped(), 1);
    assert!(matches!(
        &batch.entries[2],
        SampleEntry::Skipped { index: 2, reason } if reason.contains("device lost")
    ));

    let indices: Vec<_> = batch.artifacts().map(|(_, _, index)| index).collect();
    assert_eq!(indices, vec![0, 1, 3]);
    drop(orchestrator);
    assert_eq!(capture.calls, 4);
}

#[test]
fn environment_failures_use_the_fallback() {
    let mut environment = BrokenEnvironment::default();
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        FakeCapture::default(),
        &mut environment,
        IsaacRng::seed_from_u64(2),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    let batch = orchestrator.generate(3);
    drop(orchestrator);

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.num_skipped(), 0);
    assert_eq!(environment.attempts, 3);
    assert_eq!(environment.fallbacks, 3);
}

#[test]
fn cancellation_keeps_the_in_flight_sample() {
    let cancel = Arc::new(AtomicBool::new(false));
    let capture = FakeCapture {
        cancel_at: Some((1, cancel.clone())),
        ..FakeCapture::default()
    };
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        capture,
        StaticEnvironment,
        IsaacRng::seed_from_u64(3),
        cancel,
    )
    .unwrap();

    let batch = orchestrator.generate(10);

    assert!(batch.cancelled);
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.samples().count(), 2);
}

#[test]
fn labels_come_from_the_final_pose() {
    let config = DatasetConfig {
        final_force: 0.8,
        final_rot_force: 0.5,
        class_id: 3,
        ..config()
    };
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config,
        FakeCapture::default(),
        StaticEnvironment,
        IsaacRng::seed_from_u64(6),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    orchestrator.begin(4);
    loop {
        let running = orchestrator.step();
        let expected: Vec<YoloRecord> = project_fragments(
            orchestrator.fragments(),
            config.final_force,
            config.final_rot_force,
            orchestrator.camera(),
            &config.viewport,
        )
        .iter()
        .map(|b| b.yolo(config.class_id))
        .collect();

        let sample = orchestrator.entries().last().unwrap().sample().unwrap();
        assert_eq!(sample.records, expected);
        assert!(sample.records.iter().all(|r| r.class_id == 3));

        if !running {
            break;
        }
    }

    assert_eq!(orchestrator.finish().len(), 4);
}

#[test]
fn final_force_moves_the_labels() {
    let records = |final_force| {
        let config = DatasetConfig {
            final_force,
            randomize_camera: false,
            ..config()
        };
        let batch = DatasetOrchestrator::new(
            cube(),
            config,
            FakeCapture::default(),
            StaticEnvironment,
            IsaacRng::seed_from_u64(7),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap()
        .generate(1);
        batch.entries[0].sample().unwrap().records.clone()
    };

    let at_rest = records(0.0);
    let exploded = records(1.0);

    assert!(!at_rest.is_empty());
    assert_ne!(at_rest, exploded);
}

#[test]
fn step_runs_one_sample_at_a_time() {
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        FakeCapture::default(),
        StaticEnvironment,
        IsaacRng::seed_from_u64(4),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();

    orchestrator.begin(3);
    assert_eq!(orchestrator.state(), OrchestratorState::Reshatter);

    assert!(orchestrator.step());
    assert_eq!(orchestrator.entries().len(), 1);
    assert!(orchestrator.step());
    assert_eq!(orchestrator.entries().len(), 2);
    assert!(!orchestrator.step());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
    assert!(!orchestrator.step());

    let batch = orchestrator.finish();
    assert_eq!(batch.len(), 3);
    assert!(!batch.cancelled);

    orchestrator.begin(3);
    assert!(orchestrator.step());
    orchestrator.cancel_flag().store(true, Ordering::Release);
    assert!(!orchestrator.step());

    let batch = orchestrator.finish();
    assert!(batch.cancelled);
    assert_eq!(batch.len(), 1);
}

#[test]
fn same_seed_same_labels() {
    let run = || {
        DatasetOrchestrator::new(
            cube(),
            config(),
            FakeCapture::default(),
            StaticEnvironment,
            IsaacRng::seed_from_u64(77),
            Arc::new(AtomicBool::new(false)),
        )
        .unwrap()
        .generate(3)
    };

    assert_eq!(run(), run());
}

#[test]
fn directory_sink_writes_images_and_labels() {
    let mut orchestrator = DatasetOrchestrator::new(
        cube(),
        config(),
        FakeCapture {
            fail_at: Some(0),
            ..FakeCapture::default()
        },
        StaticEnvironment,
        IsaacRng::seed_from_u64(5),
        Arc::new(AtomicBool::new(false)),
    )
    .unwrap();
    let batch = orchestrator.generate(2);

    let root = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(root.path());
    assert_eq!(sink.write_batch(&batch).unwrap(), 1);

    let name = sample_name(1);
    assert!(sink.images_dir().join(format!("{}.png", name)).is_file());
    let label = std::fs::read_to_string(sink.labels_dir().join(format!("{}.txt", name))).unwrap();
    assert_eq!(label, batch.entries[1].sample().unwrap().label_text());
    assert!(!sink.labels_dir().join(format!("{}.txt", sample_name(0))).exists());
    assert!(!sink.images_dir().join(format!("{}.png", sample_name(0))).exists());
}
