//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! - Contract checks on the resolved Run layout
//! - Full pipeline runs against the directory-backed store and local tracker
//! - Failure propagation and partial artifacts

#[cfg(test)]
mod fixtures {
    use std::path::Path;

    use contracts::constants::{DEFAULT_CONTAINER, DEFAULT_DATA_BLOB_PATH};
    use storage::FsObjectStore;

    pub const RAW: &str = "\
id,review,sentiment
1,An amazing film with brilliant acting,positive
2,Terrible plot and awful pacing,negative
3,Wonderful soundtrack and gorgeous visuals,positive
4,Boring characters and a dull script,negative
5,It was fine I guess,neutral
6,Loved every minute of this masterpiece,positive
7,Waste of time and money,negative
8,Superb direction and stunning cinematography,positive
9,Clumsy editing ruined the story,negative
10,Meh,mixed
";

    pub const PARAMS_YAML: &str = "\
version: 1
data_transformation:
  test_size: 0.2
feature_engineering:
  max_features: 20
model_params:
  C: 1.0
  penalty: l2
  solver: liblinear
";

    /// Directory-backed store holding the raw dataset at its default blob path
    pub fn seeded_store(root: &Path) -> FsObjectStore {
        let store = FsObjectStore::new(root);
        let blob = store.blob_path(DEFAULT_CONTAINER, DEFAULT_DATA_BLOB_PATH);
        std::fs::create_dir_all(blob.parent().unwrap()).unwrap();
        std::fs::write(blob, RAW).unwrap();
        store
    }

    pub fn write_params(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("params.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }
}

#[cfg(test)]
mod contract_tests {
    use std::collections::HashSet;

    use config_loader::ConfigResolver;
    use contracts::{PipelineError, StageName};

    use crate::fixtures::{write_params, PARAMS_YAML};

    #[test]
    fn test_declared_outputs_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let params = write_params(dir.path(), PARAMS_YAML);
        let config = ConfigResolver::resolve(&params, &dir.path().join("artifact")).unwrap();

        let outputs = config.declared_outputs();
        let unique: HashSet<_> = outputs.iter().map(|(_, p)| p.clone()).collect();
        assert_eq!(unique.len(), outputs.len());
        assert!(outputs.iter().all(|(_, p)| p.starts_with(&config.run.root)));
        assert!(outputs.iter().all(|(s, _)| *s != StageName::Pusher));
        // resolution alone creates nothing
        assert!(!config.run.root.exists());
    }

    #[test]
    fn test_invalid_params_fail_before_any_stage() {
        let dir = tempfile::tempdir().unwrap();
        let params = write_params(
            dir.path(),
            &PARAMS_YAML.replace("test_size: 0.2", "test_size: 1.5"),
        );

        let err = ConfigResolver::resolve(&params, &dir.path().join("artifact")).unwrap_err();

        assert!(matches!(err, PipelineError::ConfigResolution { .. }));
        assert!(!dir.path().join("artifact").exists());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::Path;

    use config_loader::{ConfigLoader, ConfigResolver};
    use contracts::constants::{
        ALPHA_ALIAS, CHALLENGER_ALIAS, DEFAULT_CONTAINER, DEFAULT_MODEL_BLOB_PATH,
        DEFAULT_MODEL_NAME, VETERAN_ALIAS,
    };
    use contracts::{ExperimentInfo, PipelineConfig, Run, RunStatus, StageName};
    use pipeline::{Collaborators, PipelineOptions, Predictor, RunState, TrainingPipeline};
    use registry::{promote_challenger, LocalTracker, MockConfig, MockRegistry};
    use stages::io::{read_feature_matrix, read_labeled_text};
    use storage::FsObjectStore;

    use crate::fixtures::{seeded_store, write_params, PARAMS_YAML};

    fn config(dir: &Path, run_id: &str) -> PipelineConfig {
        let params = ConfigLoader::load_from_path(&write_params(dir, PARAMS_YAML)).unwrap();
        ConfigResolver::resolve_with_run(Run::with_id(dir.join("artifact"), run_id), params)
    }

    fn header(path: &Path) -> String {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .next()
            .unwrap()
            .to_string()
    }

    fn run(
        config: PipelineConfig,
        store: &FsObjectStore,
        tracker: &LocalTracker,
        push: bool,
    ) -> pipeline::PipelineOutcome {
        TrainingPipeline::new(
            config,
            Collaborators {
                store,
                tracker,
                registry: tracker,
            },
            PipelineOptions { push },
        )
        .run()
        .unwrap()
    }

    /// Storage -> five stages -> tracker/registry -> pusher -> inference
    #[test]
    fn test_e2e_full_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir.path().join("storage"));
        let tracker = LocalTracker::open(dir.path().join("tracking")).unwrap();

        let outcome = run(config(dir.path(), "run-1"), &store, &tracker, true);
        assert_eq!(outcome.state, RunState::Done);
        let artifacts = &outcome.artifacts;

        // Transformation: only the two known labels survive
        let train = read_labeled_text(&artifacts.transformation.train_data_file_path).unwrap();
        let test = read_labeled_text(&artifacts.transformation.test_data_file_path).unwrap();
        assert_eq!(train.len() + test.len(), 8);
        assert_eq!(test.len(), 2);

        // Feature Engineering: same columns for both splits, capped vocabulary
        let fe = &artifacts.feature_engineering;
        assert_eq!(
            header(&fe.featured_train_data_file_path),
            header(&fe.featured_test_data_file_path)
        );
        let train_header = header(&fe.featured_train_data_file_path);
        assert_eq!(train_header.split(',').count(), 21);
        assert!(train_header.starts_with("0,1,"));
        assert!(train_header.ends_with(",19,label"));

        let (x_train, y_train) = read_feature_matrix(&fe.featured_train_data_file_path).unwrap();
        assert_eq!(x_train.len(), 6);
        assert_eq!(y_train.len(), 6);
        assert!(x_train.iter().all(|row| row.len() == 20));

        let (x_test, y_test) = read_feature_matrix(&fe.featured_test_data_file_path).unwrap();
        assert_eq!(x_test.len(), 2);
        assert_eq!(y_test.len(), 2);
        assert!(x_test.iter().all(|row| row.len() == 20));

        // Evaluation: tracked run, registered challenger
        let info: ExperimentInfo = serde_json::from_str(
            &std::fs::read_to_string(&artifacts.evaluation.experiment_info_file_path).unwrap(),
        )
        .unwrap();
        let record = tracker.run(&info.run_id).unwrap();
        assert_eq!(record.status, RunStatus::Finished);
        assert_eq!(
            record.metrics.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["accuracy", "auc", "precision", "recall"]
        );
        assert_eq!(info.registered_version, Some(1));
        assert_eq!(
            tracker.aliases(DEFAULT_MODEL_NAME).get(CHALLENGER_ALIAS),
            Some(&1)
        );

        // Pusher: model uploaded, local copy kept
        assert!(store
            .blob_path(DEFAULT_CONTAINER, DEFAULT_MODEL_BLOB_PATH)
            .exists());
        assert!(artifacts.trainer.model_object_file_path.exists());

        // Inference over the finished Run
        let predictor = Predictor::load(dir.path().join("artifact/run-1")).unwrap();
        let prediction = predictor.predict("An amazing film!").unwrap();
        assert!(prediction.label <= 1);
        assert!((0.0..=1.0).contains(&prediction.probability));
    }

    #[test]
    fn test_e2e_promotion_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir.path().join("storage"));
        let tracker = LocalTracker::open(dir.path().join("tracking")).unwrap();

        run(config(dir.path(), "run-1"), &store, &tracker, false);
        let first = promote_challenger(&tracker, DEFAULT_MODEL_NAME).unwrap();
        assert_eq!(first.promoted.version, 1);
        assert!(first.demoted.is_none());

        run(config(dir.path(), "run-2"), &store, &tracker, false);
        let second = promote_challenger(&tracker, DEFAULT_MODEL_NAME).unwrap();
        assert_eq!(second.promoted.version, 2);
        assert_eq!(second.demoted.map(|v| v.version), Some(1));

        let aliases = tracker.aliases(DEFAULT_MODEL_NAME);
        assert_eq!(aliases.get(ALPHA_ALIAS), Some(&2));
        assert_eq!(aliases.get(VETERAN_ALIAS), Some(&1));

        // state survives reopening the store
        let reopened = LocalTracker::open(dir.path().join("tracking")).unwrap();
        assert_eq!(reopened.aliases(DEFAULT_MODEL_NAME), aliases);
    }

    #[test]
    fn test_e2e_training_failure_keeps_partial_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir.path().join("storage"));
        let mock = MockRegistry::new();
        let mut cfg = config(dir.path(), "run-1");
        cfg.trainer
            .model_params
            .insert("kernel".into(), serde_json::json!("rbf"));
        let declared = cfg.declared_outputs();

        let mut pipeline = TrainingPipeline::new(
            cfg,
            Collaborators {
                store: &store,
                tracker: &mock,
                registry: &mock,
            },
            PipelineOptions { push: true },
        );
        let err = pipeline.run().unwrap_err();

        assert_eq!(err.failed_stage(), Some(StageName::Training));
        assert_eq!(pipeline.state(), RunState::Failed(StageName::Training));
        for (stage, path) in declared {
            let expected = stage < StageName::Training;
            assert_eq!(path.exists(), expected, "{stage}: {}", path.display());
        }
        assert!(mock.calls().is_empty());
        assert!(!store
            .blob_path(DEFAULT_CONTAINER, DEFAULT_MODEL_BLOB_PATH)
            .exists());
    }

    #[test]
    fn test_e2e_registration_failure_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded_store(&dir.path().join("storage"));
        let mock = MockRegistry::with_config(MockConfig {
            fail_register: true,
            ..Default::default()
        });

        let outcome = TrainingPipeline::new(
            config(dir.path(), "run-1"),
            Collaborators {
                store: &store,
                tracker: &mock,
                registry: &mock,
            },
            PipelineOptions::default(),
        )
        .run()
        .unwrap();

        assert_eq!(outcome.state, RunState::Done);
        assert_eq!(outcome.stats.registered_version, None);
        assert_eq!(mock.run_status("mock-run-1"), Some(RunStatus::Finished));
    }
}
