//! Feature Engineering - bag-of-words count matrices

use contracts::{
    FeatureEngineeringArtifact, FeatureEngineeringConfig, Stage, StageName, TransformationArtifact,
};
use learn::BagOfWords;
use tracing::info;

use crate::error::{Result, StageError};
use crate::io::{read_labeled_text, save_bincode, write_feature_matrix};

pub struct FeatureEngineeringStage {
    transformation: TransformationArtifact,
    config: FeatureEngineeringConfig,
}

impl FeatureEngineeringStage {
    pub fn new(transformation: TransformationArtifact) -> Self {
        Self::with_config(transformation, FeatureEngineeringConfig::default())
    }

    pub fn with_config(
        transformation: TransformationArtifact,
        config: FeatureEngineeringConfig,
    ) -> Self {
        Self {
            transformation,
            config,
        }
    }
}

fn vectorize(bow: &BagOfWords, rows: &[(String, u8)]) -> Vec<(Vec<u32>, u8)> {
    rows.iter()
        .map(|(text, label)| (bow.transform(text), *label))
        .collect()
}

impl Stage for FeatureEngineeringStage {
    type Artifact = FeatureEngineeringArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::FeatureEngineering
    }

    fn execute(&self) -> Result<FeatureEngineeringArtifact> {
        let train = read_labeled_text(&self.transformation.train_data_file_path)?;
        let test = read_labeled_text(&self.transformation.test_data_file_path)?;
        if train.is_empty() {
            return Err(StageError::EmptyDataset {
                path: self.transformation.train_data_file_path.clone(),
            });
        }

        // vocabulary comes from the training split only
        let docs: Vec<&str> = train.iter().map(|(text, _)| text.as_str()).collect();
        let bow = BagOfWords::fit(&docs, self.config.max_features);
        info!(
            features = bow.n_features(),
            max_features = self.config.max_features,
            "Vocabulary fitted on training split"
        );

        let cfg = &self.config;
        write_feature_matrix(
            &cfg.featured_train_data_file_path,
            bow.n_features(),
            &vectorize(&bow, &train),
        )?;
        write_feature_matrix(
            &cfg.featured_test_data_file_path,
            bow.n_features(),
            &vectorize(&bow, &test),
        )?;
        save_bincode(&cfg.vectorizer_file_path, &bow)?;
        info!(path = %cfg.vectorizer_file_path.display(), "Vectorizer saved");

        Ok(FeatureEngineeringArtifact {
            featured_train_data_file_path: cfg.featured_train_data_file_path.clone(),
            featured_test_data_file_path: cfg.featured_test_data_file_path.clone(),
            vectorizer_file_path: cfg.vectorizer_file_path.clone(),
        })
    }
}
