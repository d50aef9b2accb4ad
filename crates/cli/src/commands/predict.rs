//! `predict` command implementation.

use anyhow::{Context, Result};
use pipeline::{Prediction, Predictor};
use serde::Serialize;
use tracing::info;

use crate::cli::PredictArgs;
use crate::error::CliError;

#[derive(Serialize)]
struct PredictionOutput<'a> {
    text: &'a str,
    sentiment: &'static str,
    #[serde(flatten)]
    prediction: Prediction,
}

/// Execute the `predict` command
pub fn run_predict(args: &PredictArgs) -> Result<()> {
    if !args.run_dir.is_dir() {
        return Err(CliError::run_not_found(&args.run_dir).into());
    }

    let predictor = Predictor::load(&args.run_dir)
        .with_context(|| format!("Failed to load model from {}", args.run_dir.display()))?;
    info!(
        run_dir = %args.run_dir.display(),
        features = predictor.n_features(),
        texts = args.texts.len(),
        "Classifying"
    );

    let mut outputs = Vec::with_capacity(args.texts.len());
    for text in &args.texts {
        let prediction = predictor
            .predict(text)
            .with_context(|| format!("Failed to classify '{text}'"))?;
        outputs.push(PredictionOutput {
            text,
            sentiment: prediction.sentiment(),
            prediction,
        });
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&outputs).context("Failed to serialize predictions")?;
        println!("{}", json);
    } else {
        for out in &outputs {
            println!(
                "{:<8} {:.3}  {}",
                out.sentiment, out.prediction.probability, out.text
            );
        }
    }

    Ok(())
}
