//! Downstream training configuration.
//!
//! Not part of the extraction core: these are the hyperparameter
//! structures the representation-learning pipeline consumes alongside the
//! produced records. Defaults carry the reference values; serde round-trips
//! them to and from the pipeline's JSON config surface.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub content_depth: usize,
    pub class_depth: usize,
    pub content_std: f64,
    pub perceptual_loss: PerceptualLossConfig,
    pub train: TrainConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerceptualLossConfig {
    /// Feature-extractor layer ids the loss taps.
    pub layers: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub n_epochs: usize,
    pub learning_rate: LearningRates,
    pub loss_weights: LossWeights,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningRates {
    pub latent: f64,
    pub generator: f64,
    pub discriminator: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossWeights {
    pub reconstruction: f64,
    pub content_decay: f64,
    pub adversarial: f64,
    pub gradient_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            content_depth: 1,
            class_depth: 256,
            content_std: 1.0,
            perceptual_loss: PerceptualLossConfig {
                layers: vec![2, 7, 12, 21, 30],
            },
            train: TrainConfig {
                batch_size: 64,
                n_epochs: 1000,
                learning_rate: LearningRates {
                    latent: 1e-3,
                    generator: 1e-4,
                    discriminator: 1e-4,
                },
                loss_weights: LossWeights {
                    reconstruction: 1.0,
                    content_decay: 1e-4,
                    adversarial: 0.0,
                    gradient_penalty: 0.0,
                },
            },
        }
    }
}
