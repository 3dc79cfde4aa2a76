//! # tmodel-core — training configuration and checkpoint paths
//!
//! Hyperparameters for the English → Italian translation transformer, a
//! layered loader for them, and the path conventions used to save and resume
//! model checkpoints. The model, training loop and tokenizer pipeline live
//! elsewhere and only consume the values produced here.

pub mod checkpoint;
pub mod config;
pub mod error;

// Re-exports
pub use checkpoint::{
    PRELOAD_LATEST, WeightsLocator, epoch_label, latest_weights_file_path, weights_file_path,
};
pub use config::{ConfigOverrides, TrainingConfig, config_exists, load_config};
pub use error::TmodelError;
