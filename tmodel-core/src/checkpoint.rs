//! Checkpoint ("weights") file paths.
//!
//! Checkpoints are saved under `{model_folder}/{model_basename}{epoch}.pt`, but
//! resumption scans `{datasource}_{model_folder}`. Both layouts are kept as-is
//! because existing runs depend on them; use [`WeightsLocator::weights_dir`] and
//! [`WeightsLocator::resume_dir`] to see which folder a path comes from.
//!
//! "Latest" means lexicographically greatest file name, so epoch labels must be
//! zero-padded to a fixed width (see [`epoch_label`]) for it to match training
//! order: `tmodel_9.pt` sorts after `tmodel_10.pt`.

use crate::config::TrainingConfig;
use crate::error::TmodelError;
use globset::{Glob, GlobMatcher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint file extension.
pub const WEIGHTS_EXTENSION: &str = "pt";

/// Preload label that resumes from the most recent checkpoint found.
pub const PRELOAD_LATEST: &str = "latest";

/// Zero-padded label for an epoch number, e.g. `3` -> `"03"`.
pub fn epoch_label(epoch: usize) -> String {
    format!("{epoch:02}")
}

/// Save path for `epoch`, relative to the current directory.
///
/// The label is not sanitized: separators or `..` in `epoch` end up in the path.
pub fn weights_file_path(config: &TrainingConfig, epoch: &str) -> PathBuf {
    WeightsLocator::new(config).weights_file_path(epoch)
}

/// Lexicographically last weights file in the resume directory, relative to
/// the current directory. `Ok(None)` when the directory is missing or empty.
pub fn latest_weights_file_path(config: &TrainingConfig) -> Result<Option<PathBuf>, TmodelError> {
    WeightsLocator::new(config).latest_weights_file_path()
}

/// Resolves checkpoint paths for one configuration.
#[derive(Debug, Clone)]
pub struct WeightsLocator {
    root: Option<PathBuf>,
    datasource: String,
    model_folder: String,
    model_basename: String,
}

impl WeightsLocator {
    /// Locator for `config`, producing paths relative to the current directory.
    pub fn new(config: &TrainingConfig) -> Self {
        Self {
            root: None,
            datasource: config.datasource.clone(),
            model_folder: config.model_folder.clone(),
            model_basename: config.model_basename.clone(),
        }
    }

    /// Anchor every produced path at `root` instead of the current directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    fn anchor(&self, relative: PathBuf) -> PathBuf {
        match &self.root {
            Some(root) => root.join(relative),
            None => relative,
        }
    }

    /// Folder new checkpoints are written to.
    pub fn weights_dir(&self) -> PathBuf {
        self.anchor(PathBuf::from(&self.model_folder))
    }

    /// Folder scanned when resuming.
    pub fn resume_dir(&self) -> PathBuf {
        self.anchor(PathBuf::from(format!(
            "{}_{}",
            self.datasource, self.model_folder
        )))
    }

    /// Save path for `epoch` under [`weights_dir`](Self::weights_dir).
    pub fn weights_file_path(&self, epoch: &str) -> PathBuf {
        let filename = format!("{}{epoch}.{WEIGHTS_EXTENSION}", self.model_basename);
        self.weights_dir().join(filename)
    }

    fn matcher(&self) -> Result<GlobMatcher, TmodelError> {
        let pattern = format!("{}*", self.model_basename);
        Ok(Glob::new(&pattern)?.compile_matcher())
    }

    /// All weights files in the resume directory, in ascending path order.
    ///
    /// A missing resume directory (or a file in its place) yields an empty
    /// list; any other listing failure is returned.
    pub fn list_weights_files(&self) -> Result<Vec<PathBuf>, TmodelError> {
        let dir = self.resume_dir();
        let matcher = self.matcher()?;
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                tracing::debug!(dir = %dir.display(), "No checkpoint directory");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if matcher.is_match(Path::new(&entry.file_name())) {
                files.push(entry.path());
            }
        }
        files.sort();

        tracing::debug!(
            dir = %dir.display(),
            count = files.len(),
            "Scanned checkpoint directory"
        );
        Ok(files)
    }

    /// Last entry of [`list_weights_files`](Self::list_weights_files), if any.
    pub fn latest_weights_file_path(&self) -> Result<Option<PathBuf>, TmodelError> {
        Ok(self.list_weights_files()?.pop())
    }

    /// Checkpoint to resume from for a `preload` setting.
    ///
    /// `"latest"` scans the resume directory; any other label maps to its save
    /// path without checking that the file exists.
    pub fn resolve_preload(&self, preload: Option<&str>) -> Result<Option<PathBuf>, TmodelError> {
        match preload {
            None => Ok(None),
            Some(PRELOAD_LATEST) => {
                let latest = self.latest_weights_file_path()?;
                if latest.is_none() {
                    tracing::warn!(
                        dir = %self.resume_dir().display(),
                        "Preload requested latest checkpoint but none was found"
                    );
                }
                Ok(latest)
            }
            Some(label) => Ok(Some(self.weights_file_path(label))),
        }
    }
}
