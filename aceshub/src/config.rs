//! Configuration-related functionality for ACES Hub.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::{Error, Map, SupportedFormat, View};

/// Where a collection's records come from and how they can be filtered and
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// A file path or glob pattern. Relative paths are resolved against the
    /// directory containing the configuration file.
    pub source: String,
    #[serde(flatten)]
    pub view: View,
    /// Path to a Handlebars template rendering a single record.
    #[serde(default)]
    pub template: Option<PathBuf>,
    /// Placeholder shown when a filtered view is empty.
    #[serde(default)]
    pub empty: Option<String>,
}

/// ACES Hub configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collections: Map<String, CollectionConfig>,
    /// Path to a budget file.
    #[serde(default)]
    pub budget: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the given file, detecting its format from the
    /// file's extension. All relative paths in the configuration are resolved
    /// against the file's parent directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let fmt = SupportedFormat::from_path(path)?;
        let content =
            fs::read_to_string(path).wrap_err_with(|| Error::FailedToLoadConfig(path.to_path_buf()))?;
        let config: Self = fmt
            .deserialize(&content)
            .wrap_err_with(|| Error::FailedToLoadConfig(path.to_path_buf()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        for collection in self.collections.values_mut() {
            if Path::new(&collection.source).is_relative() {
                collection.source = base.join(&collection.source).display().to_string();
            }
            if let Some(template) = collection.template.as_mut() {
                if template.is_relative() {
                    *template = base.join(&*template);
                }
            }
        }
        if let Some(budget) = self.budget.as_mut() {
            if budget.is_relative() {
                *budget = base.join(&*budget);
            }
        }
        self
    }
}
