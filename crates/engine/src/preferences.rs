//! Key-value settings kept next to the ledger: the monthly budget, the
//! theme and the first-launch flag.
//!
//! They live in a small JSON document rather than in the relational store.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl TryFrom<&str> for ThemeMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(EngineError::Validation(format!(
                "invalid theme mode: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub monthly_budget: f64,
    pub theme_mode: ThemeMode,
    pub is_first_launch: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            monthly_budget: 0.0,
            theme_mode: ThemeMode::System,
            is_first_launch: true,
        }
    }
}

impl Preferences {
    /// The configured budget, or `None` when it is zero or negative.
    pub fn budget(&self) -> Option<f64> {
        (self.monthly_budget > 0.0).then_some(self.monthly_budget)
    }

    /// Overwrites the budget. Values `<= 0` unset it.
    pub fn set_monthly_budget(&mut self, amount: f64) {
        self.monthly_budget = amount;
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
    }

    /// Clears the first-launch flag, returning whether it was still set.
    pub fn complete_first_launch(&mut self) -> bool {
        std::mem::replace(&mut self.is_first_launch, false)
    }
}

/// File backed storage for [`Preferences`].
#[derive(Clone, Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing file yields the defaults.
    pub fn load(&self) -> ResultEngine<Preferences> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Replaces the whole document.
    pub fn save(&self, preferences: &Preferences) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(preferences)?;
        fs::write(&self.path, payload)?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    /// Loads, applies `change` and saves, returning the stored value.
    pub fn update(&self, change: impl FnOnce(&mut Preferences)) -> ResultEngine<Preferences> {
        let mut preferences = self.load()?;
        change(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}
