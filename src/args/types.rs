use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}

/// Ordered concurrency levels swept by one benchmarking session.
///
/// Always non-empty; duplicates are kept so a level can be re-measured later
/// in the same sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyLevels(Vec<PositiveUsize>);

impl ConcurrencyLevels {
    /// Builds a level list from raw values.
    ///
    /// # Errors
    ///
    /// Returns an error when the list is empty or any value is zero.
    pub fn from_values(values: &[usize]) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::ConcurrencyListEmpty);
        }
        let mut levels = Vec::with_capacity(values.len());
        for value in values {
            let level = PositiveUsize::try_from(*value).map_err(|err| {
                ValidationError::InvalidConcurrencyLevel {
                    entry: value.to_string(),
                    source: Box::new(err),
                }
            })?;
            levels.push(level);
        }
        Ok(Self(levels))
    }

    #[must_use]
    pub fn single(level: PositiveUsize) -> Self {
        Self(vec![level])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PositiveUsize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|level| level.get())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for ConcurrencyLevels {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ValidationError::ConcurrencyListEmpty);
        }
        let mut levels = Vec::new();
        for (index, entry) in s.split(',').enumerate() {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(ValidationError::ConcurrencyEntryEmpty {
                    value: s.to_owned(),
                    index: index.saturating_add(1),
                });
            }
            let level = entry.parse::<PositiveUsize>().map_err(|err| {
                ValidationError::InvalidConcurrencyLevel {
                    entry: entry.to_owned(),
                    source: Box::new(err),
                }
            })?;
            levels.push(level);
        }
        Ok(Self(levels))
    }
}

impl std::fmt::Display for ConcurrencyLevels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for level in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}", level.get())?;
            first = false;
        }
        Ok(())
    }
}
