use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::error::SourceError;
use super::model::Service;
use super::parse::{RawEnvironmentState, map_environment_state, parse_environment_file};

/// Where environments and their services come from.
///
/// Implementations block; callers run them off the UI thread.
pub trait ServiceSource: Send + Sync {
    fn describe(&self) -> String;

    fn environments(&self) -> Result<Vec<String>, SourceError>;

    fn services(&self, environment: &str) -> Result<Vec<Service>, SourceError>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_states(&self) -> Result<Vec<RawEnvironmentState>, SourceError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let states = parse_environment_file(&raw, &self.path.display().to_string())?;
        debug!(path = %self.path.display(), environments = states.len(), "read services file");
        Ok(states)
    }
}

impl ServiceSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn environments(&self) -> Result<Vec<String>, SourceError> {
        let mut names = Vec::new();
        for state in self.read_states()? {
            if !names.contains(&state.environment) {
                names.push(state.environment);
            }
        }
        Ok(names)
    }

    fn services(&self, environment: &str) -> Result<Vec<Service>, SourceError> {
        let state = self
            .read_states()?
            .into_iter()
            .find(|state| state.environment == environment)
            .ok_or_else(|| SourceError::UnknownEnvironment(environment.to_owned()))?;
        map_environment_state(state)
    }
}
