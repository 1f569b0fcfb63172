use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::SourceError;
use super::model::Service;
use super::parse::{map_environment_state, parse_environment_state};
use super::source::ServiceSource;

pub struct HttpSource {
    base: Url,
    client: Client,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base = Url::parse(base).map_err(|_| SourceError::InvalidUrl(base.to_owned()))?;
        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SourceError::Http {
                url: base.to_string(),
                source,
            })?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_text(&self, url: &Url) -> Result<String, SourceError> {
        debug!(%url, "requesting");
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, SourceError> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body).map_err(|source| SourceError::Json {
            origin: url.to_string(),
            source,
        })
    }
}

impl ServiceSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    fn environments(&self) -> Result<Vec<String>, SourceError> {
        let url = self.endpoint(&["environments"])?;
        self.get_json(&url)
    }

    fn services(&self, environment: &str) -> Result<Vec<Service>, SourceError> {
        let url = self.endpoint(&["interrelationship", environment])?;
        let body = self.get_text(&url)?;
        let state = parse_environment_state(&body, url.as_str())?;
        if state.environment != environment {
            debug!(
                requested = environment,
                received = %state.environment,
                "registry answered for a different environment name"
            );
        }
        map_environment_state(state)
    }
}
