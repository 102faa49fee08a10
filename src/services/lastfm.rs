use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

use super::metadata::SoundtrackProvider;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    trackmatches: TrackMatches,
}

#[derive(Debug, Deserialize)]
struct TrackMatches {
    #[serde(default)]
    track: Vec<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    url: Option<String>,
}

pub struct LastFmClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LastFmClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("invalid Last.fm URL '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl SoundtrackProvider for LastFmClient {
    async fn soundtrack_url(&self, title: &str) -> Result<Option<String>> {
        let track = format!("{} soundtrack", title);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("method", "track.search"),
                ("track", track.as_str()),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response.json().await?;
        Ok(search
            .results
            .trackmatches
            .track
            .into_iter()
            .next()
            .and_then(|t| t.url)
            .filter(|url| !url.is_empty()))
    }
}
