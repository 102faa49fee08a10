use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

use super::metadata::{MetadataProvider, MovieMetadata};

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
}

pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self> {
        Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("invalid OMDb URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<MovieMetadata> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::MetadataApi(format!("HTTP {}: {}", status, error_text)));
        }

        let body: OmdbResponse = response.json().await?;
        tracing::debug!("OMDb lookup for '{}' returned {:?}", title, body.title);
        metadata_from_response(title, body)
    }
}

fn metadata_from_response(query: &str, body: OmdbResponse) -> Result<MovieMetadata> {
    if body.response.as_deref() == Some("False") {
        let message = body.error.unwrap_or_default();
        if message.is_empty() || message.to_lowercase().contains("not found") {
            return Err(AppError::MovieNotFound(query.to_string()));
        }
        return Err(AppError::MetadataApi(message));
    }

    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::MovieNotFound(query.to_string()))?;

    Ok(MovieMetadata {
        title,
        year: body.year.as_deref().map(parse_year).unwrap_or(0),
        rating: body.imdb_rating.as_deref().map(parse_rating).unwrap_or(0.0),
        poster: body.poster.and_then(not_available),
        imdb_id: body.imdb_id.and_then(not_available),
        country: body
            .country
            .and_then(not_available)
            .unwrap_or_else(|| "Unknown".to_string()),
    })
}

/// Series report ranges such as "2010–2013"; the leading year is kept.
fn parse_year(raw: &str) -> i32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

fn parse_rating(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

fn not_available(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "N/A" {
        None
    } else {
        Some(value)
    }
}
