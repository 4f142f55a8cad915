//! Cover-art lookup against public book catalogs
//!
//! Tries Open Library by identifier, then Google Books by identifier, then
//! Google Books by title. Lookups are best-effort: every failure is logged
//! and simply yields no cover.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{LibraryError, LibraryResult};

const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";
const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

/// HTTP client for cover-art lookups
#[derive(Debug, Clone)]
pub struct CoverClient {
    http: reqwest::Client,
    open_library_url: String,
    google_books_url: String,
}

impl Default for CoverClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverClient {
    /// Create a client pointing at the public catalog APIs
    pub fn new() -> Self {
        Self::with_base_urls(OPEN_LIBRARY_URL, GOOGLE_BOOKS_URL)
    }

    /// Create a client with custom API base URLs
    ///
    /// # Arguments
    /// * `open_library_url` - Base URL of the Open Library API
    /// * `google_books_url` - Base URL of the Google Books API
    pub fn with_base_urls(open_library_url: &str, google_books_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build cover HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            open_library_url: open_library_url.trim_end_matches('/').to_string(),
            google_books_url: google_books_url.trim_end_matches('/').to_string(),
        }
    }

    /// Find a cover URL for a catalog identifier
    ///
    /// # Arguments
    /// * `catalog_id` - ISBN/ASIN extracted from the filename
    /// * `title` - Display title, used for the last-resort title search
    ///
    /// # Returns
    /// * `Some(url)` if any catalog had a cover, `None` otherwise
    pub async fn cover_url(&self, catalog_id: &str, title: &str) -> Option<String> {
        match self.try_cover_url(catalog_id, title).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Failed to fetch cover for {}: {}", catalog_id, e);
                None
            }
        }
    }

    async fn try_cover_url(&self, catalog_id: &str, title: &str) -> LibraryResult<Option<String>> {
        if let Some(url) = self.open_library(catalog_id).await? {
            return Ok(Some(url));
        }

        let isbn_query = format!("isbn:{}", catalog_id);
        if let Some(url) = self.google_books(&isbn_query).await? {
            return Ok(Some(url));
        }

        tracing::debug!("No cover by identifier {}, searching by title", catalog_id);
        self.google_books(title).await
    }

    async fn open_library(&self, catalog_id: &str) -> LibraryResult<Option<String>> {
        let url = format!(
            "{}/api/books?bibkeys=ISBN:{}&jscmd=data&format=json",
            self.open_library_url, catalog_id
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("Open Library returned {} for {}", response.status(), catalog_id);
            return Ok(None);
        }

        let data: Value = response.json().await?;
        let cover = &data[format!("ISBN:{}", catalog_id)]["cover"];
        let url = cover["large"]
            .as_str()
            .or_else(|| cover["medium"].as_str())
            .map(str::to_string);

        Ok(url)
    }

    async fn google_books(&self, query: &str) -> LibraryResult<Option<String>> {
        let url = format!(
            "{}/books/v1/volumes?q={}",
            self.google_books_url,
            urlencoding::encode(query)
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::debug!("Google Books returned {} for {}", response.status(), query);
            return Ok(None);
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| LibraryError::Cover(format!("Invalid Google Books response: {}", e)))?;

        let thumbnail = volumes
            .items
            .into_iter()
            .next()
            .and_then(|v| v.volume_info)
            .and_then(|info| info.image_links)
            .and_then(|links| links.thumbnail);

        Ok(thumbnail.map(|t| upgrade_to_https(&t)))
    }
}

/// Rewrite a plain-HTTP URL to HTTPS
fn upgrade_to_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
