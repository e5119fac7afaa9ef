use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

use crate::parser::{self, ParseError};
use crate::sink::{RecordSink, SinkError};
use crate::types::{
    Chamber, HomepageDetails, LegislatorRecord, MetadataError, RawProfile, TermMetadata,
};

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Metadata error: {0}")]
    MetadataError(#[from] MetadataError),
    #[error("Sink error: {0}")]
    SinkError(#[from] SinkError),
}

/// What to do when a single profile fails to fetch or parse. Sink failures
/// always abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: crate::BASE_URL.to_string(),
        })
    }

    /// Member listing URL for a chamber, all affiliations, sorted by last name.
    pub fn directory_url(&self, chamber: Chamber) -> String {
        format!(
            "{}/legislators?field_chamber_target_id={}&field_political_affiliation_target_id=All&sort_bef_combine=field_last_name_value%20ASC",
            self.base_url,
            chamber.site_code()
        )
    }

    pub async fn fetch_directory(
        &self,
        chamber: Chamber,
    ) -> Result<HashMap<String, String>, ScraperError> {
        let url = self.directory_url(chamber);
        log::info!("Fetching {} member directory...", chamber);
        let html = self.get_html(&url).await?;
        Ok(parser::parse_directory(&html)?)
    }

    pub async fn fetch_profile(&self, url: &str) -> Result<RawProfile, ScraperError> {
        let full_url = self.absolute(url);
        log::info!("Fetching profile: {}", full_url);
        let html = self.get_html(&full_url).await?;
        Ok(parser::parse_profile(&html, &full_url)?)
    }

    pub async fn fetch_homepage(&self, url: &str) -> Result<HomepageDetails, ScraperError> {
        let full_url = self.absolute(url);
        log::info!("Fetching member homepage: {}", full_url);
        let html = self.get_html(&full_url).await?;
        Ok(parser::parse_homepage(&html)?)
    }

    /// Full pipeline for one (chamber, term): resolve the current session,
    /// walk the member directory and hand each normalized record to the sink
    /// as it completes. Returns the number of records saved.
    pub async fn scrape_legislators<S: RecordSink>(
        &self,
        chamber: Chamber,
        term: &str,
        metadata: &TermMetadata,
        policy: FailurePolicy,
        sink: &mut S,
    ) -> Result<usize, ScraperError> {
        let session = metadata.latest_session(term)?;
        log::info!(
            "Scraping {} for term {} (current session {})",
            chamber,
            term,
            session
        );

        let pages = self.fetch_directory(chamber).await?;
        log::info!("Found {} member profile pages", pages.len());

        let mut saved = 0;
        for (district, profile_url) in &pages {
            let profile = match self.fetch_profile(profile_url).await {
                Ok(profile) => profile,
                Err(e) => match policy {
                    FailurePolicy::Skip => {
                        log::warn!("Skipping {}: {}", profile_url, e);
                        continue;
                    }
                    FailurePolicy::Abort => return Err(e),
                },
            };

            sink.save(LegislatorRecord::from_profile(
                term, chamber, district, profile,
            ))?;
            saved += 1;
        }

        Ok(saved)
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
