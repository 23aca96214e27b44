//! Download URL resolution for server release archives
//!
//! The vendor publishes one listing page per version. The page links every
//! archive built for that version; the one we want is picked by plain
//! substring matching on distro and architecture.

use crate::config::ArtifactConfig;
use crate::error::{Error, Result};
use crate::providers::PageFetcher;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::Arc;

/// What to look for on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactQuery {
    pub distro: String,
    pub arch: String,
    pub version: String,
}

impl ArtifactQuery {
    pub fn new(
        distro: impl Into<String>,
        arch: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            distro: distro.into(),
            arch: arch.into(),
            version: version.into(),
        }
    }

    /// Takes `DISTRO`, `ARCH` and `ASDB_VERSION` from the configuration; each
    /// must be set.
    pub fn from_config(config: &ArtifactConfig) -> Result<Self> {
        Ok(Self::new(
            required(&config.distro, "DISTRO")?,
            required(&config.arch, "ARCH")?,
            required(&config.version, "ASDB_VERSION")?,
        ))
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Error::Validation(format!("{} is not set", name))),
    }
}

pub struct ArtifactResolver {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    suffix: String,
}

impl ArtifactResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ArtifactConfig) -> Self {
        Self {
            fetcher,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            suffix: config.suffix.clone(),
        }
    }

    /// Listing page for a version.
    pub fn listing_url(&self, version: &str) -> String {
        format!("{}/{}", self.base_url, version)
    }

    /// Resolves the archive URL for the query.
    ///
    /// When several archives match, the lexicographically smallest link wins
    /// so repeated runs agree.
    pub async fn resolve(&self, query: &ArtifactQuery) -> Result<String> {
        let listing_url = self.listing_url(&query.version);
        let html = self.fetcher.fetch(&listing_url).await?;

        let links = archive_links(&html, &self.suffix);
        tracing::debug!(count = links.len(), url = %listing_url, "Archive links on listing page");

        let link = select_artifact(&links, &query.distro, &query.arch).ok_or_else(|| {
            Error::NoMatchingArtifact {
                distro: query.distro.clone(),
                arch: query.arch.clone(),
                version: query.version.clone(),
            }
        })?;

        Ok(format!("{}/{}", listing_url, link))
    }
}

/// Distinct `href` targets of anchors that end with `suffix`.
pub fn archive_links(html: &str, suffix: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return BTreeSet::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| href.ends_with(suffix))
        .map(str::to_string)
        .collect()
}

/// First link, in order, containing both the distro and the arch substring.
pub fn select_artifact<'a>(links: &'a BTreeSet<String>, distro: &str, arch: &str) -> Option<&'a str> {
    links
        .iter()
        .find(|link| link.contains(distro) && link.contains(arch))
        .map(String::as_str)
}
