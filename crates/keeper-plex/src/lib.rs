//! Plex adapter (media catalog).
//!
//! This crate implements the `keeper-core` CatalogPort over the Plex HTTP
//! API: `/search` for title lookup and `/library/metadata/{ratingKey}` for
//! deletion, both authenticated with the `X-Plex-Token` header.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use keeper_core::{
    catalog::{
        port::CatalogPort,
        types::{MediaItem, MediaKind},
    },
    errors::Error,
    Result,
};

#[derive(Clone, Debug)]
pub struct PlexCatalog {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl PlexCatalog {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        }
    }
}

#[derive(Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "MediaContainer", default)]
    container: MediaContainer,
}

#[derive(Default, Deserialize)]
struct MediaContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<Metadata>,
}

#[derive(Deserialize)]
struct Metadata {
    #[serde(rename = "ratingKey")]
    rating_key: Option<String>,
    title: Option<String>,
    year: Option<i32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    guid: Option<String>,
    #[serde(rename = "Guid", default)]
    guids: Vec<GuidEntry>,
}

#[derive(Deserialize)]
struct GuidEntry {
    id: Option<String>,
}

/// Map one search hit into the core model.
///
/// Entries without a rating key or title cannot be acted on and are dropped.
fn item_from_metadata(md: Metadata) -> Option<MediaItem> {
    let rating_key = md.rating_key?;
    let title = md.title?;

    Some(MediaItem {
        rating_key,
        title,
        year: md.year,
        kind: MediaKind::parse(md.kind.as_deref().unwrap_or("")),
        guid: md.guid.unwrap_or_default(),
        alt_guids: md.guids.into_iter().filter_map(|g| g.id).collect(),
    })
}

#[async_trait]
impl CatalogPort for PlexCatalog {
    async fn search(&self, query: &str) -> Result<Vec<MediaItem>> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("query", query)])
            .header("X-Plex-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::External(format!("plex request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "plex search failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let envelope: SearchEnvelope = resp
            .json()
            .await
            .map_err(|e| Error::External(format!("plex json error: {e}")))?;

        Ok(envelope
            .container
            .metadata
            .into_iter()
            .filter_map(item_from_metadata)
            .collect())
    }

    async fn delete(&self, item: &MediaItem) -> Result<()> {
        let url = format!("{}/library/metadata/{}", self.base_url, item.rating_key);
        let resp = self
            .http
            .delete(&url)
            .header("X-Plex-Token", &self.token)
            .send()
            .await
            .map_err(|e| Error::External(format!("plex request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::External(format!(
                "plex delete failed for {}: {}",
                item.rating_key,
                resp.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_search_metadata_into_media_items() {
        let payload = r#"{
          "MediaContainer": {
            "size": 2,
            "Metadata": [
              {
                "ratingKey": "49915",
                "title": "The Matrix",
                "year": 1999,
                "type": "movie",
                "guid": "plex://movie/5d7768254de0ee001fcc8f52",
                "Guid": [
                  {"id": "imdb://tt0133093"},
                  {"id": "tmdb://603"}
                ]
              },
              {
                "ratingKey": "50001",
                "title": "Some Concert",
                "type": "clip"
              }
            ]
          }
        }"#;

        let envelope: SearchEnvelope = serde_json::from_str(payload).unwrap();
        let items: Vec<MediaItem> = envelope
            .container
            .metadata
            .into_iter()
            .filter_map(item_from_metadata)
            .collect();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].rating_key, "49915");
        assert_eq!(items[0].title, "The Matrix");
        assert_eq!(items[0].year, Some(1999));
        assert_eq!(items[0].kind, MediaKind::Movie);
        assert_eq!(items[0].guid, "plex://movie/5d7768254de0ee001fcc8f52");
        assert_eq!(
            items[0].alt_guids,
            vec!["imdb://tt0133093".to_string(), "tmdb://603".to_string()]
        );

        // Year-less clip still maps; the core filters it out of candidates.
        assert_eq!(items[1].year, None);
        assert_eq!(items[1].kind, MediaKind::Other);
    }

    #[test]
    fn entries_without_rating_key_or_title_are_dropped() {
        let payload = r#"{
          "MediaContainer": {
            "Metadata": [
              {"title": "No Key", "year": 2001, "type": "movie"},
              {"ratingKey": "7", "year": 2001, "type": "movie"}
            ]
          }
        }"#;

        let envelope: SearchEnvelope = serde_json::from_str(payload).unwrap();
        let items: Vec<MediaItem> = envelope
            .container
            .metadata
            .into_iter()
            .filter_map(item_from_metadata)
            .collect();
        assert!(items.is_empty());
    }

    #[test]
    fn empty_container_parses_to_no_items() {
        let envelope: SearchEnvelope =
            serde_json::from_str(r#"{"MediaContainer": {"size": 0}}"#).unwrap();
        assert!(envelope.container.metadata.is_empty());
    }
}
