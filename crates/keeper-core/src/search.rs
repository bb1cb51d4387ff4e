use std::sync::OnceLock;

use regex::Regex;

use crate::{catalog::port::CatalogPort, Error, Result};

/// Outcome of the `/remove` search step.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    /// Empty query; tell the user how to call the command.
    Usage,
    /// Nothing usable matched.
    NoMatches,
    /// Candidate labels to present as selection buttons.
    Candidates(Vec<String>),
}

/// Search the catalog for removal candidates.
///
/// Entries without a release year are dropped: their selection label cannot
/// be resolved back to a single item, so they make poor removal targets.
pub async fn search_candidates(catalog: &dyn CatalogPort, query: &str) -> Result<SearchOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchOutcome::Usage);
    }

    let labels: Vec<String> = catalog
        .search(query)
        .await?
        .into_iter()
        .filter(|item| item.year.is_some())
        .map(|item| item.label())
        .collect();

    if labels.is_empty() {
        return Ok(SearchOutcome::NoMatches);
    }
    Ok(SearchOutcome::Candidates(labels))
}

/// A parsed selection label (`"Movie: The Matrix (1999)"`).
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub title: String,
    pub year: i32,
}

fn selection_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z]+:\s*)?(?P<title>.+) \((?P<year>\d{4})\)$")
            .expect("selection regex")
    })
}

/// Parse the text a user sends back after pressing a selection button.
pub fn parse_selection(raw: &str) -> Result<Selection> {
    let caps = selection_re().captures(raw.trim()).ok_or_else(|| {
        Error::NotFound(format!("{raw:?} is not a \"Kind: Title (Year)\" selection"))
    })?;

    let year = caps["year"]
        .parse::<i32>()
        .map_err(|_| Error::NotFound(format!("{raw:?} has an unparsable year")))?;

    Ok(Selection {
        title: caps["title"].to_string(),
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{MediaItem, MediaKind};
    use async_trait::async_trait;

    struct FakeCatalog {
        items: Vec<MediaItem>,
    }

    #[async_trait]
    impl CatalogPort for FakeCatalog {
        async fn search(&self, _query: &str) -> Result<Vec<MediaItem>> {
            Ok(self.items.clone())
        }

        async fn delete(&self, _item: &MediaItem) -> Result<()> {
            Ok(())
        }
    }

    fn movie(title: &str, year: Option<i32>) -> MediaItem {
        MediaItem {
            rating_key: title.to_lowercase(),
            title: title.to_string(),
            year,
            kind: MediaKind::Movie,
            guid: String::new(),
            alt_guids: vec![],
        }
    }

    #[tokio::test]
    async fn empty_query_is_a_usage_error() {
        let catalog = FakeCatalog { items: vec![] };
        let out = search_candidates(&catalog, "   ").await.unwrap();
        assert_eq!(out, SearchOutcome::Usage);
    }

    #[tokio::test]
    async fn yearless_items_are_filtered_out() {
        let catalog = FakeCatalog {
            items: vec![movie("The Matrix", Some(1999)), movie("The Matrix", None)],
        };
        let out = search_candidates(&catalog, "Matrix").await.unwrap();
        assert_eq!(
            out,
            SearchOutcome::Candidates(vec!["Movie: The Matrix (1999)".to_string()])
        );
    }

    #[tokio::test]
    async fn all_filtered_means_no_matches() {
        let catalog = FakeCatalog {
            items: vec![movie("The Matrix", None)],
        };
        let out = search_candidates(&catalog, "Matrix").await.unwrap();
        assert_eq!(out, SearchOutcome::NoMatches);
    }

    #[test]
    fn selection_round_trips_through_the_label() {
        let label = movie("The Matrix", Some(1999)).label();
        let sel = parse_selection(&label).unwrap();
        assert_eq!(sel.title, "The Matrix");
        assert_eq!(sel.year, 1999);
    }

    #[test]
    fn selection_title_may_contain_a_colon() {
        let sel = parse_selection("Movie: Mission: Impossible (1996)").unwrap();
        assert_eq!(sel.title, "Mission: Impossible");
        assert_eq!(sel.year, 1996);
    }

    #[test]
    fn garbage_selection_is_rejected() {
        assert!(matches!(
            parse_selection("just some words"),
            Err(Error::NotFound(_))
        ));
    }
}
