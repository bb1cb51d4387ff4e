use std::fmt;

/// Kind of catalog entry, as far as the poll flow cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Show,
    Other,
}

impl MediaKind {
    /// Parse the catalog's `type` field (`"movie"`, `"show"`, ...).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "movie" => Self::Movie,
            "show" => Self::Show,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Movie => "Movie",
            Self::Show => "Show",
            Self::Other => "Media",
        };
        f.write_str(s)
    }
}

/// A media entry as returned by the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaItem {
    /// Catalog-internal identifier, the handle deletion goes through.
    pub rating_key: String,
    pub title: String,
    /// Release year; entries without one are too ambiguous to poll on.
    pub year: Option<i32>,
    pub kind: MediaKind,
    /// Primary external identifier (e.g. `imdb://tt0133093`).
    pub guid: String,
    /// Alternate external identifiers, in catalog order.
    pub alt_guids: Vec<String>,
}

impl MediaItem {
    /// Human-facing label, also the selection-button text: `"Movie: The Matrix (1999)"`.
    pub fn label(&self) -> String {
        match self.year {
            Some(year) => format!("{}: {} ({})", self.kind, self.title, year),
            None => format!("{}: {}", self.kind, self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_catalog_type_strings() {
        assert_eq!(MediaKind::parse("movie"), MediaKind::Movie);
        assert_eq!(MediaKind::parse("Show"), MediaKind::Show);
        assert_eq!(MediaKind::parse("episode"), MediaKind::Other);
    }

    #[test]
    fn label_includes_kind_title_year() {
        let item = MediaItem {
            rating_key: "1".to_string(),
            title: "The Matrix".to_string(),
            year: Some(1999),
            kind: MediaKind::Movie,
            guid: String::new(),
            alt_guids: vec![],
        };
        assert_eq!(item.label(), "Movie: The Matrix (1999)");
    }
}
