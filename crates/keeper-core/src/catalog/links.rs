use crate::catalog::types::{MediaItem, MediaKind};

/// External databases we can point a human at, in link-priority order.
#[derive(Clone, Copy, Debug)]
enum ExternalDb {
    Imdb,
    Tmdb,
    Tvdb,
}

const PRIORITY: [ExternalDb; 3] = [ExternalDb::Imdb, ExternalDb::Tmdb, ExternalDb::Tvdb];

impl ExternalDb {
    /// Guid schemes this database is known under. Plex emits both the short
    /// modern form (`tmdb://603`) and legacy agent guids
    /// (`com.plexapp.agents.themoviedb://603?lang=en`).
    fn schemes(self) -> &'static [&'static str] {
        match self {
            Self::Imdb => &["imdb"],
            Self::Tmdb => &["tmdb", "themoviedb"],
            Self::Tvdb => &["tvdb", "thetvdb"],
        }
    }

    fn url(self, id: &str, kind: MediaKind) -> String {
        match self {
            Self::Imdb => format!("https://www.imdb.com/title/{id}"),
            Self::Tmdb => match kind {
                MediaKind::Show => format!("https://www.themoviedb.org/tv/{id}"),
                _ => format!("https://www.themoviedb.org/movie/{id}"),
            },
            Self::Tvdb => format!("https://thetvdb.com/dereferrer/series/{id}"),
        }
    }
}

/// Derive a human-facing reference URL for a catalog item.
///
/// The primary guid is consulted before the alternates, and databases are
/// tried in fixed priority order; the first recognized identifier wins.
/// Items carrying no recognized identifier yield no link.
pub fn reference_url(item: &MediaItem) -> Option<String> {
    for db in PRIORITY {
        if let Some(id) = extract_id(&item.guid, db) {
            return Some(db.url(&id, item.kind));
        }
        for alt in &item.alt_guids {
            if let Some(id) = extract_id(alt, db) {
                return Some(db.url(&id, item.kind));
            }
        }
    }
    None
}

fn extract_id(guid: &str, db: ExternalDb) -> Option<String> {
    for scheme in db.schemes() {
        let marker = format!("{scheme}://");
        if let Some(pos) = guid.find(&marker) {
            // Legacy agent guids prefix the scheme with the agent package name;
            // require the scheme to start a component so `thetvdb://` does not
            // also match as `tvdb://`.
            if pos > 0 {
                let before = guid.as_bytes()[pos - 1];
                if before != b'.' {
                    continue;
                }
            }
            let rest = &guid[pos + marker.len()..];
            let id = rest.split('?').next().unwrap_or(rest);
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
    }
    None
}
