//! Candidate items and the provider-boundary models
//!
//! The engine never mutates items; it only indexes into an ordered sequence
//! and hands a clone back when the ball settles. The watchlist response
//! mirrors the JSON shape served by the scraper backend so a fetched payload
//! deserializes directly.

use serde::{Deserialize, Serialize};

/// One candidate on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub year: Option<u16>,
    /// Detail page for the title
    #[serde(default)]
    pub url: Option<String>,
    /// Poster image URL, filled in by the provider for selected candidates
    #[serde(default)]
    pub poster: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            url: None,
            poster: None,
        }
    }
}

/// A user's fetched watchlist, as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watchlist {
    pub username: String,
    /// Total titles on the list
    pub count: u32,
    /// How many were sampled for the board
    pub selected_count: u32,
    pub movies: Vec<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_payload() {
        let json = r#"{
            "username": "frame-rate",
            "count": 213,
            "selected_count": 2,
            "movies": [
                {
                    "title": "Inception",
                    "year": 2010,
                    "url": "https://letterboxd.com/film/inception/",
                    "poster": "https://image.tmdb.org/t/p/w500/abc.jpg"
                },
                { "title": "Stalker", "year": null, "url": null, "poster": null }
            ]
        }"#;
        let list: Watchlist = serde_json::from_str(json).unwrap();
        assert_eq!(list.username, "frame-rate");
        assert_eq!(list.movies.len(), 2);
        assert_eq!(list.movies[0].year, Some(2010));
        assert_eq!(list.movies[1].title, "Stalker");
        assert_eq!(list.movies[1].poster, None);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let item: Item = serde_json::from_str(r#"{ "title": "Playtime" }"#).unwrap();
        assert_eq!(item.title, "Playtime");
        assert_eq!(item.year, None);
        assert_eq!(item.url, None);
    }
}
