//! Persisted entities and the row mappings used to load them.
//!
//! These structs mirror table rows one-to-one. Handlers build their own view
//! structs from them and never attach computed fields here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Convert stored milliseconds into a UTC timestamp, failing the row decode on overflow
pub(crate) fn datetime_from_ms(column: &str, ms: i64) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("timestamp {} ms out of range", ms).into(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

impl FromRow<'_, SqliteRow> for Genre {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl FromRow<'_, SqliteRow> for Venue {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            address: row.try_get("address")?,
            phone: row.try_get("phone")?,
            image_link: row.try_get("image_link")?,
            facebook_link: row.try_get("facebook_link")?,
            website: row.try_get("website")?,
            seeking_talent: row.try_get("seeking_talent")?,
            seeking_description: row.try_get("seeking_description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
}

impl Artist {
    /// Whether a show starting at `start_time` fits the availability window (inclusive)
    pub fn is_available_at(&self, start_time: DateTime<Utc>) -> bool {
        self.available_from <= start_time && start_time <= self.available_to
    }
}

impl FromRow<'_, SqliteRow> for Artist {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            phone: row.try_get("phone")?,
            image_link: row.try_get("image_link")?,
            facebook_link: row.try_get("facebook_link")?,
            website: row.try_get("website")?,
            seeking_venue: row.try_get("seeking_venue")?,
            seeking_description: row.try_get("seeking_description")?,
            available_from: datetime_from_ms(
                "available_from_ms",
                row.try_get("available_from_ms")?,
            )?,
            available_to: datetime_from_ms("available_to_ms", row.try_get("available_to_ms")?)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist_id: i64,
}

impl FromRow<'_, SqliteRow> for Album {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            artist_id: row.try_get("artist_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    pub id: i64,
    pub name: String,
    pub album_id: i64,
}

impl FromRow<'_, SqliteRow> for Song {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            album_id: row.try_get("album_id")?,
        })
    }
}

/// Trivia category, serialized as `{id, type}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FromRow<'_, SqliteRow> for Category {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            kind: row.try_get("type")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

impl FromRow<'_, SqliteRow> for Question {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            question: row.try_get("question")?,
            answer: row.try_get("answer")?,
            category: row.try_get("category")?,
            difficulty: row.try_get("difficulty")?,
        })
    }
}

// ============================================================================
// Validated inputs
// ============================================================================

/// Venue fields accepted by create/edit, already validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_availability_window_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
        let artist = Artist {
            id: 1,
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
            available_from: from,
            available_to: to,
        };

        assert!(artist.is_available_at(from));
        assert!(artist.is_available_at(to));
        assert!(!artist.is_available_at(to + chrono::Duration::seconds(1)));
        assert!(!artist.is_available_at(from - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_artist_serializes_window_as_rfc3339() {
        let from = Utc.with_ymd_and_hms(2026, 5, 21, 21, 30, 0).unwrap();
        let artist = Artist {
            id: 2,
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_venue: false,
            seeking_description: None,
            available_from: from,
            available_to: from + chrono::Duration::days(30),
        };
        let json = serde_json::to_value(&artist).unwrap();
        assert_eq!(json["available_from"], "2026-05-21T21:30:00Z");
        assert_eq!(json["available_to"], "2026-06-20T21:30:00Z");
    }

    #[test]
    fn test_category_serializes_type_field() {
        let category = Category {
            id: 3,
            kind: "Geography".to_string(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json, serde_json::json!({"id": 3, "type": "Geography"}));
    }
}
