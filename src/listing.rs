//! Pure helpers shared by listing pages and endpoints: pagination, search
//! matching, grouping venues by location and splitting shows by time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::collections::HashMap;

use crate::models::{datetime_from_ms, Venue};

/// Read `page` from query parameters. Missing or unparsable means page 1.
pub fn page_from_query(params: &HashMap<String, String>) -> usize {
    params
        .get("page")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1)
}

/// Return page `page` (1-indexed) of `items`. Pages past the end, and page 0, are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    if page == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(per_page);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(per_page).min(items.len());
    items[start..end].to_vec()
}

/// Keep the items whose `text` contains `term`, in their original order.
/// Case is folded with full Unicode lowercasing; an empty term keeps everything.
pub fn filter_by_term<T, F>(items: Vec<T>, term: &str, text: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let needle = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| text(item).to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Group venues already sorted by (city, state, name) into runs sharing (city, state).
///
/// Single pass comparing each venue with the previous one; an unsorted input
/// yields one group per run, not per distinct location.
pub fn group_by_location(venues: &[Venue], upcoming: &HashMap<i64, i64>) -> Vec<LocationGroup> {
    let mut groups: Vec<LocationGroup> = Vec::new();

    for venue in venues {
        let summary = VenueSummary {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
        };

        match groups.last_mut() {
            Some(group) if group.city == venue.city && group.state == venue.state => {
                group.venues.push(summary);
            }
            _ => groups.push(LocationGroup {
                city: venue.city.clone(),
                state: venue.state.clone(),
                venues: vec![summary],
            }),
        }
    }

    groups
}

/// A show joined with both of its parties
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub show_id: i64,
    pub start_time: DateTime<Utc>,
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

impl FromRow<'_, SqliteRow> for ShowListing {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            show_id: row.try_get("id")?,
            start_time: datetime_from_ms("start_time_ms", row.try_get("start_time_ms")?)?,
            venue_id: row.try_get("venue_id")?,
            venue_name: row.try_get("venue_name")?,
            venue_image_link: row.try_get("venue_image_link")?,
            artist_id: row.try_get("artist_id")?,
            artist_name: row.try_get("artist_name")?,
            artist_image_link: row.try_get("artist_image_link")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionedShows {
    pub past: Vec<ShowListing>,
    pub upcoming: Vec<ShowListing>,
}

impl PartitionedShows {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Past is strictly before `now`; a show starting exactly at `now` is upcoming.
pub fn partition_shows(shows: Vec<ShowListing>, now: DateTime<Utc>) -> PartitionedShows {
    let (past, upcoming) = shows.into_iter().partition(|show| show.start_time < now);
    PartitionedShows { past, upcoming }
}
