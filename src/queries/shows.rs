use sea_query::{Alias, Expr, Order, Query, SqliteQueryBuilder};

use crate::models::NewShow;
use crate::schema::{Artists, Shows, Venues};

/// Which shows a joined listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFilter {
    All,
    Venue(i64),
    Artist(i64),
}

/// SELECT shows.id, shows.start_time_ms,
///        venues.id AS venue_id, venues.name AS venue_name, venues.image_link AS venue_image_link,
///        artists.id AS artist_id, artists.name AS artist_name, artists.image_link AS artist_image_link
/// FROM shows JOIN venues ... JOIN artists ... [WHERE ...] ORDER BY start_time_ms, id
pub fn select_with_parties(filter: ShowFilter) -> String {
    let mut query = Query::select();
    query
        .column((Shows::Table, Shows::Id))
        .column((Shows::Table, Shows::StartTimeMs))
        .expr_as(Expr::col((Venues::Table, Venues::Id)), Alias::new("venue_id"))
        .expr_as(Expr::col((Venues::Table, Venues::Name)), Alias::new("venue_name"))
        .expr_as(
            Expr::col((Venues::Table, Venues::ImageLink)),
            Alias::new("venue_image_link"),
        )
        .expr_as(Expr::col((Artists::Table, Artists::Id)), Alias::new("artist_id"))
        .expr_as(Expr::col((Artists::Table, Artists::Name)), Alias::new("artist_name"))
        .expr_as(
            Expr::col((Artists::Table, Artists::ImageLink)),
            Alias::new("artist_image_link"),
        )
        .from(Shows::Table)
        .inner_join(
            Venues::Table,
            Expr::col((Venues::Table, Venues::Id)).equals((Shows::Table, Shows::VenueId)),
        )
        .inner_join(
            Artists::Table,
            Expr::col((Artists::Table, Artists::Id)).equals((Shows::Table, Shows::ArtistId)),
        );

    match filter {
        ShowFilter::All => {}
        ShowFilter::Venue(id) => {
            query.and_where(Expr::col((Shows::Table, Shows::VenueId)).eq(id));
        }
        ShowFilter::Artist(id) => {
            query.and_where(Expr::col((Shows::Table, Shows::ArtistId)).eq(id));
        }
    }

    query
        .order_by((Shows::Table, Shows::StartTimeMs), Order::Asc)
        .order_by((Shows::Table, Shows::Id), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT venue_id, COUNT(id) AS upcoming FROM shows WHERE start_time_ms > ? GROUP BY venue_id
pub fn count_upcoming_by_venue(now_ms: i64) -> String {
    Query::select()
        .column(Shows::VenueId)
        .expr_as(Expr::col(Shows::Id).count(), Alias::new("upcoming"))
        .from(Shows::Table)
        .and_where(Expr::col(Shows::StartTimeMs).gt(now_ms))
        .group_by_col(Shows::VenueId)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO shows (start_time_ms, venue_id, artist_id) VALUES (?, ?, ?)
pub fn insert(show: &NewShow) -> String {
    Query::insert()
        .into_table(Shows::Table)
        .columns([Shows::StartTimeMs, Shows::VenueId, Shows::ArtistId])
        .values_panic([
            show.start_time.timestamp_millis().into(),
            show.venue_id.into(),
            show.artist_id.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM shows WHERE venue_id = ?
pub fn delete_for_venue(venue_id: i64) -> String {
    Query::delete()
        .from_table(Shows::Table)
        .and_where(Expr::col(Shows::VenueId).eq(venue_id))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM shows WHERE artist_id = ?
pub fn delete_for_artist(artist_id: i64) -> String {
    Query::delete()
        .from_table(Shows::Table)
        .and_where(Expr::col(Shows::ArtistId).eq(artist_id))
        .to_string(SqliteQueryBuilder)
}
