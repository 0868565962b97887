use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::{ArtistGenres, Genres, VenueGenres};

/// SELECT id, name FROM genres ORDER BY name
pub fn select_all() -> String {
    Query::select()
        .columns([Genres::Id, Genres::Name])
        .from(Genres::Table)
        .order_by(Genres::Name, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name FROM genres WHERE name IN (...)
pub fn select_by_names(names: &[String]) -> String {
    Query::select()
        .columns([Genres::Id, Genres::Name])
        .from(Genres::Table)
        .and_where(Expr::col(Genres::Name).is_in(names.iter().map(String::as_str)))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO genres (name) VALUES (?)
pub fn insert(name: &str) -> String {
    Query::insert()
        .into_table(Genres::Table)
        .columns([Genres::Name])
        .values_panic([name.into()])
        .to_string(SqliteQueryBuilder)
}

/// SELECT genres.id, genres.name FROM genres
/// JOIN venue_genres ON venue_genres.genre_id = genres.id
/// WHERE venue_genres.venue_id = ? ORDER BY genres.name
pub fn select_for_venue(venue_id: i64) -> String {
    Query::select()
        .column((Genres::Table, Genres::Id))
        .column((Genres::Table, Genres::Name))
        .from(Genres::Table)
        .inner_join(
            VenueGenres::Table,
            Expr::col((VenueGenres::Table, VenueGenres::GenreId)).equals((Genres::Table, Genres::Id)),
        )
        .and_where(Expr::col((VenueGenres::Table, VenueGenres::VenueId)).eq(venue_id))
        .order_by((Genres::Table, Genres::Name), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT genres.id, genres.name FROM genres
/// JOIN artist_genres ON artist_genres.genre_id = genres.id
/// WHERE artist_genres.artist_id = ? ORDER BY genres.name
pub fn select_for_artist(artist_id: i64) -> String {
    Query::select()
        .column((Genres::Table, Genres::Id))
        .column((Genres::Table, Genres::Name))
        .from(Genres::Table)
        .inner_join(
            ArtistGenres::Table,
            Expr::col((ArtistGenres::Table, ArtistGenres::GenreId))
                .equals((Genres::Table, Genres::Id)),
        )
        .and_where(Expr::col((ArtistGenres::Table, ArtistGenres::ArtistId)).eq(artist_id))
        .order_by((Genres::Table, Genres::Name), Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO venue_genres (venue_id, genre_id) VALUES (?, ?)
pub fn link_venue(venue_id: i64, genre_id: i64) -> String {
    Query::insert()
        .into_table(VenueGenres::Table)
        .columns([VenueGenres::VenueId, VenueGenres::GenreId])
        .values_panic([venue_id.into(), genre_id.into()])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM venue_genres WHERE venue_id = ?
pub fn unlink_venue(venue_id: i64) -> String {
    Query::delete()
        .from_table(VenueGenres::Table)
        .and_where(Expr::col(VenueGenres::VenueId).eq(venue_id))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO artist_genres (artist_id, genre_id) VALUES (?, ?)
pub fn link_artist(artist_id: i64, genre_id: i64) -> String {
    Query::insert()
        .into_table(ArtistGenres::Table)
        .columns([ArtistGenres::ArtistId, ArtistGenres::GenreId])
        .values_panic([artist_id.into(), genre_id.into()])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM artist_genres WHERE artist_id = ?
pub fn unlink_artist(artist_id: i64) -> String {
    Query::delete()
        .from_table(ArtistGenres::Table)
        .and_where(Expr::col(ArtistGenres::ArtistId).eq(artist_id))
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_names_quotes_values() {
        let sql = select_by_names(&["Rock n Roll".to_string(), "Jazz".to_string()]);
        assert!(sql.contains("IN ('Rock n Roll', 'Jazz')"), "{}", sql);
    }

    #[test]
    fn test_select_for_venue_joins_membership() {
        let sql = select_for_venue(7);
        assert!(sql.contains("JOIN \"venue_genres\""), "{}", sql);
        assert!(sql.contains("\"venue_genres\".\"venue_id\" = 7"), "{}", sql);
    }
}
