use sea_query::{Expr, Order, Query, SimpleExpr, SqliteQueryBuilder};

use crate::models::NewArtist;
use crate::schema::Artists;

const COLUMNS: [Artists; 12] = [
    Artists::Id,
    Artists::Name,
    Artists::City,
    Artists::State,
    Artists::Phone,
    Artists::ImageLink,
    Artists::FacebookLink,
    Artists::Website,
    Artists::SeekingVenue,
    Artists::SeekingDescription,
    Artists::AvailableFromMs,
    Artists::AvailableToMs,
];

fn field_values(artist: &NewArtist) -> [(Artists, SimpleExpr); 11] {
    [
        (Artists::Name, artist.name.as_str().into()),
        (Artists::City, artist.city.as_str().into()),
        (Artists::State, artist.state.as_str().into()),
        (Artists::Phone, artist.phone.clone().into()),
        (Artists::ImageLink, artist.image_link.clone().into()),
        (Artists::FacebookLink, artist.facebook_link.clone().into()),
        (Artists::Website, artist.website.clone().into()),
        (Artists::SeekingVenue, i32::from(artist.seeking_venue).into()),
        (
            Artists::SeekingDescription,
            artist.seeking_description.clone().into(),
        ),
        (
            Artists::AvailableFromMs,
            artist.available_from.timestamp_millis().into(),
        ),
        (
            Artists::AvailableToMs,
            artist.available_to.timestamp_millis().into(),
        ),
    ]
}

/// SELECT ... FROM artists ORDER BY id
pub fn select_all() -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Artists::Table)
        .order_by(Artists::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM artists ORDER BY id DESC LIMIT ?
pub fn select_recent(limit: u64) -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Artists::Table)
        .order_by(Artists::Id, Order::Desc)
        .limit(limit)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM artists WHERE id = ?
pub fn select_by_id(id: i64) -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Artists::Table)
        .and_where(Expr::col(Artists::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO artists (name, city, ...) VALUES (...)
pub fn insert(artist: &NewArtist) -> String {
    let (columns, values): (Vec<Artists>, Vec<SimpleExpr>) =
        field_values(artist).into_iter().unzip();
    Query::insert()
        .into_table(Artists::Table)
        .columns(columns)
        .values_panic(values)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE artists SET name = ?, ... WHERE id = ?
pub fn update(id: i64, artist: &NewArtist) -> String {
    Query::update()
        .table(Artists::Table)
        .values(field_values(artist))
        .and_where(Expr::col(Artists::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM artists WHERE id = ?
pub fn delete(id: i64) -> String {
    Query::delete()
        .from_table(Artists::Table)
        .and_where(Expr::col(Artists::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_insert_stores_availability_as_millis() {
        let from = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 6, 30, 0, 0, 0).unwrap();
        let artist = NewArtist {
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
            available_to: to,
            genres: Vec::new(),
        };
        let sql = insert(&artist);
        assert!(sql.contains(&from.timestamp_millis().to_string()), "{}", sql);
        assert!(sql.contains(&to.timestamp_millis().to_string()), "{}", sql);
    }

    #[test]
    fn test_recent_newest_first() {
        let sql = select_recent(10);
        assert!(sql.ends_with("ORDER BY \"id\" DESC LIMIT 10"), "{}", sql);
    }
}
