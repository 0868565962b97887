use sea_query::{Expr, Order, Query, SimpleExpr, SqliteQueryBuilder};

use crate::models::NewVenue;
use crate::schema::Venues;

const COLUMNS: [Venues; 11] = [
    Venues::Id,
    Venues::Name,
    Venues::City,
    Venues::State,
    Venues::Address,
    Venues::Phone,
    Venues::ImageLink,
    Venues::FacebookLink,
    Venues::Website,
    Venues::SeekingTalent,
    Venues::SeekingDescription,
];

fn field_values(venue: &NewVenue) -> [(Venues, SimpleExpr); 10] {
    [
        (Venues::Name, venue.name.as_str().into()),
        (Venues::City, venue.city.as_str().into()),
        (Venues::State, venue.state.as_str().into()),
        (Venues::Address, venue.address.as_str().into()),
        (Venues::Phone, venue.phone.clone().into()),
        (Venues::ImageLink, venue.image_link.clone().into()),
        (Venues::FacebookLink, venue.facebook_link.clone().into()),
        (Venues::Website, venue.website.clone().into()),
        (Venues::SeekingTalent, i32::from(venue.seeking_talent).into()),
        (
            Venues::SeekingDescription,
            venue.seeking_description.clone().into(),
        ),
    ]
}

/// SELECT ... FROM venues ORDER BY city, state, name
///
/// Location grouping relies on exactly this ordering.
pub fn select_all_by_location() -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Venues::Table)
        .order_by(Venues::City, Order::Asc)
        .order_by(Venues::State, Order::Asc)
        .order_by(Venues::Name, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM venues ORDER BY id DESC LIMIT ?
pub fn select_recent(limit: u64) -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Venues::Table)
        .order_by(Venues::Id, Order::Desc)
        .limit(limit)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM venues ORDER BY id
pub fn select_all() -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Venues::Table)
        .order_by(Venues::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM venues WHERE id = ?
pub fn select_by_id(id: i64) -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Venues::Table)
        .and_where(Expr::col(Venues::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO venues (name, city, ...) VALUES (...)
pub fn insert(venue: &NewVenue) -> String {
    let (columns, values): (Vec<Venues>, Vec<SimpleExpr>) = field_values(venue).into_iter().unzip();
    Query::insert()
        .into_table(Venues::Table)
        .columns(columns)
        .values_panic(values)
        .to_string(SqliteQueryBuilder)
}

/// UPDATE venues SET name = ?, city = ?, ... WHERE id = ?
pub fn update(id: i64, venue: &NewVenue) -> String {
    Query::update()
        .table(Venues::Table)
        .values(field_values(venue))
        .and_where(Expr::col(Venues::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM venues WHERE id = ?
pub fn delete(id: i64) -> String {
    Query::delete()
        .from_table(Venues::Table)
        .and_where(Expr::col(Venues::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewVenue {
        NewVenue {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            image_link: None,
            facebook_link: None,
            website: None,
            seeking_talent: true,
            seeking_description: Some("We are on the lookout for a local artist".to_string()),
            genres: vec!["Jazz".to_string()],
        }
    }

    #[test]
    fn test_location_ordering() {
        let sql = select_all_by_location();
        assert!(
            sql.ends_with("ORDER BY \"city\" ASC, \"state\" ASC, \"name\" ASC"),
            "{}",
            sql
        );
    }

    #[test]
    fn test_insert_writes_nulls_for_missing_optionals() {
        let sql = insert(&sample());
        assert!(sql.starts_with("INSERT INTO \"venues\""), "{}", sql);
        assert!(sql.contains("'The Musical Hop'"), "{}", sql);
        assert!(sql.contains("NULL"), "{}", sql);
    }

    #[test]
    fn test_insert_escapes_quotes() {
        let mut venue = sample();
        venue.name = "Park's Place".to_string();
        let sql = insert(&venue);
        assert!(sql.contains("'Park''s Place'"), "{}", sql);
    }

    #[test]
    fn test_update_targets_single_row() {
        let sql = update(4, &sample());
        assert!(sql.starts_with("UPDATE \"venues\" SET"), "{}", sql);
        assert!(sql.ends_with("WHERE \"id\" = 4"), "{}", sql);
    }
}
