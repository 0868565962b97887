use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::{Albums, Songs};

fn album_ids_for_artist(artist_id: i64) -> sea_query::SelectStatement {
    Query::select()
        .column(Albums::Id)
        .from(Albums::Table)
        .and_where(Expr::col(Albums::ArtistId).eq(artist_id))
        .to_owned()
}

/// SELECT id, title, artist_id FROM albums WHERE artist_id = ? ORDER BY id
pub fn select_for_artist(artist_id: i64) -> String {
    Query::select()
        .columns([Albums::Id, Albums::Title, Albums::ArtistId])
        .from(Albums::Table)
        .and_where(Expr::col(Albums::ArtistId).eq(artist_id))
        .order_by(Albums::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, name, album_id FROM songs WHERE album_id IN (SELECT id FROM albums WHERE artist_id = ?) ORDER BY id
pub fn select_songs_for_artist(artist_id: i64) -> String {
    Query::select()
        .columns([Songs::Id, Songs::Name, Songs::AlbumId])
        .from(Songs::Table)
        .and_where(Expr::col(Songs::AlbumId).in_subquery(album_ids_for_artist(artist_id)))
        .order_by(Songs::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO albums (title, artist_id) VALUES (?, ?)
pub fn insert(title: &str, artist_id: i64) -> String {
    Query::insert()
        .into_table(Albums::Table)
        .columns([Albums::Title, Albums::ArtistId])
        .values_panic([title.into(), artist_id.into()])
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO songs (name, album_id) VALUES (?, ?)
pub fn insert_song(name: &str, album_id: i64) -> String {
    Query::insert()
        .into_table(Songs::Table)
        .columns([Songs::Name, Songs::AlbumId])
        .values_panic([name.into(), album_id.into()])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM songs WHERE album_id IN (SELECT id FROM albums WHERE artist_id = ?)
pub fn delete_songs_for_artist(artist_id: i64) -> String {
    Query::delete()
        .from_table(Songs::Table)
        .and_where(Expr::col(Songs::AlbumId).in_subquery(album_ids_for_artist(artist_id)))
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM albums WHERE artist_id = ?
pub fn delete_for_artist(artist_id: i64) -> String {
    Query::delete()
        .from_table(Albums::Table)
        .and_where(Expr::col(Albums::ArtistId).eq(artist_id))
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_cleanup_scoped_to_artist_albums() {
        let sql = delete_songs_for_artist(9);
        assert!(sql.starts_with("DELETE FROM \"songs\""), "{}", sql);
        assert!(sql.contains("IN (SELECT \"id\" FROM \"albums\" WHERE \"artist_id\" = 9)"), "{}", sql);
    }
}
