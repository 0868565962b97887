//! Booking storage operations. Every write runs in one transaction; cascades
//! are explicit deletes in the same transaction.

use chrono::{DateTime, Utc};
use log::debug;
use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use std::collections::HashMap;

use crate::db::commit_or_rollback;
use crate::error::{FieldError, StoreError, StoreResult};
use crate::listing::{filter_by_term, group_by_location, LocationGroup, ShowListing};
use crate::models::{Album, Artist, Genre, NewArtist, NewShow, NewVenue, Song, Venue};
use crate::queries::shows::ShowFilter;
use crate::queries::{albums, artists, genres, shows, venues};

#[derive(Debug, Clone)]
pub struct VenueRecord {
    pub venue: Venue,
    pub genres: Vec<Genre>,
    pub shows: Vec<ShowListing>,
}

#[derive(Debug, Clone)]
pub struct AlbumWithSongs {
    pub album: Album,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone)]
pub struct ArtistRecord {
    pub artist: Artist,
    pub genres: Vec<Genre>,
    pub shows: Vec<ShowListing>,
    pub albums: Vec<AlbumWithSongs>,
}

// ============================================================================
// Reads
// ============================================================================

pub async fn list_genres(pool: &SqlitePool) -> StoreResult<Vec<Genre>> {
    Ok(sqlx::query_as::<_, Genre>(&genres::select_all())
        .fetch_all(pool)
        .await?)
}

pub async fn recent_venues(pool: &SqlitePool, limit: u64) -> StoreResult<Vec<Venue>> {
    Ok(sqlx::query_as::<_, Venue>(&venues::select_recent(limit))
        .fetch_all(pool)
        .await?)
}

pub async fn recent_artists(pool: &SqlitePool, limit: u64) -> StoreResult<Vec<Artist>> {
    Ok(sqlx::query_as::<_, Artist>(&artists::select_recent(limit))
        .fetch_all(pool)
        .await?)
}

/// All venues grouped by (city, state), each with its upcoming show count as of `now`
pub async fn venues_by_location(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> StoreResult<Vec<LocationGroup>> {
    let all = sqlx::query_as::<_, Venue>(&venues::select_all_by_location())
        .fetch_all(pool)
        .await?;

    let upcoming = upcoming_counts_by_venue(pool, now).await?;

    Ok(group_by_location(&all, &upcoming))
}

/// Venue id to number of shows starting after `now`; venues without any are absent
pub async fn upcoming_counts_by_venue(
    pool: &SqlitePool,
    now: DateTime<Utc>,
) -> StoreResult<HashMap<i64, i64>> {
    let counts: Vec<(i64, i64)> =
        sqlx::query_as(&shows::count_upcoming_by_venue(now.timestamp_millis()))
            .fetch_all(pool)
            .await?;
    Ok(counts.into_iter().collect())
}

pub async fn list_artists(pool: &SqlitePool) -> StoreResult<Vec<Artist>> {
    Ok(sqlx::query_as::<_, Artist>(&artists::select_all())
        .fetch_all(pool)
        .await?)
}

pub async fn list_shows(pool: &SqlitePool) -> StoreResult<Vec<ShowListing>> {
    Ok(
        sqlx::query_as::<_, ShowListing>(&shows::select_with_parties(ShowFilter::All))
            .fetch_all(pool)
            .await?,
    )
}

/// Venues whose name contains `term`, case-insensitively, in id order
pub async fn search_venues(pool: &SqlitePool, term: &str) -> StoreResult<Vec<Venue>> {
    let all = sqlx::query_as::<_, Venue>(&venues::select_all())
        .fetch_all(pool)
        .await?;
    Ok(filter_by_term(all, term, |venue| venue.name.as_str()))
}

/// Artists whose name contains `term`, case-insensitively, in id order
pub async fn search_artists(pool: &SqlitePool, term: &str) -> StoreResult<Vec<Artist>> {
    let all = list_artists(pool).await?;
    Ok(filter_by_term(all, term, |artist| artist.name.as_str()))
}

pub async fn get_venue(pool: &SqlitePool, id: i64) -> StoreResult<Option<Venue>> {
    Ok(sqlx::query_as::<_, Venue>(&venues::select_by_id(id))
        .fetch_optional(pool)
        .await?)
}

pub async fn get_artist(pool: &SqlitePool, id: i64) -> StoreResult<Option<Artist>> {
    Ok(sqlx::query_as::<_, Artist>(&artists::select_by_id(id))
        .fetch_optional(pool)
        .await?)
}

pub async fn venue_genres(pool: &SqlitePool, venue_id: i64) -> StoreResult<Vec<Genre>> {
    Ok(sqlx::query_as::<_, Genre>(&genres::select_for_venue(venue_id))
        .fetch_all(pool)
        .await?)
}

pub async fn artist_genres(pool: &SqlitePool, artist_id: i64) -> StoreResult<Vec<Genre>> {
    Ok(sqlx::query_as::<_, Genre>(&genres::select_for_artist(artist_id))
        .fetch_all(pool)
        .await?)
}

pub async fn venue_record(pool: &SqlitePool, id: i64) -> StoreResult<Option<VenueRecord>> {
    let Some(venue) = get_venue(pool, id).await? else {
        return Ok(None);
    };
    let genres = venue_genres(pool, id).await?;
    let shows = sqlx::query_as::<_, ShowListing>(&shows::select_with_parties(ShowFilter::Venue(id)))
        .fetch_all(pool)
        .await?;

    Ok(Some(VenueRecord {
        venue,
        genres,
        shows,
    }))
}

pub async fn artist_record(pool: &SqlitePool, id: i64) -> StoreResult<Option<ArtistRecord>> {
    let Some(artist) = get_artist(pool, id).await? else {
        return Ok(None);
    };
    let genres = artist_genres(pool, id).await?;
    let shows =
        sqlx::query_as::<_, ShowListing>(&shows::select_with_parties(ShowFilter::Artist(id)))
            .fetch_all(pool)
            .await?;

    let album_rows = sqlx::query_as::<_, Album>(&albums::select_for_artist(id))
        .fetch_all(pool)
        .await?;
    let mut songs_by_album: HashMap<i64, Vec<Song>> = HashMap::new();
    for song in sqlx::query_as::<_, Song>(&albums::select_songs_for_artist(id))
        .fetch_all(pool)
        .await?
    {
        songs_by_album.entry(song.album_id).or_default().push(song);
    }
    let albums = album_rows
        .into_iter()
        .map(|album| AlbumWithSongs {
            songs: songs_by_album.remove(&album.id).unwrap_or_default(),
            album,
        })
        .collect();

    Ok(Some(ArtistRecord {
        artist,
        genres,
        shows,
        albums,
    }))
}

// ============================================================================
// Writes
// ============================================================================

/// Map genre names to ids, rejecting any name that is not a known genre
pub(crate) async fn resolve_genre_ids(
    conn: &mut SqliteConnection,
    names: &[String],
) -> StoreResult<Vec<i64>> {
    let mut wanted: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !wanted.contains(name) {
            wanted.push(name.clone());
        }
    }
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found = sqlx::query_as::<_, Genre>(&genres::select_by_names(&wanted))
        .fetch_all(&mut *conn)
        .await?;

    let unknown: Vec<FieldError> = wanted
        .iter()
        .filter(|name| !found.iter().any(|g| &g.name == *name))
        .map(|name| FieldError::new("genres", format!("unknown genre '{}'", name)))
        .collect();
    if !unknown.is_empty() {
        return Err(StoreError::Validation(unknown));
    }

    Ok(wanted
        .iter()
        .filter_map(|name| found.iter().find(|g| &g.name == name).map(|g| g.id))
        .collect())
}

async fn link_venue_genres(
    conn: &mut SqliteConnection,
    venue_id: i64,
    genre_ids: &[i64],
) -> StoreResult<()> {
    sqlx::query(&genres::unlink_venue(venue_id))
        .execute(&mut *conn)
        .await?;
    for genre_id in genre_ids {
        sqlx::query(&genres::link_venue(venue_id, *genre_id))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn link_artist_genres(
    conn: &mut SqliteConnection,
    artist_id: i64,
    genre_ids: &[i64],
) -> StoreResult<()> {
    sqlx::query(&genres::unlink_artist(artist_id))
        .execute(&mut *conn)
        .await?;
    for genre_id in genre_ids {
        sqlx::query(&genres::link_artist(artist_id, *genre_id))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub(crate) async fn insert_venue(conn: &mut SqliteConnection, venue: &NewVenue) -> StoreResult<i64> {
    let genre_ids = resolve_genre_ids(conn, &venue.genres).await?;
    let id = sqlx::query(&venues::insert(venue))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    link_venue_genres(conn, id, &genre_ids).await?;
    Ok(id)
}

pub(crate) async fn insert_artist(
    conn: &mut SqliteConnection,
    artist: &NewArtist,
) -> StoreResult<i64> {
    let genre_ids = resolve_genre_ids(conn, &artist.genres).await?;
    let id = sqlx::query(&artists::insert(artist))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    link_artist_genres(conn, id, &genre_ids).await?;
    Ok(id)
}

/// Insert a show after checking both parties exist and the artist is available
pub(crate) async fn insert_show(conn: &mut SqliteConnection, show: &NewShow) -> StoreResult<i64> {
    let mut problems = Vec::new();

    let venue = sqlx::query_as::<_, Venue>(&venues::select_by_id(show.venue_id))
        .fetch_optional(&mut *conn)
        .await?;
    if venue.is_none() {
        problems.push(FieldError::new(
            "venue_id",
            format!("venue {} does not exist", show.venue_id),
        ));
    }

    let artist = sqlx::query_as::<_, Artist>(&artists::select_by_id(show.artist_id))
        .fetch_optional(&mut *conn)
        .await?;
    match artist {
        None => problems.push(FieldError::new(
            "artist_id",
            format!("artist {} does not exist", show.artist_id),
        )),
        Some(artist) if !artist.is_available_at(show.start_time) => {
            problems.push(FieldError::new(
                "start_time",
                format!(
                    "{} is only available from {} to {}",
                    artist.name,
                    artist.available_from.format("%Y-%m-%d %H:%M"),
                    artist.available_to.format("%Y-%m-%d %H:%M")
                ),
            ))
        }
        Some(_) => {}
    }

    if !problems.is_empty() {
        return Err(StoreError::Validation(problems));
    }

    Ok(sqlx::query(&shows::insert(show))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid())
}

pub async fn create_venue(pool: &SqlitePool, venue: &NewVenue) -> StoreResult<i64> {
    let mut tx = pool.begin().await?;
    let result = insert_venue(&mut tx, venue).await;
    commit_or_rollback(tx, result).await
}

pub async fn update_venue(pool: &SqlitePool, id: i64, venue: &NewVenue) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let result = async {
        let genre_ids = resolve_genre_ids(&mut tx, &venue.genres).await?;
        let updated = sqlx::query(&venues::update(id, venue))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(StoreError::NotFound { entity: "venue", id });
        }
        link_venue_genres(&mut tx, id, &genre_ids).await
    }
    .await;
    commit_or_rollback(tx, result).await
}

/// Delete a venue with its shows and genre links
pub async fn delete_venue(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let result = async {
        let shows_deleted = sqlx::query(&shows::delete_for_venue(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query(&genres::unlink_venue(id))
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query(&venues::delete(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound { entity: "venue", id });
        }
        debug!("Deleted venue {} and {} show(s)", id, shows_deleted);
        Ok(())
    }
    .await;
    commit_or_rollback(tx, result).await
}

pub async fn create_artist(pool: &SqlitePool, artist: &NewArtist) -> StoreResult<i64> {
    let mut tx = pool.begin().await?;
    let result = insert_artist(&mut tx, artist).await;
    commit_or_rollback(tx, result).await
}

pub async fn update_artist(pool: &SqlitePool, id: i64, artist: &NewArtist) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let result = async {
        let genre_ids = resolve_genre_ids(&mut tx, &artist.genres).await?;
        let updated = sqlx::query(&artists::update(id, artist))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(StoreError::NotFound {
                entity: "artist",
                id,
            });
        }
        link_artist_genres(&mut tx, id, &genre_ids).await
    }
    .await;
    commit_or_rollback(tx, result).await
}

/// Delete an artist with its shows, albums, songs and genre links
pub async fn delete_artist(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let result = async {
        sqlx::query(&shows::delete_for_artist(id))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&albums::delete_songs_for_artist(id))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&albums::delete_for_artist(id))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&genres::unlink_artist(id))
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query(&artists::delete(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "artist",
                id,
            });
        }
        Ok(())
    }
    .await;
    commit_or_rollback(tx, result).await
}

pub async fn create_show(pool: &SqlitePool, show: &NewShow) -> StoreResult<i64> {
    let mut tx = pool.begin().await?;
    let result = insert_show(&mut tx, show).await;
    commit_or_rollback(tx, result).await
}
