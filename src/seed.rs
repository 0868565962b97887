//! Load fixture data from a TOML file into an empty database.
//!
//! Each kind of record is inserted only when its table has no rows yet, and
//! the whole load commits or rolls back as one transaction.

use log::{info, warn};
use serde::Deserialize;
use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use std::path::Path;

use crate::booking::forms::parse_datetime;
use crate::booking::store::{insert_artist, insert_show, insert_venue};
use crate::config::{AppType, ServerConfig};
use crate::db::{commit_or_rollback, count_rows, prepare_database};
use crate::error::{DynError, StoreError, StoreResult};
use crate::listing::filter_by_term;
use crate::models::{Artist, Category, Genre, NewArtist, NewQuestion, NewShow, NewVenue, Venue};
use crate::queries::{albums, artists, categories, genres, venues};
use crate::schema::{Albums, Artists, Categories, Genres, Questions, Shows, Songs, Venues};
use crate::trivia::store::insert_question;

#[derive(Debug, Default, Deserialize)]
pub struct BookingFixtures {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub venues: Vec<VenueFixture>,
    #[serde(default)]
    pub artists: Vec<ArtistFixture>,
    #[serde(default)]
    pub albums: Vec<AlbumFixture>,
    #[serde(default)]
    pub songs: Vec<SongFixture>,
    #[serde(default)]
    pub shows: Vec<ShowFixture>,
}

#[derive(Debug, Deserialize)]
pub struct VenueFixture {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistFixture {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub available_from: String,
    pub available_to: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Album of the artist named `artist`
#[derive(Debug, Deserialize)]
pub struct AlbumFixture {
    pub title: String,
    pub artist: String,
}

/// Song on the album titled `album`
#[derive(Debug, Deserialize)]
pub struct SongFixture {
    pub name: String,
    pub album: String,
}

/// Show joining the venue and artist with these names
#[derive(Debug, Deserialize)]
pub struct ShowFixture {
    pub venue: String,
    pub artist: String,
    pub start_time: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TriviaFixtures {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub questions: Vec<QuestionFixture>,
}

/// Question in the category whose type is `category`
#[derive(Debug, Deserialize)]
pub struct QuestionFixture {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

/// Rows inserted per table, in insertion order
pub type SeedReport = Vec<(&'static str, usize)>;

/// Prepare the configured database and load `fixtures_path` into it
pub async fn run_seed(config: &ServerConfig, fixtures_path: &Path) -> Result<SeedReport, DynError> {
    let content = std::fs::read_to_string(fixtures_path).map_err(|e| {
        format!(
            "Failed to read fixtures file '{}': {}",
            fixtures_path.display(),
            e
        )
    })?;

    let pool = prepare_database(&config.database_file, config.app_type, config.max_connections).await?;

    let report = match config.app_type {
        AppType::Booking => {
            let fixtures: BookingFixtures = toml::from_str(&content)
                .map_err(|e| format!("Failed to parse booking fixtures: {}", e))?;
            seed_booking(&pool, &fixtures).await?
        }
        AppType::Trivia => {
            let fixtures: TriviaFixtures = toml::from_str(&content)
                .map_err(|e| format!("Failed to parse trivia fixtures: {}", e))?;
            seed_trivia(&pool, &fixtures).await?
        }
    };

    for (table, inserted) in &report {
        info!("Seeded {} row(s) into {}", inserted, table);
    }
    pool.close().await;
    Ok(report)
}

async fn table_is_empty<T>(conn: &mut SqliteConnection, table: T) -> StoreResult<bool>
where
    T: sea_query::Iden + 'static,
{
    Ok(count_rows(&mut *conn, table).await? == 0)
}

/// Resolve a fixture genre by case-insensitive substring.
///
/// An exact (case-insensitive) name wins over other partial matches;
/// otherwise the term must match exactly one genre.
async fn resolve_fixture_genre(conn: &mut SqliteConnection, term: &str) -> StoreResult<String> {
    let all = sqlx::query_as::<_, Genre>(&genres::select_all())
        .fetch_all(&mut *conn)
        .await?;
    let matches = filter_by_term(all, term, |genre| genre.name.as_str());

    let folded = term.to_lowercase();
    if let Some(exact) = matches.iter().find(|g| g.name.to_lowercase() == folded) {
        return Ok(exact.name.clone());
    }
    match matches.as_slice() {
        [only] => Ok(only.name.clone()),
        [] => Err(StoreError::invalid(
            "genres",
            format!("fixture genre '{}' matches no genre", term),
        )),
        _ => Err(StoreError::invalid(
            "genres",
            format!(
                "fixture genre '{}' is ambiguous ({} matches)",
                term,
                matches.len()
            ),
        )),
    }
}

async fn resolve_fixture_genres(
    conn: &mut SqliteConnection,
    terms: &[String],
) -> StoreResult<Vec<String>> {
    let mut names = Vec::with_capacity(terms.len());
    for term in terms {
        names.push(resolve_fixture_genre(conn, term).await?);
    }
    Ok(names)
}

fn fixture_datetime(
    field: &str,
    owner: &str,
    value: &str,
) -> StoreResult<chrono::DateTime<chrono::Utc>> {
    parse_datetime(value).ok_or_else(|| {
        StoreError::invalid(
            field,
            format!("'{}' of {} is not a valid date and time", value, owner),
        )
    })
}

fn lookup(ids: &HashMap<String, i64>, kind: &str, name: &str) -> StoreResult<i64> {
    ids.get(name)
        .copied()
        .ok_or_else(|| StoreError::invalid(kind, format!("no {} named '{}'", kind, name)))
}

pub async fn seed_booking(pool: &SqlitePool, fixtures: &BookingFixtures) -> StoreResult<SeedReport> {
    let mut tx = pool.begin().await?;
    let result = async {
        let mut report = SeedReport::new();

        let mut inserted = 0;
        if table_is_empty(&mut tx, Genres::Table).await? {
            for name in &fixtures.genres {
                sqlx::query(&genres::insert(name)).execute(&mut *tx).await?;
                inserted += 1;
            }
        }
        report.push(("genres", inserted));

        let mut inserted = 0;
        if table_is_empty(&mut tx, Venues::Table).await? {
            for fixture in &fixtures.venues {
                let venue = NewVenue {
                    name: fixture.name.clone(),
                    city: fixture.city.clone(),
                    state: fixture.state.clone(),
                    address: fixture.address.clone(),
                    phone: fixture.phone.clone(),
                    image_link: fixture.image_link.clone(),
                    facebook_link: fixture.facebook_link.clone(),
                    website: fixture.website.clone(),
                    seeking_talent: fixture.seeking_talent,
                    seeking_description: fixture.seeking_description.clone(),
                    genres: resolve_fixture_genres(&mut tx, &fixture.genres).await?,
                };
                insert_venue(&mut tx, &venue).await?;
                inserted += 1;
            }
        }
        report.push(("venues", inserted));

        let mut inserted = 0;
        if table_is_empty(&mut tx, Artists::Table).await? {
            for fixture in &fixtures.artists {
                let artist = NewArtist {
                    name: fixture.name.clone(),
                    city: fixture.city.clone(),
                    state: fixture.state.clone(),
                    phone: fixture.phone.clone(),
                    image_link: fixture.image_link.clone(),
                    facebook_link: fixture.facebook_link.clone(),
                    website: fixture.website.clone(),
                    seeking_venue: fixture.seeking_venue,
                    seeking_description: fixture.seeking_description.clone(),
                    available_from: fixture_datetime(
                        "available_from",
                        &fixture.name,
                        &fixture.available_from,
                    )?,
                    available_to: fixture_datetime(
                        "available_to",
                        &fixture.name,
                        &fixture.available_to,
                    )?,
                    genres: resolve_fixture_genres(&mut tx, &fixture.genres).await?,
                };
                insert_artist(&mut tx, &artist).await?;
                inserted += 1;
            }
        }
        report.push(("artists", inserted));

        let artist_ids: HashMap<String, i64> =
            sqlx::query_as::<_, Artist>(&artists::select_all())
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(|a| (a.name, a.id))
                .collect();

        let mut album_ids: HashMap<String, i64> = HashMap::new();
        let mut inserted = 0;
        if table_is_empty(&mut tx, Albums::Table).await? {
            for fixture in &fixtures.albums {
                let artist_id = lookup(&artist_ids, "artist", &fixture.artist)?;
                let id = sqlx::query(&albums::insert(&fixture.title, artist_id))
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid();
                album_ids.insert(fixture.title.clone(), id);
                inserted += 1;
            }
        }
        report.push(("albums", inserted));

        let mut inserted = 0;
        if table_is_empty(&mut tx, Songs::Table).await? {
            if album_ids.is_empty() && !fixtures.songs.is_empty() {
                warn!("Albums already existed; songs can only reference albums from this fixture file");
            }
            for fixture in &fixtures.songs {
                let album_id = lookup(&album_ids, "album", &fixture.album)?;
                sqlx::query(&albums::insert_song(&fixture.name, album_id))
                    .execute(&mut *tx)
                    .await?;
                inserted += 1;
            }
        }
        report.push(("songs", inserted));

        let mut inserted = 0;
        if table_is_empty(&mut tx, Shows::Table).await? {
            let venue_ids: HashMap<String, i64> =
                sqlx::query_as::<_, Venue>(&venues::select_all())
                    .fetch_all(&mut *tx)
                    .await?
                    .into_iter()
                    .map(|v| (v.name, v.id))
                    .collect();

            for fixture in &fixtures.shows {
                let owner = format!("show of {} at {}", fixture.artist, fixture.venue);
                let show = NewShow {
                    venue_id: lookup(&venue_ids, "venue", &fixture.venue)?,
                    artist_id: lookup(&artist_ids, "artist", &fixture.artist)?,
                    start_time: fixture_datetime("start_time", &owner, &fixture.start_time)?,
                };
                insert_show(&mut tx, &show).await?;
                inserted += 1;
            }
        }
        report.push(("shows", inserted));

        Ok::<_, StoreError>(report)
    }
    .await;
    commit_or_rollback(tx, result).await
}

pub async fn seed_trivia(pool: &SqlitePool, fixtures: &TriviaFixtures) -> StoreResult<SeedReport> {
    let mut tx = pool.begin().await?;
    let result = async {
        let mut report = SeedReport::new();

        let mut inserted = 0;
        if table_is_empty(&mut tx, Categories::Table).await? {
            for kind in &fixtures.categories {
                sqlx::query(&categories::insert(kind))
                    .execute(&mut *tx)
                    .await?;
                inserted += 1;
            }
        }
        report.push(("categories", inserted));

        let category_ids: HashMap<String, i64> =
            sqlx::query_as::<_, Category>(&categories::select_all())
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(|c| (c.kind, c.id))
                .collect();

        let mut inserted = 0;
        if table_is_empty(&mut tx, Questions::Table).await? {
            for fixture in &fixtures.questions {
                let question = NewQuestion {
                    question: fixture.question.clone(),
                    answer: fixture.answer.clone(),
                    category: lookup(&category_ids, "category", &fixture.category)?,
                    difficulty: fixture.difficulty,
                };
                insert_question(&mut tx, &question).await?;
                inserted += 1;
            }
        }
        report.push(("questions", inserted));

        Ok::<_, StoreError>(report)
    }
    .await;
    commit_or_rollback(tx, result).await
}
