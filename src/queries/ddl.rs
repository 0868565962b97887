use sea_query::{ColumnDef, ForeignKey, Index, SqliteQueryBuilder, Table};

use crate::schema::{
    Albums, ArtistGenres, Artists, Categories, Genres, Metadata, Questions, Shows, Songs,
    VenueGenres, Venues,
};

/// CREATE TABLE IF NOT EXISTS metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)
pub fn create_metadata_table() -> String {
    Table::create()
        .table(Metadata::Table)
        .if_not_exists()
        .col(ColumnDef::new(Metadata::Key).string().primary_key())
        .col(ColumnDef::new(Metadata::Value).string().not_null())
        .to_string(SqliteQueryBuilder)
}

// ============================================================================
// Booking schema
// ============================================================================

/// CREATE TABLE IF NOT EXISTS genres (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE)
pub fn create_genres_table() -> String {
    Table::create()
        .table(Genres::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Genres::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Genres::Name).string().not_null().unique_key())
        .to_string(SqliteQueryBuilder)
}

pub fn create_venues_table() -> String {
    Table::create()
        .table(Venues::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Venues::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Venues::Name).string().not_null())
        .col(ColumnDef::new(Venues::City).string().not_null())
        .col(ColumnDef::new(Venues::State).string().not_null())
        .col(ColumnDef::new(Venues::Address).string().not_null())
        .col(ColumnDef::new(Venues::Phone).string())
        .col(ColumnDef::new(Venues::ImageLink).string())
        .col(ColumnDef::new(Venues::FacebookLink).string())
        .col(ColumnDef::new(Venues::Website).string())
        .col(
            ColumnDef::new(Venues::SeekingTalent)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Venues::SeekingDescription).string())
        .to_string(SqliteQueryBuilder)
}

pub fn create_artists_table() -> String {
    Table::create()
        .table(Artists::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Artists::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Artists::Name).string().not_null())
        .col(ColumnDef::new(Artists::City).string().not_null())
        .col(ColumnDef::new(Artists::State).string().not_null())
        .col(ColumnDef::new(Artists::Phone).string())
        .col(ColumnDef::new(Artists::ImageLink).string())
        .col(ColumnDef::new(Artists::FacebookLink).string())
        .col(ColumnDef::new(Artists::Website).string())
        .col(
            ColumnDef::new(Artists::SeekingVenue)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Artists::SeekingDescription).string())
        .col(
            ColumnDef::new(Artists::AvailableFromMs)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(Artists::AvailableToMs)
                .big_integer()
                .not_null(),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS venue_genres (
///     venue_id INTEGER NOT NULL REFERENCES venues(id),
///     genre_id INTEGER NOT NULL REFERENCES genres(id),
///     PRIMARY KEY (venue_id, genre_id)
/// )
///
/// No ON DELETE CASCADE: dependents are removed explicitly by the deleting transaction.
pub fn create_venue_genres_table() -> String {
    Table::create()
        .table(VenueGenres::Table)
        .if_not_exists()
        .col(ColumnDef::new(VenueGenres::VenueId).integer().not_null())
        .col(ColumnDef::new(VenueGenres::GenreId).integer().not_null())
        .primary_key(
            Index::create()
                .col(VenueGenres::VenueId)
                .col(VenueGenres::GenreId),
        )
        .foreign_key(
            ForeignKey::create()
                .from(VenueGenres::Table, VenueGenres::VenueId)
                .to(Venues::Table, Venues::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .from(VenueGenres::Table, VenueGenres::GenreId)
                .to(Genres::Table, Genres::Id),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_artist_genres_table() -> String {
    Table::create()
        .table(ArtistGenres::Table)
        .if_not_exists()
        .col(ColumnDef::new(ArtistGenres::ArtistId).integer().not_null())
        .col(ColumnDef::new(ArtistGenres::GenreId).integer().not_null())
        .primary_key(
            Index::create()
                .col(ArtistGenres::ArtistId)
                .col(ArtistGenres::GenreId),
        )
        .foreign_key(
            ForeignKey::create()
                .from(ArtistGenres::Table, ArtistGenres::ArtistId)
                .to(Artists::Table, Artists::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .from(ArtistGenres::Table, ArtistGenres::GenreId)
                .to(Genres::Table, Genres::Id),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_shows_table() -> String {
    Table::create()
        .table(Shows::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Shows::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Shows::StartTimeMs).big_integer().not_null())
        .col(ColumnDef::new(Shows::VenueId).integer().not_null())
        .col(ColumnDef::new(Shows::ArtistId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Shows::Table, Shows::VenueId)
                .to(Venues::Table, Venues::Id),
        )
        .foreign_key(
            ForeignKey::create()
                .from(Shows::Table, Shows::ArtistId)
                .to(Artists::Table, Artists::Id),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_albums_table() -> String {
    Table::create()
        .table(Albums::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Albums::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Albums::Title).string().not_null())
        .col(ColumnDef::new(Albums::ArtistId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Albums::Table, Albums::ArtistId)
                .to(Artists::Table, Artists::Id),
        )
        .to_string(SqliteQueryBuilder)
}

pub fn create_songs_table() -> String {
    Table::create()
        .table(Songs::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Songs::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Songs::Name).string().not_null())
        .col(ColumnDef::new(Songs::AlbumId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(Songs::Table, Songs::AlbumId)
                .to(Albums::Table, Albums::Id),
        )
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_venues_location ON venues(city, state, name)
pub fn create_venues_location_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_venues_location")
        .table(Venues::Table)
        .col(Venues::City)
        .col(Venues::State)
        .col(Venues::Name)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_shows_venue_id ON shows(venue_id)
pub fn create_shows_venue_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_shows_venue_id")
        .table(Shows::Table)
        .col(Shows::VenueId)
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_shows_artist_id ON shows(artist_id)
pub fn create_shows_artist_id_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_shows_artist_id")
        .table(Shows::Table)
        .col(Shows::ArtistId)
        .to_string(SqliteQueryBuilder)
}

// ============================================================================
// Trivia schema
// ============================================================================

pub fn create_categories_table() -> String {
    Table::create()
        .table(Categories::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Categories::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Categories::Type).string().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS questions (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     question TEXT NOT NULL,
///     answer TEXT NOT NULL,
///     category INTEGER NOT NULL,
///     difficulty INTEGER NOT NULL
/// )
pub fn create_questions_table() -> String {
    Table::create()
        .table(Questions::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Questions::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Questions::Question).string().not_null())
        .col(ColumnDef::new(Questions::Answer).string().not_null())
        .col(ColumnDef::new(Questions::Category).integer().not_null())
        .col(ColumnDef::new(Questions::Difficulty).integer().not_null())
        .to_string(SqliteQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category)
pub fn create_questions_category_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_questions_category")
        .table(Questions::Table)
        .col(Questions::Category)
        .to_string(SqliteQueryBuilder)
}
