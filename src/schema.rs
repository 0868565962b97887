use sea_query::Iden;

/// Metadata table - key-value store for database configuration
#[derive(Iden)]
pub enum Metadata {
    Table,
    Key,
    Value,
}

// ============================================================================
// Booking tables
// ============================================================================

/// Genres table - reference list of music genres, unique by name
#[derive(Iden)]
pub enum Genres {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
pub enum Venues {
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    ImageLink,
    FacebookLink,
    Website,
    SeekingTalent,
    SeekingDescription,
}

#[derive(Iden)]
pub enum Artists {
    Table,
    Id,
    Name,
    City,
    State,
    Phone,
    ImageLink,
    FacebookLink,
    Website,
    SeekingVenue,
    SeekingDescription,
    AvailableFromMs,
    AvailableToMs,
}

/// Venue <-> genre membership
#[derive(Iden)]
pub enum VenueGenres {
    Table,
    VenueId,
    GenreId,
}

/// Artist <-> genre membership
#[derive(Iden)]
pub enum ArtistGenres {
    Table,
    ArtistId,
    GenreId,
}

/// Shows table - one venue and one artist at a start time
#[derive(Iden)]
pub enum Shows {
    Table,
    Id,
    StartTimeMs,
    VenueId,
    ArtistId,
}

#[derive(Iden)]
pub enum Albums {
    Table,
    Id,
    Title,
    ArtistId,
}

#[derive(Iden)]
pub enum Songs {
    Table,
    Id,
    Name,
    AlbumId,
}

// ============================================================================
// Trivia tables
// ============================================================================

#[derive(Iden)]
pub enum Categories {
    Table,
    Id,
    Type,
}

/// Questions table - `category` is a loose reference to categories.id
#[derive(Iden)]
pub enum Questions {
    Table,
    Id,
    Question,
    Answer,
    Category,
    Difficulty,
}
