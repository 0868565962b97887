//! Submitted booking forms: raw field access, validation and conversion into
//! the `New*` inputs the store accepts.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::FieldError;
use crate::models::{Artist, Genre, NewArtist, NewShow, NewVenue, Venue};

/// Raw `application/x-www-form-urlencoded` pairs, in submission order.
///
/// Kept as pairs so multi-valued fields like `genres` survive, and so a
/// rejected form can be re-rendered with exactly what the user typed.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for FormData {
    fn from(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }
}

impl FormData {
    /// First value of `name`, trimmed. Blank values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Every non-blank value submitted under `name`
    pub fn all(&self, name: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }

    /// Checkbox semantics: present with any truthy value
    pub fn checked(&self, name: &str) -> bool {
        matches!(
            self.get(name).map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("y" | "yes" | "on" | "true" | "1")
        )
    }

    fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    fn set_optional(&mut self, name: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.set(name, value.clone());
        }
    }

    /// Prefill an edit form from a stored venue
    pub fn from_venue(venue: &Venue, genres: &[Genre]) -> Self {
        let mut form = Self::default();
        form.set("name", venue.name.clone());
        form.set("city", venue.city.clone());
        form.set("state", venue.state.clone());
        form.set("address", venue.address.clone());
        form.set_optional("phone", &venue.phone);
        form.set_optional("image_link", &venue.image_link);
        form.set_optional("facebook_link", &venue.facebook_link);
        form.set_optional("website", &venue.website);
        if venue.seeking_talent {
            form.set("seeking_talent", "y");
        }
        form.set_optional("seeking_description", &venue.seeking_description);
        for genre in genres {
            form.set("genres", genre.name.clone());
        }
        form
    }

    /// Prefill an edit form from a stored artist
    pub fn from_artist(artist: &Artist, genres: &[Genre]) -> Self {
        let mut form = Self::default();
        form.set("name", artist.name.clone());
        form.set("city", artist.city.clone());
        form.set("state", artist.state.clone());
        form.set_optional("phone", &artist.phone);
        form.set_optional("image_link", &artist.image_link);
        form.set_optional("facebook_link", &artist.facebook_link);
        form.set_optional("website", &artist.website);
        if artist.seeking_venue {
            form.set("seeking_venue", "y");
        }
        form.set_optional("seeking_description", &artist.seeking_description);
        form.set("available_from", format_datetime_local(artist.available_from));
        form.set("available_to", format_datetime_local(artist.available_to));
        for genre in genres {
            form.set("genres", genre.name.clone());
        }
        form
    }
}

/// Render a timestamp the way an HTML `datetime-local` input expects it
pub fn format_datetime_local(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%dT%H:%M").to_string()
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse RFC 3339 or a zone-less date and time, the latter read as UTC
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .map(|naive| naive.and_utc())
}

fn required(form: &FormData, name: &str, errors: &mut Vec<FieldError>) -> String {
    match form.get(name) {
        Some(value) => value.to_string(),
        None => {
            errors.push(FieldError::new(name, "This field is required."));
            String::new()
        }
    }
}

fn optional(form: &FormData, name: &str) -> Option<String> {
    form.get(name).map(str::to_string)
}

fn state_code(form: &FormData, errors: &mut Vec<FieldError>) -> String {
    let state = required(form, "state", errors);
    if state.is_empty() {
        return state;
    }
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(FieldError::new("state", "Use a two-letter state code."));
    }
    state.to_ascii_uppercase()
}

fn datetime_field(
    form: &FormData,
    name: &str,
    errors: &mut Vec<FieldError>,
) -> Option<DateTime<Utc>> {
    let raw = required(form, name, errors);
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_datetime(&raw);
    if parsed.is_none() {
        errors.push(FieldError::new(name, "Not a valid date and time."));
    }
    parsed
}

fn id_field(form: &FormData, name: &str, errors: &mut Vec<FieldError>) -> Option<i64> {
    let raw = required(form, name, errors);
    if raw.is_empty() {
        return None;
    }
    let parsed = raw.parse::<i64>().ok().filter(|id| *id > 0);
    if parsed.is_none() {
        errors.push(FieldError::new(name, "Must be a positive integer id."));
    }
    parsed
}

pub fn parse_venue(form: &FormData) -> Result<NewVenue, Vec<FieldError>> {
    let mut errors = Vec::new();
    let name = required(form, "name", &mut errors);
    let city = required(form, "city", &mut errors);
    let state = state_code(form, &mut errors);
    let address = required(form, "address", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewVenue {
        name,
        city,
        state,
        address,
        phone: optional(form, "phone"),
        image_link: optional(form, "image_link"),
        facebook_link: optional(form, "facebook_link"),
        website: optional(form, "website"),
        seeking_talent: form.checked("seeking_talent"),
        seeking_description: optional(form, "seeking_description"),
        genres: form.all("genres"),
    })
}

pub fn parse_artist(form: &FormData) -> Result<NewArtist, Vec<FieldError>> {
    let mut errors = Vec::new();
    let name = required(form, "name", &mut errors);
    let city = required(form, "city", &mut errors);
    let state = state_code(form, &mut errors);
    let available_from = datetime_field(form, "available_from", &mut errors);
    let available_to = datetime_field(form, "available_to", &mut errors);

    if let (Some(from), Some(to)) = (available_from, available_to) {
        if from > to {
            errors.push(FieldError::new(
                "available_to",
                "Must not be earlier than available from.",
            ));
        }
    }

    match (available_from, available_to) {
        (Some(available_from), Some(available_to)) if errors.is_empty() => Ok(NewArtist {
            name,
            city,
            state,
            phone: optional(form, "phone"),
            image_link: optional(form, "image_link"),
            facebook_link: optional(form, "facebook_link"),
            website: optional(form, "website"),
            seeking_venue: form.checked("seeking_venue"),
            seeking_description: optional(form, "seeking_description"),
            available_from,
            available_to,
            genres: form.all("genres"),
        }),
        _ => Err(errors),
    }
}

pub fn parse_show(form: &FormData) -> Result<NewShow, Vec<FieldError>> {
    let mut errors = Vec::new();
    let artist_id = id_field(form, "artist_id", &mut errors);
    let venue_id = id_field(form, "venue_id", &mut errors);
    let start_time = datetime_field(form, "start_time", &mut errors);

    match (artist_id, venue_id, start_time) {
        (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => Ok(NewShow {
            venue_id,
            artist_id,
            start_time,
        }),
        _ => Err(errors),
    }
}
