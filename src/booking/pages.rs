//! Server-rendered HTML for the booking app.
//!
//! Every page goes through `layout`, and every value that came from a user or
//! the database passes through `escape` first.

use chrono::{DateTime, Utc};

use crate::booking::forms::FormData;
use crate::booking::store::{AlbumWithSongs, ArtistRecord, VenueRecord};
use crate::error::FieldError;
use crate::listing::{partition_shows, LocationGroup, PartitionedShows, ShowListing};
use crate::models::{Artist, Genre, Venue};

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_time(value: DateTime<Utc>) -> String {
    value.format("%a %b %d, %Y %H:%M UTC").to_string()
}

pub fn layout(title: &str, flash: Option<&str>, body: &str) -> String {
    let flash_html = flash
        .map(|message| format!("<div class=\"flash\">{}</div>\n", escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Fyyur</title>
</head>
<body>
<nav>
<a href="/">Fyyur</a>
<a href="/venues">Venues</a>
<a href="/artists">Artists</a>
<a href="/shows">Shows</a>
<a href="/venues/create">Post a venue</a>
<a href="/artists/create">Post an artist</a>
<a href="/shows/create">Post a show</a>
</nav>
{flash_html}<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        flash_html = flash_html,
        body = body,
    )
}

fn optional_row(label: &str, value: &Option<String>) -> String {
    match value {
        Some(value) => format!("<p>{}: {}</p>\n", label, escape(value)),
        None => String::new(),
    }
}

fn link_row(label: &str, value: &Option<String>) -> String {
    match value {
        Some(value) => format!(
            "<p>{}: <a href=\"{url}\">{url}</a></p>\n",
            label,
            url = escape(value)
        ),
        None => String::new(),
    }
}

fn genre_list(genres: &[Genre]) -> String {
    if genres.is_empty() {
        return String::new();
    }
    let items: String = genres
        .iter()
        .map(|g| format!("<li>{}</li>", escape(&g.name)))
        .collect();
    format!("<ul class=\"genres\">{}</ul>\n", items)
}

// ============================================================================
// Listings
// ============================================================================

pub fn home(venues: &[Venue], artists: &[Artist], flash: Option<&str>) -> String {
    let venue_items: String = venues
        .iter()
        .map(|v| format!("<li><a href=\"/venues/{}\">{}</a></li>\n", v.id, escape(&v.name)))
        .collect();
    let artist_items: String = artists
        .iter()
        .map(|a| format!("<li><a href=\"/artists/{}\">{}</a></li>\n", a.id, escape(&a.name)))
        .collect();

    let body = format!(
        "<h2>Recently listed venues</h2>\n<ul class=\"recent-venues\">\n{}</ul>\n\
         <h2>Recently listed artists</h2>\n<ul class=\"recent-artists\">\n{}</ul>",
        venue_items, artist_items
    );
    layout("Home", flash, &body)
}

fn search_form(action: &str, placeholder: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{}\">\
         <input type=\"search\" name=\"search_term\" placeholder=\"{}\">\
         <button type=\"submit\">Search</button></form>\n",
        action, placeholder
    )
}

pub fn venues_index(groups: &[LocationGroup], flash: Option<&str>) -> String {
    let mut body = search_form("/venues/search", "Find a venue");
    for group in groups {
        body.push_str(&format!(
            "<section class=\"location\">\n<h2>{}, {}</h2>\n<ul>\n",
            escape(&group.city),
            escape(&group.state)
        ));
        for venue in &group.venues {
            body.push_str(&format!(
                "<li><a href=\"/venues/{}\">{}</a> <span class=\"upcoming\">{} upcoming</span></li>\n",
                venue.id,
                escape(&venue.name),
                venue.num_upcoming_shows
            ));
        }
        body.push_str("</ul>\n</section>\n");
    }
    layout("Venues", flash, &body)
}

pub fn artists_index(artists: &[Artist], flash: Option<&str>) -> String {
    let mut body = search_form("/artists/search", "Find an artist");
    body.push_str("<ul class=\"artists\">\n");
    for artist in artists {
        body.push_str(&format!(
            "<li><a href=\"/artists/{}\">{}</a></li>\n",
            artist.id,
            escape(&artist.name)
        ));
    }
    body.push_str("</ul>");
    layout("Artists", flash, &body)
}

/// One search result row; `num_upcoming_shows` is shown when known
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: Option<i64>,
}

/// `kind` is the URL segment, `venues` or `artists`
pub fn search_results(kind: &str, term: &str, hits: &[SearchHit], flash: Option<&str>) -> String {
    let mut body = search_form(&format!("/{}/search", kind), "Search again");
    body.push_str(&format!(
        "<p class=\"count\">Number of search results for \"{}\": {}</p>\n<ul class=\"results\">\n",
        escape(term),
        hits.len()
    ));
    for hit in hits {
        let upcoming = hit
            .num_upcoming_shows
            .map(|n| format!(" <span class=\"upcoming\">{} upcoming</span>", n))
            .unwrap_or_default();
        body.push_str(&format!(
            "<li><a href=\"/{}/{}\">{}</a>{}</li>\n",
            kind,
            hit.id,
            escape(&hit.name),
            upcoming
        ));
    }
    body.push_str("</ul>");
    layout("Search results", flash, &body)
}

pub fn shows_index(shows: &[ShowListing], flash: Option<&str>) -> String {
    let mut body = String::from("<ul class=\"shows\">\n");
    for show in shows {
        let image = show
            .artist_image_link
            .as_deref()
            .map(|link| format!("<img src=\"{}\" alt=\"\"> ", escape(link)))
            .unwrap_or_default();
        body.push_str(&format!(
            "<li>{}<a href=\"/artists/{}\">{}</a> at <a href=\"/venues/{}\">{}</a> <time>{}</time></li>\n",
            image,
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name),
            format_time(show.start_time)
        ));
    }
    body.push_str("</ul>");
    layout("Shows", flash, &body)
}

// ============================================================================
// Detail pages
// ============================================================================

/// Venue page view: the stored row plus genres and shows split around `now`
pub struct VenueDetail {
    pub venue: Venue,
    pub genres: Vec<Genre>,
    pub shows: PartitionedShows,
}

impl VenueDetail {
    pub fn new(record: VenueRecord, now: DateTime<Utc>) -> Self {
        Self {
            venue: record.venue,
            genres: record.genres,
            shows: partition_shows(record.shows, now),
        }
    }
}

pub struct ArtistDetail {
    pub artist: Artist,
    pub genres: Vec<Genre>,
    pub shows: PartitionedShows,
    pub albums: Vec<AlbumWithSongs>,
}

impl ArtistDetail {
    pub fn new(record: ArtistRecord, now: DateTime<Utc>) -> Self {
        Self {
            artist: record.artist,
            genres: record.genres,
            shows: partition_shows(record.shows, now),
            albums: record.albums,
        }
    }
}

/// Past/upcoming sections; `show_artist` picks which party each row names
fn show_sections(shows: &PartitionedShows, show_artist: bool) -> String {
    let section = |title: &str, class: &str, entries: &[ShowListing]| {
        let mut html = format!(
            "<section class=\"{}\">\n<h2>{} {}</h2>\n<ul>\n",
            class,
            entries.len(),
            title
        );
        for show in entries {
            let (path, id, name, image) = if show_artist {
                ("artists", show.artist_id, &show.artist_name, &show.artist_image_link)
            } else {
                ("venues", show.venue_id, &show.venue_name, &show.venue_image_link)
            };
            let image = image
                .as_deref()
                .map(|link| format!("<img src=\"{}\" alt=\"\"> ", escape(link)))
                .unwrap_or_default();
            html.push_str(&format!(
                "<li>{}<a href=\"/{}/{}\">{}</a> <time>{}</time></li>\n",
                image,
                path,
                id,
                escape(name),
                format_time(show.start_time)
            ));
        }
        html.push_str("</ul>\n</section>\n");
        html
    };

    let mut html = section("Upcoming Shows", "upcoming-shows", &shows.upcoming);
    html.push_str(&section("Past Shows", "past-shows", &shows.past));
    html
}

pub fn venue_detail(detail: &VenueDetail, flash: Option<&str>) -> String {
    let venue = &detail.venue;
    let mut body = genre_list(&detail.genres);
    body.push_str(&format!(
        "<p class=\"location\">{}, {}, {}</p>\n",
        escape(&venue.address),
        escape(&venue.city),
        escape(&venue.state)
    ));
    body.push_str(&optional_row("Phone", &venue.phone));
    body.push_str(&link_row("Website", &venue.website));
    body.push_str(&link_row("Facebook", &venue.facebook_link));
    if venue.seeking_talent {
        body.push_str("<p class=\"seeking\">Currently seeking talent</p>\n");
        body.push_str(&optional_row("Details", &venue.seeking_description));
    } else {
        body.push_str("<p class=\"not-seeking\">Not currently seeking talent</p>\n");
    }
    if let Some(link) = &venue.image_link {
        body.push_str(&format!("<img src=\"{}\" alt=\"Venue image\">\n", escape(link)));
    }
    body.push_str(&show_sections(&detail.shows, true));
    body.push_str(&format!(
        "<p><a href=\"/venues/{}/edit\">Edit</a></p>",
        venue.id
    ));
    layout(&venue.name, flash, &body)
}

pub fn artist_detail(detail: &ArtistDetail, flash: Option<&str>) -> String {
    let artist = &detail.artist;
    let mut body = genre_list(&detail.genres);
    body.push_str(&format!(
        "<p class=\"location\">{}, {}</p>\n",
        escape(&artist.city),
        escape(&artist.state)
    ));
    body.push_str(&optional_row("Phone", &artist.phone));
    body.push_str(&link_row("Website", &artist.website));
    body.push_str(&link_row("Facebook", &artist.facebook_link));
    body.push_str(&format!(
        "<p class=\"availability\">Available {} to {}</p>\n",
        format_time(artist.available_from),
        format_time(artist.available_to)
    ));
    if artist.seeking_venue {
        body.push_str("<p class=\"seeking\">Currently seeking performance venues</p>\n");
        body.push_str(&optional_row("Details", &artist.seeking_description));
    } else {
        body.push_str("<p class=\"not-seeking\">Not currently seeking performance venues</p>\n");
    }
    if let Some(link) = &artist.image_link {
        body.push_str(&format!("<img src=\"{}\" alt=\"Artist image\">\n", escape(link)));
    }
    body.push_str(&show_sections(&detail.shows, false));

    if !detail.albums.is_empty() {
        body.push_str("<section class=\"albums\">\n<h2>Albums</h2>\n");
        for entry in &detail.albums {
            body.push_str(&format!("<h3>{}</h3>\n<ol>\n", escape(&entry.album.title)));
            for song in &entry.songs {
                body.push_str(&format!("<li>{}</li>\n", escape(&song.name)));
            }
            body.push_str("</ol>\n");
        }
        body.push_str("</section>\n");
    }

    body.push_str(&format!(
        "<p><a href=\"/artists/{}/edit\">Edit</a></p>",
        artist.id
    ));
    layout(&artist.name, flash, &body)
}

// ============================================================================
// Forms
// ============================================================================

fn error_summary(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}: {}</li>", escape(&e.field), escape(&e.message)))
        .collect();
    format!("<ul class=\"errors\">{}</ul>\n", items)
}

fn field_errors(name: &str, errors: &[FieldError]) -> String {
    errors
        .iter()
        .filter(|e| e.field == name)
        .map(|e| format!("<span class=\"field-error\">{}</span>", escape(&e.message)))
        .collect()
}

fn input(form: &FormData, errors: &[FieldError], name: &str, label: &str, kind: &str) -> String {
    format!(
        "<label>{label} <input type=\"{kind}\" name=\"{name}\" value=\"{value}\"></label>{errs}<br>\n",
        label = label,
        kind = kind,
        name = name,
        value = escape(form.get(name).unwrap_or_default()),
        errs = field_errors(name, errors)
    )
}

fn checkbox(form: &FormData, name: &str, label: &str) -> String {
    format!(
        "<label><input type=\"checkbox\" name=\"{}\" value=\"y\"{}> {}</label><br>\n",
        name,
        if form.checked(name) { " checked" } else { "" },
        label
    )
}

fn genre_select(form: &FormData, errors: &[FieldError], genres: &[Genre]) -> String {
    let selected = form.all("genres");
    let options: String = genres
        .iter()
        .map(|g| {
            format!(
                "<option value=\"{name}\"{sel}>{name}</option>",
                name = escape(&g.name),
                sel = if selected.contains(&g.name) { " selected" } else { "" }
            )
        })
        .collect();
    format!(
        "<label>Genres <select name=\"genres\" multiple>{}</select></label>{}<br>\n",
        options,
        field_errors("genres", errors)
    )
}

pub fn venue_form(
    title: &str,
    action: &str,
    form: &FormData,
    errors: &[FieldError],
    genres: &[Genre],
) -> String {
    let mut body = error_summary(errors);
    body.push_str(&format!("<form method=\"post\" action=\"{}\">\n", escape(action)));
    body.push_str(&input(form, errors, "name", "Name", "text"));
    body.push_str(&input(form, errors, "city", "City", "text"));
    body.push_str(&input(form, errors, "state", "State", "text"));
    body.push_str(&input(form, errors, "address", "Address", "text"));
    body.push_str(&input(form, errors, "phone", "Phone", "tel"));
    body.push_str(&genre_select(form, errors, genres));
    body.push_str(&input(form, errors, "image_link", "Image link", "url"));
    body.push_str(&input(form, errors, "facebook_link", "Facebook link", "url"));
    body.push_str(&input(form, errors, "website", "Website", "url"));
    body.push_str(&checkbox(form, "seeking_talent", "Seeking talent"));
    body.push_str(&input(form, errors, "seeking_description", "Seeking description", "text"));
    body.push_str("<button type=\"submit\">Save</button>\n</form>");
    layout(title, None, &body)
}

pub fn artist_form(
    title: &str,
    action: &str,
    form: &FormData,
    errors: &[FieldError],
    genres: &[Genre],
) -> String {
    let mut body = error_summary(errors);
    body.push_str(&format!("<form method=\"post\" action=\"{}\">\n", escape(action)));
    body.push_str(&input(form, errors, "name", "Name", "text"));
    body.push_str(&input(form, errors, "city", "City", "text"));
    body.push_str(&input(form, errors, "state", "State", "text"));
    body.push_str(&input(form, errors, "phone", "Phone", "tel"));
    body.push_str(&genre_select(form, errors, genres));
    body.push_str(&input(form, errors, "image_link", "Image link", "url"));
    body.push_str(&input(form, errors, "facebook_link", "Facebook link", "url"));
    body.push_str(&input(form, errors, "website", "Website", "url"));
    body.push_str(&checkbox(form, "seeking_venue", "Seeking venue"));
    body.push_str(&input(form, errors, "seeking_description", "Seeking description", "text"));
    body.push_str(&input(form, errors, "available_from", "Available from", "datetime-local"));
    body.push_str(&input(form, errors, "available_to", "Available to", "datetime-local"));
    body.push_str("<button type=\"submit\">Save</button>\n</form>");
    layout(title, None, &body)
}

pub fn show_form(form: &FormData, errors: &[FieldError]) -> String {
    let mut body = error_summary(errors);
    body.push_str("<form method=\"post\" action=\"/shows/create\">\n");
    body.push_str(&input(form, errors, "artist_id", "Artist ID", "number"));
    body.push_str(&input(form, errors, "venue_id", "Venue ID", "number"));
    body.push_str(&input(form, errors, "start_time", "Start time", "datetime-local"));
    body.push_str("<button type=\"submit\">Create show</button>\n</form>");
    layout("List a new show", None, &body)
}

// ============================================================================
// Errors
// ============================================================================

pub fn not_found() -> String {
    layout(
        "404 Not Found",
        None,
        "<p>The page you were looking for does not exist.</p><p><a href=\"/\">Back home</a></p>",
    )
}

pub fn server_error() -> String {
    layout(
        "500 Server Error",
        None,
        "<p>Something went wrong on our side. Please try again later.</p>",
    )
}
