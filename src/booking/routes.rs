use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::booking::flash;
use crate::booking::forms::{self, FormData};
use crate::booking::pages::{self, ArtistDetail, SearchHit, VenueDetail};
use crate::booking::store;
use crate::constants::HOME_RECENT_LIMIT;
use crate::error::{FieldError, StoreError};
use crate::serve::AppState;

type SharedState = Arc<AppState>;
type RawForm = Form<Vec<(String, String)>>;

/// Failures that end a page request with an error page
#[derive(Error, Debug)]
pub enum PageError {
    #[error("page not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound | PageError::Store(StoreError::NotFound { .. }) => {
                flash::page(StatusCode::NOT_FOUND, false, pages::not_found())
            }
            PageError::Store(err) => {
                error!("Booking request failed: {}", err);
                flash::page(StatusCode::INTERNAL_SERVER_ERROR, false, pages::server_error())
            }
        }
    }
}

type PageResult = Result<Response, PageError>;

/// Numeric id from the path; anything else is a page that does not exist
struct PageId(i64);

impl<S> FromRequestParts<S> for PageId
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                debug!("Unusable path id: {}", rejection.body_text());
                PageError::NotFound
            })?;
        Ok(PageId(id))
    }
}

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/venues", get(venues_handler))
        .route("/venues/search", post(search_venues_handler))
        .route(
            "/venues/create",
            get(new_venue_form_handler).post(create_venue_handler),
        )
        .route("/venues/{id}", get(venue_handler).delete(delete_venue_handler))
        .route(
            "/venues/{id}/edit",
            get(edit_venue_form_handler).post(edit_venue_handler),
        )
        .route("/artists", get(artists_handler))
        .route("/artists/search", post(search_artists_handler))
        .route(
            "/artists/create",
            get(new_artist_form_handler).post(create_artist_handler),
        )
        .route("/artists/{id}", get(artist_handler).delete(delete_artist_handler))
        .route(
            "/artists/{id}/edit",
            get(edit_artist_form_handler).post(edit_artist_handler),
        )
        .route("/shows", get(shows_handler))
        .route(
            "/shows/create",
            get(new_show_form_handler).post(create_show_handler),
        )
        .fallback(not_found_handler)
}

async fn not_found_handler() -> Response {
    PageError::NotFound.into_response()
}

/// Render a page that shows the pending flash message, if any
fn flashed_page(jar: &CookieJar, render: impl FnOnce(Option<&str>) -> String) -> Response {
    let message = flash::read(jar);
    let html = render(message.as_deref());
    flash::page(StatusCode::OK, message.is_some(), html)
}

/// Split store validation failures from everything else
fn validation_errors(err: StoreError) -> Result<Vec<FieldError>, PageError> {
    match err {
        StoreError::Validation(errors) => Ok(errors),
        other => Err(other.into()),
    }
}

fn unprocessable(html: String) -> Response {
    flash::page(StatusCode::UNPROCESSABLE_ENTITY, false, html)
}

// ============================================================================
// Listings
// ============================================================================

async fn home_handler(State(state): State<SharedState>, jar: CookieJar) -> PageResult {
    let venues = store::recent_venues(&state.pool, HOME_RECENT_LIMIT).await?;
    let artists = store::recent_artists(&state.pool, HOME_RECENT_LIMIT).await?;
    Ok(flashed_page(&jar, |message| {
        pages::home(&venues, &artists, message)
    }))
}

async fn venues_handler(State(state): State<SharedState>, jar: CookieJar) -> PageResult {
    let groups = store::venues_by_location(&state.pool, Utc::now()).await?;
    Ok(flashed_page(&jar, |message| {
        pages::venues_index(&groups, message)
    }))
}

async fn artists_handler(State(state): State<SharedState>, jar: CookieJar) -> PageResult {
    let artists = store::list_artists(&state.pool).await?;
    Ok(flashed_page(&jar, |message| {
        pages::artists_index(&artists, message)
    }))
}

async fn shows_handler(State(state): State<SharedState>, jar: CookieJar) -> PageResult {
    let shows = store::list_shows(&state.pool).await?;
    Ok(flashed_page(&jar, |message| {
        pages::shows_index(&shows, message)
    }))
}

async fn search_venues_handler(
    State(state): State<SharedState>,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let term = form.get("search_term").unwrap_or_default().to_string();

    let venues = store::search_venues(&state.pool, &term).await?;
    let upcoming = store::upcoming_counts_by_venue(&state.pool, Utc::now()).await?;
    let hits: Vec<SearchHit> = venues
        .into_iter()
        .map(|venue| SearchHit {
            num_upcoming_shows: Some(upcoming.get(&venue.id).copied().unwrap_or(0)),
            id: venue.id,
            name: venue.name,
        })
        .collect();

    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::search_results("venues", &term, &hits, None),
    ))
}

async fn search_artists_handler(
    State(state): State<SharedState>,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let term = form.get("search_term").unwrap_or_default().to_string();

    let hits: Vec<SearchHit> = store::search_artists(&state.pool, &term)
        .await?
        .into_iter()
        .map(|artist| SearchHit {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: None,
        })
        .collect();

    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::search_results("artists", &term, &hits, None),
    ))
}

// ============================================================================
// Venues
// ============================================================================

async fn venue_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
    jar: CookieJar,
) -> PageResult {
    let record = store::venue_record(&state.pool, id)
        .await?
        .ok_or(PageError::NotFound)?;
    let detail = VenueDetail::new(record, Utc::now());
    Ok(flashed_page(&jar, |message| {
        pages::venue_detail(&detail, message)
    }))
}

async fn new_venue_form_handler(State(state): State<SharedState>) -> PageResult {
    let genres = store::list_genres(&state.pool).await?;
    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::venue_form("List a new venue", "/venues/create", &FormData::default(), &[], &genres),
    ))
}

async fn create_venue_handler(
    State(state): State<SharedState>,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let errors = match forms::parse_venue(&form) {
        Ok(venue) => match store::create_venue(&state.pool, &venue).await {
            Ok(id) => {
                info!("Listed venue {} ({})", id, venue.name);
                return Ok(flash::redirect(
                    "/",
                    &format!("Venue {} was successfully listed!", venue.name),
                ));
            }
            Err(err) => validation_errors(err)?,
        },
        Err(errors) => errors,
    };

    let genres = store::list_genres(&state.pool).await?;
    Ok(unprocessable(pages::venue_form(
        "List a new venue",
        "/venues/create",
        &form,
        &errors,
        &genres,
    )))
}

async fn edit_venue_form_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
) -> PageResult {
    let venue = store::get_venue(&state.pool, id)
        .await?
        .ok_or(PageError::NotFound)?;
    let selected = store::venue_genres(&state.pool, id).await?;
    let genres = store::list_genres(&state.pool).await?;
    let action = format!("/venues/{}/edit", id);

    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::venue_form(
            &format!("Edit venue {}", venue.name),
            &action,
            &FormData::from_venue(&venue, &selected),
            &[],
            &genres,
        ),
    ))
}

async fn edit_venue_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let errors = match forms::parse_venue(&form) {
        Ok(venue) => match store::update_venue(&state.pool, id, &venue).await {
            Ok(()) => {
                info!("Updated venue {}", id);
                return Ok(flash::redirect(
                    &format!("/venues/{}", id),
                    &format!("Venue {} was successfully updated!", venue.name),
                ));
            }
            Err(err) => validation_errors(err)?,
        },
        Err(errors) => errors,
    };

    let genres = store::list_genres(&state.pool).await?;
    Ok(unprocessable(pages::venue_form(
        "Edit venue",
        &format!("/venues/{}/edit", id),
        &form,
        &errors,
        &genres,
    )))
}

async fn delete_venue_handler(
    State(state): State<SharedState>,
    id: Result<PageId, PageError>,
) -> Response {
    match id {
        Ok(PageId(id)) => delete_response(store::delete_venue(&state.pool, id).await),
        Err(_) => success_json(StatusCode::NOT_FOUND, false),
    }
}

fn success_json(status: StatusCode, success: bool) -> Response {
    (status, Json(json!({ "success": success }))).into_response()
}

/// JSON `{success}` for the delete buttons' fetch calls
fn delete_response(result: Result<(), StoreError>) -> Response {
    match result {
        Ok(()) => success_json(StatusCode::OK, true),
        Err(StoreError::NotFound { entity, id }) => {
            warn!("Delete of missing {} {}", entity, id);
            success_json(StatusCode::NOT_FOUND, false)
        }
        Err(err) => {
            error!("Delete failed: {}", err);
            success_json(StatusCode::INTERNAL_SERVER_ERROR, false)
        }
    }
}

// ============================================================================
// Artists
// ============================================================================

async fn artist_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
    jar: CookieJar,
) -> PageResult {
    let record = store::artist_record(&state.pool, id)
        .await?
        .ok_or(PageError::NotFound)?;
    let detail = ArtistDetail::new(record, Utc::now());
    Ok(flashed_page(&jar, |message| {
        pages::artist_detail(&detail, message)
    }))
}

async fn new_artist_form_handler(State(state): State<SharedState>) -> PageResult {
    let genres = store::list_genres(&state.pool).await?;
    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::artist_form(
            "List a new artist",
            "/artists/create",
            &FormData::default(),
            &[],
            &genres,
        ),
    ))
}

async fn create_artist_handler(
    State(state): State<SharedState>,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let errors = match forms::parse_artist(&form) {
        Ok(artist) => match store::create_artist(&state.pool, &artist).await {
            Ok(id) => {
                info!("Listed artist {} ({})", id, artist.name);
                return Ok(flash::redirect(
                    "/",
                    &format!("Artist {} was successfully listed!", artist.name),
                ));
            }
            Err(err) => validation_errors(err)?,
        },
        Err(errors) => errors,
    };

    let genres = store::list_genres(&state.pool).await?;
    Ok(unprocessable(pages::artist_form(
        "List a new artist",
        "/artists/create",
        &form,
        &errors,
        &genres,
    )))
}

async fn edit_artist_form_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
) -> PageResult {
    let artist = store::get_artist(&state.pool, id)
        .await?
        .ok_or(PageError::NotFound)?;
    let selected = store::artist_genres(&state.pool, id).await?;
    let genres = store::list_genres(&state.pool).await?;
    let action = format!("/artists/{}/edit", id);

    Ok(flash::page(
        StatusCode::OK,
        false,
        pages::artist_form(
            &format!("Edit artist {}", artist.name),
            &action,
            &FormData::from_artist(&artist, &selected),
            &[],
            &genres,
        ),
    ))
}

async fn edit_artist_handler(
    State(state): State<SharedState>,
    PageId(id): PageId,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let errors = match forms::parse_artist(&form) {
        Ok(artist) => match store::update_artist(&state.pool, id, &artist).await {
            Ok(()) => {
                info!("Updated artist {}", id);
                return Ok(flash::redirect(
                    &format!("/artists/{}", id),
                    &format!("Artist {} was successfully updated!", artist.name),
                ));
            }
            Err(err) => validation_errors(err)?,
        },
        Err(errors) => errors,
    };

    let genres = store::list_genres(&state.pool).await?;
    Ok(unprocessable(pages::artist_form(
        "Edit artist",
        &format!("/artists/{}/edit", id),
        &form,
        &errors,
        &genres,
    )))
}

async fn delete_artist_handler(
    State(state): State<SharedState>,
    id: Result<PageId, PageError>,
) -> Response {
    match id {
        Ok(PageId(id)) => delete_response(store::delete_artist(&state.pool, id).await),
        Err(_) => success_json(StatusCode::NOT_FOUND, false),
    }
}

// ============================================================================
// Shows
// ============================================================================

async fn new_show_form_handler() -> Response {
    flash::page(
        StatusCode::OK,
        false,
        pages::show_form(&FormData::default(), &[]),
    )
}

async fn create_show_handler(
    State(state): State<SharedState>,
    Form(form): RawForm,
) -> PageResult {
    let form = FormData::from(form);
    let errors = match forms::parse_show(&form) {
        Ok(show) => match store::create_show(&state.pool, &show).await {
            Ok(id) => {
                info!(
                    "Listed show {} (artist {} at venue {})",
                    id, show.artist_id, show.venue_id
                );
                return Ok(flash::redirect("/", "Show was successfully listed!"));
            }
            Err(err) => validation_errors(err)?,
        },
        Err(errors) => errors,
    };

    Ok(unprocessable(pages::show_form(&form, &errors)))
}
