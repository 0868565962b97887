//! # Booking App Tests
//!
//! These tests start the real booking router on an ephemeral port against a
//! temporary SQLite file and drive it over HTTP.
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test --test booking_test
//! ```

use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::net::TcpListener;

use fyyur_trivia::config::{AppType, ServerConfig};
use fyyur_trivia::db::{count_rows, prepare_database};
use fyyur_trivia::schema::{Albums, Artists, Shows, Songs, Venues};
use fyyur_trivia::seed::{seed_booking, BookingFixtures};
use fyyur_trivia::serve::{build_router, AppState};

const FIXTURES: &str = r#"
genres = ["Alternative", "Blues", "Classical", "Folk", "Jazz", "R&B", "Reggae", "Rock n Roll", "Swing"]

[[venues]]
name = "The Musical Hop"
city = "San Francisco"
state = "CA"
address = "1015 Folsom Street"
phone = "123-123-1234"
seeking_talent = true
seeking_description = "We are on the lookout for a local artist to play every two weeks."
genres = ["jazz", "reggae", "swing", "classical", "folk"]

[[venues]]
name = "The Dueling Pianos Bar"
city = "New York"
state = "NY"
address = "335 Delancey Street"
genres = ["classical", "r&b"]

[[venues]]
name = "Park Square Live Music & Coffee"
city = "San Francisco"
state = "CA"
address = "34 Whiskey Moore Ave"
genres = ["rock", "jazz", "classical", "folk"]

[[artists]]
name = "Guns N Petals"
city = "San Francisco"
state = "CA"
seeking_venue = true
available_from = "2000-01-01T00:00:00Z"
available_to = "2100-01-01T00:00:00Z"
genres = ["rock"]

[[artists]]
name = "Matt Quevedo"
city = "New York"
state = "NY"
available_from = "2019-06-01T00:00:00Z"
available_to = "2019-06-30T23:59:59Z"
genres = ["jazz"]

[[albums]]
title = "Petal Pusher"
artist = "Guns N Petals"

[[songs]]
name = "Bloom"
album = "Petal Pusher"

[[songs]]
name = "Thorns"
album = "Petal Pusher"

[[shows]]
venue = "The Musical Hop"
artist = "Guns N Petals"
start_time = "2019-05-21T21:30:00Z"

[[shows]]
venue = "The Musical Hop"
artist = "Guns N Petals"
start_time = "2099-05-21T21:30:00Z"

[[shows]]
venue = "Park Square Live Music & Coffee"
artist = "Matt Quevedo"
start_time = "2019-06-15T23:00:00Z"
"#;

struct TestServer {
    base_url: String,
    pool: sqlx::SqlitePool,
    client: reqwest::Client,
    _guard: tempfile::TempDir,
}

/// Helper to start a seeded booking server on 127.0.0.1:0
async fn start_booking_server() -> TestServer {
    let guard = tempfile::tempdir().unwrap();
    let db_path = guard.path().join("fyyur.sqlite");

    let pool = prepare_database(&db_path, AppType::Booking, 5).await.unwrap();

    let fixtures: BookingFixtures = toml::from_str(FIXTURES).unwrap();
    seed_booking(&pool, &fixtures).await.unwrap();

    let config = ServerConfig {
        app_type: AppType::Booking,
        database_file: db_path,
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        max_connections: 5,
        cors_allowed_origins: None,
    };
    let app = build_router(Arc::new(AppState {
        config,
        pool: pool.clone(),
    }))
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    TestServer {
        base_url: format!("http://{}", addr),
        pool,
        client,
        _guard: guard,
    }
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    async fn id_of_venue(&self, name: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM venues WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    async fn id_of_artist(&self, name: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM artists WHERE name = ?")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_seeded_fixtures_are_listed() {
    let server = start_booking_server().await;

    assert_eq!(count_rows(&server.pool, Venues::Table).await.unwrap(), 3);
    assert_eq!(count_rows(&server.pool, Artists::Table).await.unwrap(), 2);
    assert_eq!(count_rows(&server.pool, Shows::Table).await.unwrap(), 3);
    assert_eq!(count_rows(&server.pool, Songs::Table).await.unwrap(), 2);

    let (status, html) = server.get_text("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("The Dueling Pianos Bar"));
    assert!(html.contains("Matt Quevedo"));
}

#[tokio::test]
async fn test_venues_grouped_by_location() {
    let server = start_booking_server().await;

    let (status, html) = server.get_text("/venues").await;
    assert_eq!(status, StatusCode::OK);

    let new_york = html.find("<h2>New York, NY</h2>").expect("New York group");
    let san_francisco = html
        .find("<h2>San Francisco, CA</h2>")
        .expect("San Francisco group");
    assert!(new_york < san_francisco, "Groups follow city order");
    assert_eq!(
        html.matches("<h2>San Francisco, CA</h2>").count(),
        1,
        "Both San Francisco venues share one group"
    );
    assert!(html.contains("The Musical Hop</a> <span class=\"upcoming\">1 upcoming</span>"));
}

#[tokio::test]
async fn test_venue_detail_partitions_shows() {
    let server = start_booking_server().await;
    let id = server.id_of_venue("The Musical Hop").await;

    let (status, html) = server.get_text(&format!("/venues/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h2>1 Upcoming Shows</h2>"));
    assert!(html.contains("<h2>1 Past Shows</h2>"));
    assert!(html.contains("<li>Jazz</li>"));
    assert!(html.contains("Currently seeking talent"));
}

#[tokio::test]
async fn test_artist_detail_lists_albums_and_songs() {
    let server = start_booking_server().await;
    let id = server.id_of_artist("Guns N Petals").await;

    let (status, html) = server.get_text(&format!("/artists/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h3>Petal Pusher</h3>"));
    assert!(html.contains("<li>Bloom</li>"));
    assert!(html.contains("<li>Thorns</li>"));
    assert!(html.contains("<li>Rock n Roll</li>"));
}

#[tokio::test]
async fn test_missing_pages_are_not_found() {
    let server = start_booking_server().await;

    let (status, html) = server.get_text("/venues/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("404 Not Found"));

    let (status, _) = server.get_text("/artists/9999/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get_text("/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, html) = server.get_text("/venues/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("404 Not Found"), "Non-numeric id renders the 404 page");

    let (status, html) = server.get_text("/artists/abc/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("404 Not Found"));

    let response = server
        .client
        .delete(server.url("/venues/abc"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"success": false}));
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_literal() {
    let server = start_booking_server().await;

    let response = server
        .post_form("/venues/search", &[("search_term", "hop")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Number of search results for \"hop\": 1"));
    assert!(html.contains("The Musical Hop"));

    let html = server
        .post_form("/venues/search", &[("search_term", "Music")])
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains(": 2</p>"), "Hop and Park Square both match");

    let html = server
        .post_form("/venues/search", &[("search_term", "%")])
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains(": 0</p>"), "Percent matches literally");

    let html = server
        .post_form("/artists/search", &[("search_term", "A")])
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains(": 2</p>"), "Guns N Petals and Matt Quevedo");
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let server = start_booking_server().await;

    let response = server
        .post_form(
            "/venues/create",
            &[
                ("name", "CAFÉ ÉLECTRIQUE"),
                ("city", "Montréal"),
                ("state", "QC"),
                ("address", "1 Rue Saint-Denis"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = server
        .post_form(
            "/artists/create",
            &[
                ("name", "Ärzte Ensemble"),
                ("city", "Berlin"),
                ("state", "BE"),
                ("available_from", "2026-05-01T00:00"),
                ("available_to", "2026-06-01T00:00"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    for term in ["CAFÉ ÉLECTRIQUE", "café électrique", "é"] {
        let html = server
            .post_form("/venues/search", &[("search_term", term)])
            .await
            .text()
            .await
            .unwrap();
        assert!(html.contains(": 1</p>"), "venue search for {:?}", term);
        assert!(html.contains("CAFÉ ÉLECTRIQUE"));
    }

    let html = server
        .post_form("/artists/search", &[("search_term", "ärzte")])
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains(": 1</p>"));
    assert!(html.contains("Ärzte Ensemble"));
}

#[tokio::test]
async fn test_failed_write_leaves_no_partial_venue() {
    let server = start_booking_server().await;

    // The venue row goes in before its genre links, so linking is what fails
    sqlx::query("DROP TABLE venue_genres")
        .execute(&server.pool)
        .await
        .unwrap();

    let response = server
        .post_form(
            "/venues/create",
            &[
                ("name", "The Half Written Hall"),
                ("city", "Austin"),
                ("state", "TX"),
                ("address", "1 Congress Ave"),
                ("genres", "Jazz"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = response.text().await.unwrap();
    assert!(html.contains("Something went wrong on our side."));
    assert!(!html.contains("venue_genres"), "Database detail stays in the log");

    assert_eq!(count_rows(&server.pool, Venues::Table).await.unwrap(), 3);
    let leftover: Option<i64> = sqlx::query_scalar("SELECT id FROM venues WHERE name = ?")
        .bind("The Half Written Hall")
        .fetch_optional(&server.pool)
        .await
        .unwrap();
    assert_eq!(leftover, None);
}

#[tokio::test]
async fn test_create_venue_redirects_with_flash() {
    let server = start_booking_server().await;

    let response = server
        .post_form(
            "/venues/create",
            &[
                ("name", "The Blue Note"),
                ("city", "New York"),
                ("state", "ny"),
                ("address", "131 W 3rd St"),
                ("genres", "Jazz"),
                ("genres", "Blues"),
                ("seeking_talent", "y"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    let cookie = response.headers()[SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    assert_eq!(count_rows(&server.pool, Venues::Table).await.unwrap(), 4);

    let response = server
        .client
        .get(server.url("/"))
        .header(COOKIE, cookie)
        .send()
        .await
        .unwrap();
    assert!(
        response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"),
        "Flash cookie is cleared once shown"
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("Venue The Blue Note was successfully listed!"));

    let id = server.id_of_venue("The Blue Note").await;
    let (_, html) = server.get_text(&format!("/venues/{}", id)).await;
    assert!(html.contains("<li>Blues</li>"));
    assert!(html.contains("131 W 3rd St, New York, NY"));
}

#[tokio::test]
async fn test_create_venue_missing_fields_changes_nothing() {
    let server = start_booking_server().await;

    let response = server
        .post_form("/venues/create", &[("name", "Nameless"), ("city", "")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text().await.unwrap();
    assert!(html.contains("value=\"Nameless\""), "Form keeps entered values");
    assert!(html.contains("This field is required."));

    let response = server
        .post_form(
            "/venues/create",
            &[
                ("name", "Genre Test"),
                ("city", "Austin"),
                ("state", "TX"),
                ("address", "1 Congress Ave"),
                ("genres", "Polka"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("unknown genre"));

    assert_eq!(count_rows(&server.pool, Venues::Table).await.unwrap(), 3);
}

#[tokio::test]
async fn test_edit_venue_updates_fields_and_genres() {
    let server = start_booking_server().await;
    let id = server.id_of_venue("The Dueling Pianos Bar").await;

    let (status, html) = server.get_text(&format!("/venues/{}/edit", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("value=\"335 Delancey Street\""));

    let response = server
        .post_form(
            &format!("/venues/{}/edit", id),
            &[
                ("name", "The Dueling Pianos Lounge"),
                ("city", "New York"),
                ("state", "NY"),
                ("address", "335 Delancey Street"),
                ("genres", "Swing"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/venues/{}", id).as_str());

    let (_, html) = server.get_text(&format!("/venues/{}", id)).await;
    assert!(html.contains("The Dueling Pianos Lounge"));
    assert!(html.contains("<li>Swing</li>"));
    assert!(!html.contains("<li>Classical</li>"), "Old genres replaced");
}

#[tokio::test]
async fn test_delete_venue_removes_shows() {
    let server = start_booking_server().await;
    let id = server.id_of_venue("The Musical Hop").await;

    let response = server
        .client
        .delete(server.url(&format!("/venues/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"success": true}));

    assert_eq!(count_rows(&server.pool, Venues::Table).await.unwrap(), 2);
    assert_eq!(count_rows(&server.pool, Shows::Table).await.unwrap(), 1);

    let (status, _) = server.get_text(&format!("/venues/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let response = server
        .client
        .delete(server.url(&format!("/venues/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"success": false}));
}

#[tokio::test]
async fn test_delete_artist_cascades() {
    let server = start_booking_server().await;
    let id = server.id_of_artist("Guns N Petals").await;

    let response = server
        .client
        .delete(server.url(&format!("/artists/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(count_rows(&server.pool, Artists::Table).await.unwrap(), 1);
    assert_eq!(count_rows(&server.pool, Albums::Table).await.unwrap(), 0);
    assert_eq!(count_rows(&server.pool, Songs::Table).await.unwrap(), 0);
    assert_eq!(
        count_rows(&server.pool, Shows::Table).await.unwrap(),
        1,
        "Only Matt Quevedo's show remains"
    );
}

#[tokio::test]
async fn test_create_show_checks_availability() {
    let server = start_booking_server().await;
    let venue_id = server.id_of_venue("The Dueling Pianos Bar").await.to_string();
    let artist_id = server.id_of_artist("Matt Quevedo").await.to_string();

    let response = server
        .post_form(
            "/shows/create",
            &[
                ("artist_id", artist_id.as_str()),
                ("venue_id", venue_id.as_str()),
                ("start_time", "2019-07-15 20:00"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("is only available from"));
    assert_eq!(count_rows(&server.pool, Shows::Table).await.unwrap(), 3);

    let response = server
        .post_form(
            "/shows/create",
            &[
                ("artist_id", artist_id.as_str()),
                ("venue_id", "9999"),
                ("start_time", "2019-06-15 20:00"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("venue 9999 does not exist"));

    let response = server
        .post_form(
            "/shows/create",
            &[
                ("artist_id", artist_id.as_str()),
                ("venue_id", venue_id.as_str()),
                ("start_time", "2019-06-15 20:00"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(count_rows(&server.pool, Shows::Table).await.unwrap(), 4);

    let (_, html) = server.get_text("/shows").await;
    let first = html.find("Sat Jun 15, 2019 20:00 UTC").expect("new show listed");
    let second = html.find("Sat Jun 15, 2019 23:00 UTC").expect("seeded show listed");
    assert!(first < second, "Shows are ordered by start time");
}

#[tokio::test]
async fn test_create_artist_rejects_reversed_window() {
    let server = start_booking_server().await;

    let response = server
        .post_form(
            "/artists/create",
            &[
                ("name", "The Wild Sax Band"),
                ("city", "San Francisco"),
                ("state", "CA"),
                ("available_from", "2026-06-01T00:00"),
                ("available_to", "2026-05-01T00:00"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(count_rows(&server.pool, Artists::Table).await.unwrap(), 2);

    let response = server
        .post_form(
            "/artists/create",
            &[
                ("name", "The Wild Sax Band"),
                ("city", "San Francisco"),
                ("state", "CA"),
                ("available_from", "2026-05-01T00:00"),
                ("available_to", "2026-06-01T00:00"),
                ("genres", "Jazz"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(count_rows(&server.pool, Artists::Table).await.unwrap(), 3);
}

#[tokio::test]
async fn test_booking_database_refused_for_trivia() {
    let guard = tempfile::tempdir().unwrap();
    let db_path = guard.path().join("fyyur.sqlite");

    let pool = prepare_database(&db_path, AppType::Booking, 1).await.unwrap();
    pool.close().await;

    let err = prepare_database(&db_path, AppType::Trivia, 1)
        .await
        .expect_err("app type mismatch must be refused");
    assert!(err.to_string().contains("initialized for 'booking'"));
}
