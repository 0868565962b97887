//! One-shot flash messages carried in a cookie across a redirect.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use cookie::{Cookie, SameSite};

use crate::constants::FLASH_COOKIE;

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn append_cookie(response: &mut Response, cookie: Cookie<'static>) {
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

/// The pending flash message, if the request carries one
pub fn read(jar: &CookieJar) -> Option<String> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .map(|message| message.into_owned())
        .filter(|message| !message.is_empty())
}

/// 303 to `location`, leaving `message` for the next page
pub fn redirect(location: &str, message: &str) -> Response {
    let mut response = Redirect::to(location).into_response();
    append_cookie(&mut response, flash_cookie(urlencoding::encode(message).into_owned()));
    response
}

/// Wrap a rendered page, expiring the flash cookie once it has been shown
pub fn page(status: StatusCode, shown_flash: bool, html: String) -> Response {
    let mut response = (status, Html(html)).into_response();
    if shown_flash {
        let mut cookie = flash_cookie(String::new());
        cookie.make_removal();
        append_cookie(&mut response, cookie);
    }
    response
}
