//! HTTP handlers for the security endpoints.

mod callback;
mod login;
mod logout;

pub use callback::{callback_form, callback_query, CallbackForm, CallbackQuery};
pub use login::login;
pub use logout::logout;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Build a `302 Found` redirect.
///
/// The wire contract pins 302 for flow redirects (and 303 for logout);
/// axum's `Redirect` helpers emit 307, which cooperating OIDC clients do
/// not replay as GET.
pub(crate) fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// Build a `302 Found` redirect that also sets a cookie.
pub(crate) fn found_with_cookie(location: &str, cookie: &str) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie.to_string()),
        ],
    )
        .into_response()
}

/// Build a `303 See Other` redirect that also sets a cookie.
pub(crate) fn see_other_with_cookie(location: &str, cookie: &str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie.to_string()),
        ],
    )
        .into_response()
}
