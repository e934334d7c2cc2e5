//! Log-out route handler that ends the session and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;
use time::UtcOffset;

use crate::{
    auth::{DEFAULT_COOKIE_DURATION, get_session, invalidate_session_cookie, store_session},
    endpoints,
};

/// Invalidate the session cookie and redirect the client to the log-in page.
///
/// The finance API issues stateless tokens, so there is nothing to revoke remotely.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let session = get_session(&jar).unwrap_or_default().log_out();
    tracing::debug!("Logging out");

    // Storing an anonymous session expires the cookie.
    let jar = store_session(jar.clone(), &session, DEFAULT_COOKIE_DURATION, UtcOffset::UTC)
        .unwrap_or_else(|_| invalidate_session_cookie(jar));

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        auth::{
            AuthToken, COOKIE_SESSION, DEFAULT_COOKIE_DURATION, Session, log_out::get_log_out,
            store_session,
        },
        endpoints,
    };

    #[tokio::test]
    async fn log_out_invalidates_session_cookie_and_redirects() {
        let jar = PrivateCookieJar::new(Key::from(&Sha512::digest("42")));
        let session = Session::default().log_in(AuthToken::new("token"));
        let jar = store_session(jar, &session, DEFAULT_COOKIE_DURATION, UtcOffset::UTC).unwrap();

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_VIEW
        );

        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().unwrap().to_owned()).ok())
            .find(|cookie| cookie.name() == COOKIE_SESSION)
            .expect("session cookie should be set");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
