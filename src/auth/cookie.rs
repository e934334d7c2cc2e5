//! Stores the [Session] in a private (encrypted) cookie between requests.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use cookie::CookieBuilder;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::session::{AuthToken, Session},
};

/// The name of the cookie holding the session.
pub const COOKIE_SESSION: &str = "session";

/// The default duration for which session cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

mod datetime_format {
    //! Specifies how to serialize a [time::OffsetDateTime] in a custom format that
    //! avoids serialisations with datetimes containing midnight.
    //!
    //! The default serializer for [time::OffsetDateTime] will serialize
    //! "00:00:00.000000" as "0:00:00.0" and the deserializer would error out
    //! because it expects the hours to be two digits, not one.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// The contents of the session cookie.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SessionCookie {
    token: String,
    #[serde(with = "datetime_format")]
    expires_at: OffsetDateTime,
}

fn session_cookie(value: String) -> CookieBuilder<'static> {
    // Lax so the cookie survives the redirect back from the Gmail consent screen.
    Cookie::build((COOKIE_SESSION, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
}

/// Write `session` to the session cookie in `jar`.
///
/// An authenticated session is stored with an expiry of `duration` from now
/// in `local_offset`. An anonymous session invalidates the cookie.
///
/// # Errors
///
/// Returns [Error::InvalidSessionCookie] if the cookie could not be serialized
/// or the expiry overflows.
pub fn store_session(
    jar: PrivateCookieJar,
    session: &Session,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    match session.token() {
        Some(token) => {
            let expires_at = OffsetDateTime::now_utc()
                .to_offset(local_offset)
                .checked_add(duration)
                .ok_or_else(|| {
                    Error::InvalidSessionCookie("session expiry overflowed".to_owned())
                })?;

            set_session_cookie(jar, token.as_str(), expires_at)
        }
        None => Ok(invalidate_session_cookie(jar)),
    }
}

fn set_session_cookie(
    jar: PrivateCookieJar,
    token: &str,
    expires_at: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(&SessionCookie {
        token: token.to_owned(),
        expires_at,
    })
    .map_err(|error| Error::InvalidSessionCookie(error.to_string()))?;

    Ok(jar.add(session_cookie(value).expires(expires_at)))
}

fn read_session_cookie(jar: &PrivateCookieJar) -> Result<SessionCookie, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;

    serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidSessionCookie(error.to_string()))
}

/// Read the session stored in `jar`.
///
/// A session whose expiry has passed is returned as [Session::Anonymous].
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no session cookie and
/// [Error::InvalidSessionCookie] if it cannot be decoded.
pub fn get_session(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = read_session_cookie(jar)?;

    if cookie.expires_at <= OffsetDateTime::now_utc() {
        return Ok(Session::Anonymous);
    }

    Ok(Session::default().log_in(AuthToken::new(cookie.token)))
}

/// A cookie that makes the client delete its session cookie.
///
/// Usable where there is no cookie jar, e.g. when converting an [Error] into a response.
pub fn expired_session_cookie() -> Cookie<'static> {
    session_cookie("deleted".to_owned())
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::ZERO)
        .build()
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(expired_session_cookie())
}

/// Set the expiry of the session cookie in `jar` to the latest of now plus
/// `duration` and the cookie's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] if there is no session cookie.
/// - [Error::InvalidSessionCookie] if the cookie cannot be decoded or the new expiry overflows.
pub fn extend_session_cookie_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let cookie = read_session_cookie(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .to_offset(local_offset)
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidSessionCookie("session expiry overflowed".to_owned()))?;

    let expires_at = max(cookie.expires_at, new_expiry);

    set_session_cookie(jar, &cookie.token, expires_at)
}
