//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! Credentials are checked by the finance API, which hands back the token stored in the session.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    alert::Alert,
    api::ApiClient,
    auth::{Session, invalidate_session_cookie, normalize_redirect_url, store_session},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, labelled_input, loading_spinner, log_in_register,
        password_input,
    },
    timezone::get_local_offset,
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";
const UNAVAILABLE_ERROR_MSG: &str =
    "Could not reach the finance service. Please try again later.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

/// How long the session cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (labelled_input("email", "email", "Email", email, None))
            (password_input("password", "Password", "", error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogInQuery {
    pub redirect_url: Option<String>,
    /// Set after a successful registration.
    pub registered: Option<bool>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());

    let content = html! {
        @if query.registered == Some(true) {
            div class="flex justify-center px-6 pt-8" {
                div class="w-full sm:max-w-md" {
                    (Alert::SuccessSimple {
                        message: "Account created. You can now log in.".to_owned(),
                    }.into_html())
                }
            }
        }

        (log_in_register("Log in to your account", &log_in_form))
    };

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// Checks the credentials.
    pub api_client: ApiClient,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            api_client: state.api_client.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,

    pub password: String,

    /// Whether to extend the initial session cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookie is set and the client
/// is redirected to the dashboard page, or the page they were sent from.
/// Otherwise, the form is returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let email = user_data.email.trim();

    let token = match state.api_client.log_in(email, &user_data.password).await {
        Ok(token) => token,
        Err(Error::InvalidCredentials) => {
            return log_in_form(email, Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
                .into_response();
        }
        Err(Error::Network(error)) => {
            tracing::error!("Could not reach the finance API to log in: {error}");
            return log_in_form(email, Some(UNAVAILABLE_ERROR_MSG), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(email, Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);
    let session = Session::default().log_in(token);

    match store_session(jar.clone(), &session, cookie_duration, local_offset) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(redirect_url.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting session cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::{extract::Query, http::StatusCode};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document, select_text,
        },
    };

    use super::{LogInQuery, get_log_in_page};

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page(Query(LogInQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_input(&form, "remember_me", "checkbox");
        assert!(select_text(&document, "[role=alert]").is_empty());
    }

    #[tokio::test]
    async fn log_in_page_preserves_redirect_url() {
        let redirect_url = "/transactions?page=2&description=rent";
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: Some(redirect_url.to_owned()),
            registered: None,
        }))
        .await;

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_eq!(assert_form_input(&form, "redirect_url", "hidden"), redirect_url);
    }

    #[tokio::test]
    async fn log_in_page_drops_external_redirect_url() {
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: Some("https://evil.example".to_owned()),
            registered: None,
        }))
        .await;

        let document = parse_html_document(response).await;
        let selector = scraper::Selector::parse("input[name=redirect_url]").unwrap();
        assert_eq!(document.select(&selector).count(), 0);
    }

    #[tokio::test]
    async fn log_in_page_confirms_registration() {
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: None,
            registered: Some(true),
        }))
        .await;

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let alerts = select_text(&document, "[role=alert] p");
        assert!(
            alerts.iter().any(|text| text.contains("Account created")),
            "got alerts {alerts:?}"
        );
    }
}

#[cfg(test)]
mod log_in_tests {
    use axum::{
        Json, Router,
        http::StatusCode,
        response::IntoResponse,
        routing::post,
    };
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        auth::{COOKIE_SESSION, DEFAULT_COOKIE_DURATION},
        endpoints,
        test_utils::{
            assert_form_input, fake_app_state, must_get_form, select_text, unreachable_api_client,
        },
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, REMEMBER_ME_COOKIE_DURATION, UNAVAILABLE_ERROR_MSG,
        post_log_in,
    };

    fn fake_auth_routes() -> Router {
        Router::new().route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "ana@example.com" && body["password"] == "hunter2" {
                    Json(json!({"token": "jwt-token"})).into_response()
                } else {
                    StatusCode::UNAUTHORIZED.into_response()
                }
            }),
        )
    }

    async fn test_server() -> TestServer {
        let state = fake_app_state(fake_auth_routes()).await;
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr$(,)?) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(2),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = test_server().await;
        let form = [("email", "ana@example.com"), ("password", "hunter2")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);
        let cookie = response.cookie(COOKIE_SESSION);
        assert_date_time_close!(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let server = test_server().await;
        let form = [
            ("email", "ana@example.com"),
            ("password", "hunter2"),
            ("redirect_url", "/transactions?page=2"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.header(HX_REDIRECT), "/transactions?page=2");
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let server = test_server().await;
        let form = [
            ("email", "ana@example.com"),
            ("password", "hunter2"),
            ("redirect_url", "https://example.com"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        assert_eq!(response.header(HX_REDIRECT), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn remember_me_extends_session_cookie() {
        let server = test_server().await;
        let form = [
            ("email", "ana@example.com"),
            ("password", "hunter2"),
            ("remember_me", "on"),
        ];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        let cookie = response.cookie(COOKIE_SESSION);
        assert_date_time_close!(
            cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + REMEMBER_ME_COOKIE_DURATION
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let server = test_server().await;
        let form = [("email", "ana@example.com"), ("password", "wrong")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_SESSION).is_none());
        let fragment = scraper::Html::parse_fragment(&response.text());
        let error = select_text(&fragment, "p.text-red-500");
        assert_eq!(error, [INVALID_CREDENTIALS_ERROR_MSG]);
        // The email is kept so the user only has to retype the password.
        let form = must_get_form(&fragment);
        assert_eq!(assert_form_input(&form, "email", "email"), "ana@example.com");
    }

    #[tokio::test]
    async fn log_in_reports_unreachable_finance_service() {
        let mut state = fake_app_state(Router::new()).await;
        state.api_client = unreachable_api_client();
        let app = Router::new()
            .route(endpoints::LOG_IN_API, post(post_log_in))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");
        let form = [("email", "ana@example.com"), ("password", "hunter2")];

        let response = server.post(endpoints::LOG_IN_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains(UNAVAILABLE_ERROR_MSG);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_fields() {
        let server = test_server().await;

        server
            .post(endpoints::LOG_IN_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
