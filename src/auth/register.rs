//! The registration page for creating an account with the finance API.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, labelled_input, loading_spinner, log_in_register,
        password_input,
    },
};

const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";

/// The values entered into the registration form.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Error messages to show next to the fields of the registration form.
#[derive(Debug, Default)]
struct FormErrors<'a> {
    email: Option<&'a str>,
    confirm_password: Option<&'a str>,
    form: Option<&'a str>,
}

fn registration_form(values: &RegisterForm, errors: FormErrors<'_>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("text", "name", "Name", &values.name, None))
            (labelled_input("email", "email", "Email", &values.email, errors.email))
            (password_input("password", "Password", &values.password, None))
            (password_input(
                "confirm_password",
                "Confirm Password",
                "",
                errors.confirm_password,
            ))

            @if let Some(message) = errors.form {
                p class="text-red-500 text-base" { (message) }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form(&RegisterForm::default(), FormErrors::default());
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// Create an account and send the user to the log-in page.
///
/// The form is returned with an error message if the passwords do not match
/// or the finance API refuses the registration.
pub async fn register_user(
    State(state): State<AppState>,
    Form(mut user_data): Form<RegisterForm>,
) -> Response {
    user_data.name = user_data.name.trim().to_owned();
    user_data.email = user_data.email.trim().to_owned();

    if user_data.password != user_data.confirm_password {
        return registration_form(
            &user_data,
            FormErrors {
                confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
                ..Default::default()
            },
        )
        .into_response();
    }

    let result = state
        .api_client
        .register(&user_data.name, &user_data.email, &user_data.password)
        .await;

    match result {
        Ok(()) => {
            tracing::info!("Registered a new account");
            (
                StatusCode::SEE_OTHER,
                HxRedirect(format!("{}?registered=true", endpoints::LOG_IN_VIEW)),
                (),
            )
                .into_response()
        }
        Err(Error::EmailTaken(message)) => {
            let message = if message.is_empty() {
                "This email is already registered.".to_owned()
            } else {
                message
            };

            registration_form(
                &user_data,
                FormErrors {
                    email: Some(&message),
                    ..Default::default()
                },
            )
            .into_response()
        }
        Err(Error::Api { message, .. }) if !message.is_empty() => registration_form(
            &user_data,
            FormErrors {
                form: Some(&message),
                ..Default::default()
            },
        )
        .into_response(),
        Err(error) => {
            tracing::error!("Could not register user: {error}");
            registration_form(
                &user_data,
                FormErrors {
                    form: Some("Could not create your account. Please try again later."),
                    ..Default::default()
                },
            )
            .into_response()
        }
    }
}
