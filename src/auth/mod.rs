//! Sessions, the session cookie, the auth guards and the log-in, registration and log-out pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod session;

pub use cookie::{
    COOKIE_SESSION, DEFAULT_COOKIE_DURATION, expired_session_cookie, get_session,
    invalidate_session_cookie, store_session,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use redirect::{build_log_in_redirect_url, normalize_redirect_url};
pub use register::{get_register_page, register_user};
pub use session::{AuthToken, Session};
