#![allow(missing_docs)]

mod fake_api;
mod html;

pub(crate) use fake_api::{fake_app_state, spawn_fake_api, unreachable_api_client};
pub(crate) use html::{
    assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
    parse_html_fragment, select_text,
};
