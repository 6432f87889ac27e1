//! Hash admission and lookup handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap},
};
use hasher_core::{Payload, Ticket};

use super::error::ApiError;
use crate::state::AppState;

/// Form field holding the value to hash.
const PASSWORD_FIELD: &[u8] = b"password";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// POST /hash
///
/// Issue a ticket and start hashing in the background. The body is the
/// ticket number as plain text.
pub async fn admit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<String, ApiError> {
    // Input is not validated; a missing field hashes the empty string.
    let password = if is_form(&headers) {
        first_form_value(&body, PASSWORD_FIELD)
    } else {
        None
    }
    .or_else(|| {
        query
            .as_deref()
            .and_then(|q| first_form_value(q.as_bytes(), PASSWORD_FIELD))
    })
    .unwrap_or_default();

    let ticket = state.service().admit(Payload::new(password))?;
    Ok(ticket.to_string())
}

/// GET /hash/{*id}
///
/// Return the digest for a ticket, or 404 while it is pending or unknown.
pub async fn lookup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::InvalidTicketId(id.clone()))?;

    // Negative ids are well-formed but can never have been issued.
    let ticket = u64::try_from(id)
        .map(Ticket::new)
        .map_err(|_| ApiError::NotFound)?;

    state.service().lookup(ticket).ok_or(ApiError::NotFound)
}

/// GET /hash/
///
/// An empty id is not an integer.
pub async fn lookup_missing_id() -> ApiError {
    ApiError::InvalidTicketId(String::new())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decoded value of the first `name` pair in an url-encoded form.
///
/// Works on bytes: values that are not UTF-8 are kept as sent.
fn first_form_value(input: &[u8], name: &[u8]) -> Option<Vec<u8>> {
    input
        .split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let mut parts = pair.splitn(2, |b| *b == b'=');
            let key = parts.next().map(decode_component)?;
            if key != name {
                return None;
            }
            Some(parts.next().map(decode_component).unwrap_or_default())
        })
}

fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    urlencoding::decode_binary(&spaced).into_owned()
}
