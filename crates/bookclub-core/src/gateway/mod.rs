//! Client for the remote spreadsheet script endpoint.
//!
//! Every request is a GET carrying `action=<name>` and, when there is one, a
//! `payload=<json>` query parameter.

use std::fmt;

use serde_json::{Map, Value};

use crate::util::compact_text;
use crate::{Error, Result};

/// Actions understood by the remote script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetBooks,
    GetGuides,
    GetVotes,
    GetGenreVotes,
    GetAdmins,
    GetUserHistory,
    SaveBook,
    SaveGuide,
    SaveVote,
    Vote,
    DeleteBook,
    DeleteGuide,
    ClearVotes,
    VoteGenre,
    ResetGenreVotes,
    SaveProfile,
}

impl Action {
    /// Wire name of the action
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetBooks => "getBooks",
            Self::GetGuides => "getGuides",
            Self::GetVotes => "getVotes",
            Self::GetGenreVotes => "getGenreVotes",
            Self::GetAdmins => "getAdmins",
            Self::GetUserHistory => "getUserHistory",
            Self::SaveBook => "saveBook",
            Self::SaveGuide => "saveGuide",
            Self::SaveVote => "saveVote",
            Self::Vote => "vote",
            Self::DeleteBook => "deleteBook",
            Self::DeleteGuide => "deleteGuide",
            Self::ClearVotes => "clearVotes",
            Self::VoteGenre => "voteGenre",
            Self::ResetGenreVotes => "resetGenreVotes",
            Self::SaveProfile => "saveProfile",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The remote system of record, as seen by the entity adapters.
///
/// `Ok(None)` means the store is unavailable (not configured, unreachable, or
/// answered with a bad status); callers fall back to the local mirror.
/// `Err(Error::Remote)` means the store answered and rejected the action.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Whether an endpoint exists at all (false in local-only mode)
    fn is_configured(&self) -> bool;

    /// Issue one action, exactly once
    async fn call(&self, action: Action, payload: Option<Value>) -> Result<Option<Value>>;
}

/// HTTP implementation of [`RemoteStore`] for the spreadsheet script.
#[derive(Clone, Debug)]
pub struct ScriptGateway {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl ScriptGateway {
    /// Create a gateway; `None` yields a gateway that never sends requests.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().build()?,
        })
    }
}

impl RemoteStore for ScriptGateway {
    fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn call(&self, action: Action, payload: Option<Value>) -> Result<Option<Value>> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!(%action, "No remote endpoint configured, skipping request");
            return Ok(None);
        };

        let query = build_query(action, payload)?;
        tracing::debug!(%action, "Sending remote store request");

        let response = match self
            .client
            .get(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%action, "Remote store unreachable: {error}");
                return Ok(None);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%action, "Failed to read remote store response: {error}");
                return Ok(None);
            }
        };

        if !status.is_success() {
            tracing::warn!(
                %action,
                "Remote store returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            );
            return Ok(None);
        }

        decode_response(action, &body)
    }
}

/// Build the query parameters for an action.
///
/// The payload, when present, must be a JSON object. It is sent with the
/// action name merged in, so the script can dispatch on either parameter.
pub fn build_query(action: Action, payload: Option<Value>) -> Result<Vec<(&'static str, String)>> {
    let mut query = vec![("action", action.as_str().to_string())];

    let fields = match payload {
        None => return Ok(query),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(Error::InvalidInput(format!(
                "payload for {action} must be a JSON object, got {other}"
            )))
        }
    };

    let mut merged = Map::new();
    merged.insert("action".to_string(), Value::from(action.as_str()));
    for (key, value) in fields {
        if key != "action" {
            merged.insert(key, value);
        }
    }
    query.push(("payload", Value::Object(merged).to_string()));
    Ok(query)
}

/// Decode a 2xx response body.
///
/// Error-tagged bodies become [`Error::Remote`]; bodies that are not JSON are
/// treated as an unavailable store. Objects with a `data` field are unwrapped.
pub fn decode_response(action: Action, body: &str) -> Result<Option<Value>> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                %action,
                "Remote store returned a non-JSON body ({error}): {}",
                compact_text(body)
            );
            return Ok(None);
        }
    };

    if let Value::Object(object) = &value {
        let is_error = object
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|status| status.eq_ignore_ascii_case("error"));
        if is_error {
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| "unknown error".to_string(), compact_text);
            return Err(Error::Remote(format!("{action}: {message}")));
        }

        if let Some(data) = object.get("data") {
            return Ok(Some(data.clone()));
        }
    }

    Ok(Some(value))
}
