//! In-memory stand-in for the spreadsheet script, used by adapter tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use serde_json::{json, Map, Value};

use crate::gateway::{build_query, Action, RemoteStore};
use crate::models::coerce::is_truthy;
use crate::{Error, Result};

/// Availability of the fake endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Online,
    /// Configured but unreachable
    Offline,
    /// No endpoint configured at all
    Unconfigured,
}

#[derive(Default)]
struct SheetState {
    sheets: BTreeMap<&'static str, Vec<Map<String, Value>>>,
    next_id: u64,
    calls: Vec<(Action, Value)>,
}

pub struct FakeSheet {
    availability: Mutex<Availability>,
    rejected: Mutex<HashSet<Action>>,
    state: Mutex<SheetState>,
}

impl FakeSheet {
    pub fn online() -> Self {
        Self::with(Availability::Online)
    }

    pub fn offline() -> Self {
        Self::with(Availability::Offline)
    }

    pub fn unconfigured() -> Self {
        Self::with(Availability::Unconfigured)
    }

    fn with(availability: Availability) -> Self {
        Self {
            availability: Mutex::new(availability),
            rejected: Mutex::new(HashSet::new()),
            state: Mutex::new(SheetState::default()),
        }
    }

    pub fn set_availability(&self, availability: Availability) {
        *self.availability.lock().unwrap() = availability;
    }

    /// Make the script answer `{status: "error"}` for `action`.
    pub fn reject(&self, action: Action) {
        self.rejected.lock().unwrap().insert(action);
    }

    /// Insert a raw row as the spreadsheet would hold it.
    pub fn seed(&self, sheet: &'static str, row: Value) {
        let Value::Object(row) = row else {
            panic!("seed rows must be objects");
        };
        self.state
            .lock()
            .unwrap()
            .sheets
            .entry(sheet)
            .or_default()
            .push(row);
    }

    pub fn rows(&self, sheet: &'static str) -> Vec<Map<String, Value>> {
        self.state
            .lock()
            .unwrap()
            .sheets
            .get(sheet)
            .cloned()
            .unwrap_or_default()
    }

    /// Actions that reached the script, in order
    pub fn calls(&self) -> Vec<Action> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(action, _)| *action)
            .collect()
    }

    pub fn last_payload(&self, action: Action) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|(candidate, _)| *candidate == action)
            .map(|(_, payload)| payload.clone())
    }

    fn handle(&self, action: Action, payload: &Value) -> Value {
        let mut state = self.state.lock().unwrap();
        let field = |name: &str| payload.get(name).cloned().unwrap_or(Value::Null);

        match action {
            Action::GetBooks => list(&state, "books"),
            Action::GetGuides => list(&state, "study_guides"),
            Action::GetVotes => list(&state, "voting_options"),
            Action::GetGenreVotes => list(&state, "genre_votes"),
            Action::GetAdmins => Value::Array(
                state
                    .sheets
                    .get("users")
                    .into_iter()
                    .flatten()
                    .filter(|row| row.get("is_admin").is_some_and(is_truthy))
                    .map(|row| row.get("email").cloned().unwrap_or(Value::Null))
                    .collect(),
            ),
            Action::GetUserHistory => {
                let email = field("email");
                Value::Array(
                    state
                        .sheets
                        .get("user_genre_history")
                        .into_iter()
                        .flatten()
                        .filter(|row| row.get("email") == Some(&email))
                        .cloned()
                        .map(Value::Object)
                        .collect(),
                )
            }
            Action::SaveBook => append_row(&mut state, "books", payload),
            Action::SaveGuide => append_row(&mut state, "study_guides", payload),
            Action::SaveVote => append_row(&mut state, "voting_options", payload),
            Action::Vote => {
                increment(&mut state, "voting_options", &field("id"));
                success()
            }
            Action::DeleteBook => {
                remove_row(&mut state, "books", &field("id"));
                success()
            }
            Action::DeleteGuide => {
                remove_row(&mut state, "study_guides", &field("id"));
                success()
            }
            Action::ClearVotes => {
                state.sheets.remove("voting_options");
                success()
            }
            Action::VoteGenre => {
                let id = field("id");
                let sheet = state.sheets.entry("genre_votes").or_default();
                if !sheet.iter().any(|row| row.get("id") == Some(&id)) {
                    let mut row = Map::new();
                    row.insert("id".to_string(), id.clone());
                    row.insert("name".to_string(), field("name"));
                    row.insert("votes".to_string(), json!("0"));
                    sheet.push(row);
                }
                increment(&mut state, "genre_votes", &id);
                let mut history = Map::new();
                history.insert("email".to_string(), field("email"));
                history.insert("genre_name".to_string(), field("name"));
                history.insert("voted_at".to_string(), field("voted_at"));
                state
                    .sheets
                    .entry("user_genre_history")
                    .or_default()
                    .push(history);
                success()
            }
            Action::ResetGenreVotes => {
                state.sheets.remove("genre_votes");
                state.sheets.remove("user_genre_history");
                success()
            }
            Action::SaveProfile => {
                let email = field("email");
                let users = state.sheets.entry("users").or_default();
                if let Some(row) = users.iter_mut().find(|row| row.get("email") == Some(&email)) {
                    row.insert("name".to_string(), field("name"));
                    row.insert("last_active".to_string(), field("last_active"));
                } else {
                    let mut row = Map::new();
                    row.insert("email".to_string(), email);
                    row.insert("name".to_string(), field("name"));
                    row.insert("is_admin".to_string(), json!("FALSE"));
                    row.insert("last_active".to_string(), field("last_active"));
                    users.push(row);
                }
                success()
            }
        }
    }
}

impl RemoteStore for FakeSheet {
    fn is_configured(&self) -> bool {
        *self.availability.lock().unwrap() != Availability::Unconfigured
    }

    async fn call(&self, action: Action, payload: Option<Value>) -> Result<Option<Value>> {
        if *self.availability.lock().unwrap() != Availability::Online {
            return Ok(None);
        }

        // Round-trip through the real query encoding
        let query = build_query(action, payload)?;
        let payload = match query.get(1) {
            Some((_, raw)) => serde_json::from_str(raw)?,
            None => Value::Null,
        };
        self.state
            .lock()
            .unwrap()
            .calls
            .push((action, payload.clone()));

        if self.rejected.lock().unwrap().contains(&action) {
            return Err(Error::Remote(format!("{action}: rejected by test sheet")));
        }

        Ok(Some(self.handle(action, &payload)))
    }
}

fn success() -> Value {
    json!({"status": "success"})
}

fn list(state: &SheetState, sheet: &str) -> Value {
    Value::Array(
        state
            .sheets
            .get(sheet)
            .into_iter()
            .flatten()
            .cloned()
            .map(Value::Object)
            .collect(),
    )
}

/// Store a row the way the sheet would: flags as `TRUE`/`FALSE`, numbers as text.
fn append_row(state: &mut SheetState, sheet: &'static str, payload: &Value) -> Value {
    state.next_id += 1;
    let id = format!("r{}", state.next_id);

    let mut row = Map::new();
    row.insert("id".to_string(), json!(id));
    if let Value::Object(fields) = payload {
        for (key, value) in fields {
            if key == "action" || key == "id" {
                continue;
            }
            let cell = match value {
                Value::Bool(flag) => json!(if *flag { "TRUE" } else { "FALSE" }),
                Value::Number(number) => json!(number.to_string()),
                other => other.clone(),
            };
            row.insert(key.clone(), cell);
        }
    }
    if sheet == "voting_options" {
        row.insert("votes".to_string(), json!("0"));
    }
    state.sheets.entry(sheet).or_default().push(row);

    json!({"status": "success", "id": id})
}

fn increment(state: &mut SheetState, sheet: &str, id: &Value) {
    let Some(rows) = state.sheets.get_mut(sheet) else {
        return;
    };
    if let Some(row) = rows.iter_mut().find(|row| row.get("id") == Some(id)) {
        let votes = row
            .get("votes")
            .and_then(|votes| match votes {
                Value::String(text) => text.parse::<u64>().ok(),
                other => other.as_u64(),
            })
            .unwrap_or(0);
        row.insert("votes".to_string(), json!((votes + 1).to_string()));
    }
}

fn remove_row(state: &mut SheetState, sheet: &str, id: &Value) {
    if let Some(rows) = state.sheets.get_mut(sheet) {
        rows.retain(|row| row.get("id") != Some(id));
    }
}
