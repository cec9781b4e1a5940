//! Current member record and admin lookup

use serde_json::{json, Value};

use crate::db::{LocalMirror, MirrorKey};
use crate::gateway::{Action, RemoteStore};
use crate::models::coerce::is_truthy;
use crate::models::{Session, GUEST_NAME};
use crate::util::{emails_match, rfc3339_now};
use crate::Result;

pub struct Profiles<'a, R> {
    remote: &'a R,
    mirror: &'a LocalMirror,
    master_admin_email: Option<&'a str>,
}

impl<'a, R: RemoteStore> Profiles<'a, R> {
    pub const fn new(
        remote: &'a R,
        mirror: &'a LocalMirror,
        master_admin_email: Option<&'a str>,
    ) -> Self {
        Self {
            remote,
            mirror,
            master_admin_email,
        }
    }

    /// The member saved on this device, or a guest session.
    ///
    /// Older records hold only the display name as a bare string.
    pub async fn current_user(&self) -> Result<Session> {
        let Some(raw) = self.mirror.get_raw(MirrorKey::CurrentUser).await? else {
            return Ok(Session::guest());
        };

        let session = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::String(name)) => Session::new(name, ""),
            Ok(value @ Value::Object(_)) => match serde_json::from_value::<Session>(value) {
                Ok(session) => session,
                Err(error) => {
                    tracing::warn!("Ignoring unreadable current user record: {error}");
                    Session::guest()
                }
            },
            Ok(_) => Session::guest(),
            Err(_) => Session::new(raw, ""),
        };

        if session.name.is_empty() {
            return Ok(Session::new(GUEST_NAME, session.email));
        }
        Ok(session)
    }

    /// Save the member for this device. Local only.
    pub async fn set_current_user(&self, session: Session) -> Result<Session> {
        let session = Session::new(session.name, session.email);
        session.validate()?;
        self.mirror.put(MirrorKey::CurrentUser, &session).await?;
        tracing::info!("Current user set to {}", session.name);
        Ok(session)
    }

    /// Upsert the member's row in the remote `users` sheet.
    ///
    /// Skipped without an email; failures are only logged.
    pub async fn sync_profile(&self, session: &Session) {
        if !session.has_email() {
            tracing::debug!("Skipping profile sync for a member without an email");
            return;
        }

        let payload = json!({
            "email": session.email,
            "name": session.name,
            "last_active": rfc3339_now(),
        });
        if let Err(error) = self.remote.call(Action::SaveProfile, Some(payload)).await {
            tracing::error!(action = %Action::SaveProfile, "Profile sync failed: {error}");
        }
    }

    /// Whether the session's member may run admin operations.
    ///
    /// Asks the remote store on every call.
    pub async fn is_admin(&self, session: &Session) -> bool {
        let email = session.email.trim();
        if email.is_empty() {
            return false;
        }
        if self
            .master_admin_email
            .is_some_and(|master| emails_match(master, email))
        {
            return true;
        }

        match self.remote.call(Action::GetAdmins, None).await {
            Ok(Some(Value::Array(admins))) => admins.iter().any(|admin| listed_admin(admin, email)),
            Ok(Some(other)) => {
                tracing::warn!(action = %Action::GetAdmins, "Expected a list of admins, got {other}");
                false
            }
            Ok(None) => false,
            Err(error) => {
                tracing::error!(action = %Action::GetAdmins, "Admin lookup failed: {error}");
                false
            }
        }
    }
}

/// Admin lists hold either bare emails or user rows.
fn listed_admin(admin: &Value, email: &str) -> bool {
    match admin {
        Value::String(admin) => emails_match(admin, email),
        Value::Object(row) => {
            row.get("email")
                .and_then(Value::as_str)
                .is_some_and(|admin| emails_match(admin, email))
                && row.get("is_admin").is_none_or(is_truthy)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::FakeSheet;

    /// Remote store that answers every call with the same body
    struct Fixed(Value);

    impl RemoteStore for Fixed {
        fn is_configured(&self) -> bool {
            true
        }

        async fn call(&self, _action: Action, _payload: Option<Value>) -> Result<Option<Value>> {
            Ok(Some(self.0.clone()))
        }
    }

    fn ann() -> Session {
        Session::new("Ann", "ann@example.com")
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn current_user_defaults_to_guest() {
        let sheet = FakeSheet::unconfigured();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let user = Profiles::new(&sheet, &mirror, None).current_user().await.unwrap();
        assert_eq!(user, Session::guest());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_current_user_round_trips() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, None);

        profiles.set_current_user(ann()).await.unwrap();
        assert_eq!(profiles.current_user().await.unwrap(), ann());
        assert!(sheet.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_current_user_rejects_bad_email() {
        let sheet = FakeSheet::unconfigured();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, None);

        assert!(profiles
            .set_current_user(Session::new("Ann", "not-an-email"))
            .await
            .is_err());
        assert_eq!(profiles.current_user().await.unwrap(), Session::guest());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn legacy_plain_name_record_is_read_as_name() {
        let sheet = FakeSheet::unconfigured();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, None);

        mirror.put(MirrorKey::CurrentUser, "Ann").await.unwrap();
        assert_eq!(profiles.current_user().await.unwrap(), Session::new("Ann", ""));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_profile_upserts_user_row() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, None);

        profiles.sync_profile(&ann()).await;
        profiles.sync_profile(&Session::new("Ann B", "ann@example.com")).await;

        let users = sheet.rows("users");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["name"], json!("Ann B"));
        assert!(users[0]["last_active"].is_string());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sync_profile_skips_members_without_email() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        Profiles::new(&sheet, &mirror, None)
            .sync_profile(&Session::guest())
            .await;
        assert!(sheet.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn master_admin_matches_without_remote_call() {
        let sheet = FakeSheet::online();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, Some("chair@bookclub.org"));

        assert!(profiles.is_admin(&Session::new("Chair", "Chair@BookClub.org")).await);
        assert!(sheet.calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn listed_admins_are_matched_case_insensitively() {
        let sheet = FakeSheet::online();
        sheet.seed("users", json!({"email": "ann@example.com", "name": "Ann", "is_admin": "TRUE"}));
        sheet.seed("users", json!({"email": "bo@example.com", "name": "Bo", "is_admin": "FALSE"}));
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let profiles = Profiles::new(&sheet, &mirror, None);

        assert!(profiles.is_admin(&Session::new("Ann", "ANN@example.com")).await);
        assert!(!profiles.is_admin(&Session::new("Bo", "bo@example.com")).await);
        assert!(!profiles.is_admin(&Session::guest()).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn admin_rows_honor_their_flag() {
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        let remote = Fixed(json!([
            {"email": "ann@example.com"},
            {"email": "bo@example.com", "is_admin": "FALSE"},
            {"email": "cy@example.com", "is_admin": true},
        ]));
        let profiles = Profiles::new(&remote, &mirror, None);

        assert!(profiles.is_admin(&ann()).await);
        assert!(!profiles.is_admin(&Session::new("Bo", "bo@example.com")).await);
        assert!(profiles.is_admin(&Session::new("Cy", "cy@example.com")).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_remote_means_not_admin() {
        let sheet = FakeSheet::offline();
        let mirror = LocalMirror::open_in_memory().await.unwrap();
        assert!(!Profiles::new(&sheet, &mirror, None).is_admin(&ann()).await);
    }
}
