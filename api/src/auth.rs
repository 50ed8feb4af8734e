//! Role gating for the staff views. Identity comes from the external auth provider;
//! here we only look up the profile and compare roles.

use crate::client::LeagueStore;
use crate::retry::RetryPolicy;
use crate::{StoreError, UserProfile};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Coach,
    Scorekeeper,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::Scorekeeper => "scorekeeper",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "coach" => Ok(Role::Coach),
            "scorekeeper" => Ok(Role::Scorekeeper),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("not signed in")]
    NotSignedIn,

    #[error("no user profile for {uid}")]
    ProfileMissing { uid: String },

    #[error("{required} access required, signed in as {}", .actual.as_deref().unwrap_or("no role"))]
    WrongRole {
        required: Role,
        actual: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

const PROTECTED: [(&str, Role); 3] = [
    ("/admin", Role::Admin),
    ("/coach", Role::Coach),
    ("/scorekeeper-v2", Role::Scorekeeper),
];

/// Role a page path requires, if any. `/coach`, `/coach/` and `/coach.html` are the same page.
pub fn protected_route(path: &str) -> Option<Role> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".html").unwrap_or(path);
    PROTECTED
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(path))
        .map(|(_, role)| *role)
}

/// Look up the signed-in user's profile and check the role. Permission-denied reads are
/// retried with backoff: right after sign-in the store may not accept the new token yet.
pub async fn authorize<S: LeagueStore>(
    store: &S,
    uid: Option<&str>,
    required: Role,
    policy: &RetryPolicy,
) -> Result<UserProfile, AccessError> {
    let uid = uid.map(str::trim).filter(|u| !u.is_empty()).ok_or(AccessError::NotSignedIn)?;

    let profile = policy
        .run("user profile lookup", move || store.fetch_user_profile(uid), StoreError::is_permission_denied)
        .await
        .map_err(|e| match e {
            StoreError::NotFound(_) => AccessError::ProfileMissing { uid: uid.to_owned() },
            other => AccessError::Store(other),
        })?;

    let actual = profile.role.as_deref().and_then(|r| r.parse::<Role>().ok());
    if actual != Some(required) {
        return Err(AccessError::WrongRole {
            required,
            actual: profile.role.clone(),
        });
    }
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    fn profile(uid: &str, role: &str) -> UserProfile {
        UserProfile {
            uid: uid.into(),
            role: Some(role.into()),
            display_name: uid.into(),
            ..Default::default()
        }
    }

    #[test]
    fn protected_paths_map_to_roles() {
        assert_eq!(protected_route("/admin"), Some(Role::Admin));
        assert_eq!(protected_route("/admin.html"), Some(Role::Admin));
        assert_eq!(protected_route("/coach/"), Some(Role::Coach));
        assert_eq!(protected_route("/scorekeeper-v2.html?game=12"), Some(Role::Scorekeeper));
        assert_eq!(protected_route("/standings"), None);
        assert_eq!(protected_route("/"), None);
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Coach".parse::<Role>(), Ok(Role::Coach));
        assert!("referee".parse::<Role>().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn permission_lag_is_retried() {
        let store = InMemoryStore::default().with_user(profile("u1", "coach"));
        store.deny_profile_reads(2);
        let p = authorize(&store, Some("u1"), Role::Coach, &RetryPolicy::default())
            .await
            .unwrap();
        assert_eq!(p.uid, "u1");
        assert_eq!(store.reads(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_denial_gives_up() {
        let store = InMemoryStore::default().with_user(profile("u1", "coach"));
        store.deny_profile_reads(10);
        let err = authorize(&store, Some("u1"), Role::Coach, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Store(StoreError::PermissionDenied { .. })));
        assert_eq!(store.reads(), 4);
    }

    #[tokio::test]
    async fn wrong_role_and_missing_profile() {
        let store = InMemoryStore::default().with_user(profile("u1", "scorekeeper"));
        let err = authorize(&store, Some("u1"), Role::Admin, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::WrongRole { required: Role::Admin, .. }));
        assert_eq!(err.to_string(), "admin access required, signed in as scorekeeper");

        let err = authorize(&store, Some("ghost"), Role::Admin, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::ProfileMissing { .. }));
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn anonymous_users_are_rejected_without_a_read() {
        let store = InMemoryStore::default();
        let err = authorize(&store, None, Role::Coach, &RetryPolicy::none()).await.unwrap_err();
        assert!(matches!(err, AccessError::NotSignedIn));
        assert_eq!(store.reads(), 0);
    }
}
