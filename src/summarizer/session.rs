use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const LOGIN_ENTRY_POINT: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    #[default]
    Unknown,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    pub user: Option<User>,
    #[serde(skip)]
    pub loading: Loading,
    #[serde(default)]
    pub credentials: Vec<String>,
}

impl Session {
    pub fn authenticated(user: User, credentials: Vec<String>) -> Self {
        Self {
            user: Some(user),
            loading: Loading::Resolved,
            credentials,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: Loading::Resolved,
            credentials: Vec::new(),
        }
    }

    pub fn cookie_header(&self) -> Option<String> {
        if self.credentials.is_empty() {
            None
        } else {
            Some(self.credentials.join("; "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Loading,
    Redirect { to: &'static str },
    Admit,
}

pub fn gate(session: &Session) -> GateVerdict {
    match (session.loading, session.user.as_ref()) {
        (Loading::Unknown, _) => GateVerdict::Loading,
        (Loading::Resolved, None) => GateVerdict::Redirect {
            to: LOGIN_ENTRY_POINT,
        },
        (Loading::Resolved, Some(_)) => GateVerdict::Admit,
    }
}

// Missing file: anonymous.
pub fn load(file: &Path) -> Result<Session> {
    if !file.exists() {
        return Ok(Session::anonymous());
    }

    let raw =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let mut parsed: Session = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    parsed.loading = Loading::Resolved;
    Ok(parsed)
}

pub fn save(file: &Path, session: &Session) -> Result<()> {
    let parent = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let data = serde_json::to_string_pretty(session)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    tmp.write_all(format!("{data}\n").as_bytes())?;
    tmp.persist(file)
        .with_context(|| format!("failed to write {}", file.display()))?;
    Ok(())
}

pub fn clear(file: &Path) -> Result<bool> {
    if !file.exists() {
        return Ok(false);
    }
    fs::remove_file(file).with_context(|| format!("failed to remove {}", file.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn alice() -> User {
        User {
            name: Some("Alice".into()),
            email: Some("alice@example.com".into()),
        }
    }

    #[test]
    fn unresolved_session_shows_loading_even_with_user() {
        let session = Session {
            user: Some(alice()),
            loading: Loading::Unknown,
            credentials: Vec::new(),
        };
        assert_eq!(gate(&session), GateVerdict::Loading);
        assert_eq!(gate(&Session::default()), GateVerdict::Loading);
    }

    #[test]
    fn resolved_without_user_redirects_to_login() {
        assert_eq!(
            gate(&Session::anonymous()),
            GateVerdict::Redirect { to: "/login" }
        );
    }

    #[test]
    fn resolved_with_user_is_admitted() {
        let session = Session::authenticated(alice(), vec!["sid=abc".into()]);
        assert_eq!(gate(&session), GateVerdict::Admit);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User {
            name: None,
            email: Some("bob@example.com".into()),
        };
        assert_eq!(user.display_name(), "bob@example.com");
        assert_eq!(alice().display_name(), "Alice");
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let session =
            Session::authenticated(alice(), vec!["sid=abc".into(), "csrf=xyz".into()]);
        assert_eq!(session.cookie_header().as_deref(), Some("sid=abc; csrf=xyz"));
        assert_eq!(Session::anonymous().cookie_header(), None);
    }

    #[test]
    fn saved_session_loads_resolved() {
        let tmp = tempdir().expect("tempdir");
        let file = tmp.path().join("nested/session.json");
        let session = Session::authenticated(alice(), vec!["sid=abc".into()]);

        save(&file, &session).expect("save");
        let loaded = load(&file).expect("load");
        assert_eq!(loaded, session);
        assert_eq!(gate(&loaded), GateVerdict::Admit);

        assert!(clear(&file).expect("clear"));
        assert_eq!(gate(&load(&file).expect("reload")), GateVerdict::Redirect { to: "/login" });
        assert!(!clear(&file).expect("second clear"));
    }
}
