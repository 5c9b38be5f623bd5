//! Session context: the stored bearer token and who may touch it
//!
//! Only the login and logout flows write the session; request signing and the
//! route guard only read it.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// Key under which the token is persisted
pub const TOKEN_KEY: &str = "hospitalToken";

/// Opaque bearer credential issued by the server
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Persistence for the single session token
pub trait SessionStore: Send + Sync {
    fn load(&self) -> crate::Result<Option<BearerToken>>;
    fn save(&self, token: &BearerToken) -> crate::Result<()>;
    fn clear(&self) -> crate::Result<()>;
}

/// Process-local store, used by tests and short-lived sessions
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<BearerToken>>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(BearerToken::new(token))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> crate::Result<Option<BearerToken>> {
        let token = self
            .token
            .read()
            .map_err(|_| crate::DashboardError::InvalidState("session lock poisoned".into()))?;
        Ok(token.clone())
    }

    fn save(&self, token: &BearerToken) -> crate::Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| crate::DashboardError::InvalidState("session lock poisoned".into()))?;
        *slot = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|_| crate::DashboardError::InvalidState("session lock poisoned".into()))?;
        *slot = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    #[serde(rename = "hospitalToken")]
    token: BearerToken,
}

/// Store that keeps the token in a small JSON file under [`TOKEN_KEY`]
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> crate::Result<Option<BearerToken>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: TokenFile = serde_json::from_str(&content)?;
        Ok(Some(file.token))
    }

    fn save(&self, token: &BearerToken) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&TokenFile {
            token: token.clone(),
        })?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("Session token written to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> crate::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Session token removed from {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Injected handle to the current session
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A context with nothing stored and nowhere to persist to
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Current non-empty token, read at call time
    ///
    /// A store that cannot be read counts as signed out.
    pub fn bearer(&self) -> Option<BearerToken> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_some()
    }

    pub(crate) fn sign_in(&self, token: BearerToken) -> crate::Result<()> {
        self.store.save(&token)
    }

    pub(crate) fn sign_out(&self) -> crate::Result<()> {
        self.store.clear()
    }
}
