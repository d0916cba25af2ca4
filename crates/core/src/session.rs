//! Session persistence
//!
//! The session lives in a small key-value store under three keys: the bearer
//! token, the serialized user and the role string. [`SessionStore`] is the
//! seam; [`MemoryStore`] and [`FileStore`] are the two backends shipped here.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

use crate::ids::opt_string_or_number;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "cw_token";
/// Key holding the JSON-serialized user
pub const USER_KEY: &str = "cw_user";
/// Key holding the role string
pub const ROLE_KEY: &str = "cw_user_role";

/// Session store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Anything other than `admin` is a regular user
    pub fn parse(value: &str) -> Self {
        if value.trim() == "admin" {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawUser")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Wire shape of [`User`]; every field may be missing or `null`
#[derive(Deserialize)]
struct RawUser {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "opt_string_or_number")]
    object_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id.or(raw.object_id).unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            role: raw.role.as_deref().map(Role::parse).unwrap_or_default(),
        }
    }
}

/// Bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Expiry of the token, when it is a JWT carrying an `exp` claim
    ///
    /// The signature is not checked: the token is opaque to the client and
    /// only the server decides whether it is valid.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        token_expiry(&self.token)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| now >= exp).unwrap_or(false)
    }
}

/// `exp` claim of a JWT, or `None` for tokens that are not JWTs
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = jsonwebtoken::decode_header(token).ok()?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
    let exp = data.claims.exp?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Key-value storage standing in for the browser's local storage
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk
///
/// The whole file is rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        self.persist(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.clear();
        self.persist(&entries)
    }
}

/// Typed view over a [`SessionStore`]
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for Sessions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sessions")
            .field("signed_in", &self.store.get(TOKEN_KEY).is_some())
            .finish()
    }
}

impl Sessions {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The bearer token, unless it is missing or has expired
    ///
    /// An expired token clears the whole session.
    pub fn token(&self) -> Option<String> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;

        if let Some(exp) = token_expiry(&token) {
            if Utc::now() >= exp {
                info!("Stored token expired at {}, clearing session", exp);
                if let Err(err) = self.clear() {
                    warn!("Failed to clear expired session: {}", err);
                }
                return None;
            }
        }

        Some(token)
    }

    /// The cached user object
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("Ignoring malformed cached user: {}", err);
                None
            }
        }
    }

    /// The stored role string
    pub fn role(&self) -> Option<Role> {
        self.store.get(ROLE_KEY).map(|r| Role::parse(&r))
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    /// Signed in with the admin role
    pub fn is_admin(&self) -> bool {
        self.is_signed_in() && self.role() == Some(Role::Admin)
    }

    /// Token and user together, when both are present
    pub fn current(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.user().unwrap_or_else(|| User {
            role: self.role().unwrap_or_default(),
            ..User::default()
        });
        Some(Session { token, user })
    }

    /// Persist a freshly issued session
    pub fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        self.store.set(ROLE_KEY, session.user.role.as_str())?;
        Ok(())
    }

    /// Forget the session
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        self.store.remove(ROLE_KEY)?;
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::in_memory()
    }
}
