//! In-memory user store.
//!
//! Users live only for the lifetime of the process. Passwords are stored as
//! bcrypt hashes; hashing and verification are CPU-bound, so callers on the
//! async runtime run them via `spawn_blocking`.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::Serialize;

use campus_core::Subject;

use crate::error::{Result, ServiceError};

/// Role assigned to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Seeded administrator.
    Admin,
    /// Self-registered user.
    User,
}

#[derive(Debug, Clone)]
struct UserRecord {
    role: Role,
    password_hash: String,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Login name, also the token subject.
    pub username: Subject,
    /// Assigned role.
    pub role: Role,
}

/// Thread-safe user store.
pub struct UserStore {
    users: RwLock<HashMap<Subject, UserRecord>>,
    cost: u32,
}

impl UserStore {
    /// Create an empty store hashing with the given bcrypt cost.
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cost,
        }
    }

    /// Create a store seeded with the default `admin` account.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed password cannot be hashed.
    pub fn with_default_admin(cost: u32) -> Result<Self> {
        let store = Self::new(cost);
        let admin = Subject::parse("admin").map_err(|e| ServiceError::Internal(e.to_string()))?;
        store.insert(admin, "admin123", Role::Admin)?;
        tracing::warn!("Default admin user created (username: admin); change it outside development");
        Ok(store)
    }

    /// Register a new user with the `user` role.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUsername` if the name cannot be a token subject and
    /// `UserExists` if it is taken.
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username =
            Subject::parse(username).map_err(|e| ServiceError::InvalidUsername(e.to_string()))?;
        if password.is_empty() {
            return Err(ServiceError::BadRequest("password must not be empty".to_string()));
        }
        self.insert(username, password, Role::User)
    }

    /// Check a username and password.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` for an unknown user or a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let username = Subject::parse(username).map_err(|_| ServiceError::InvalidCredentials)?;
        let record = self
            .users
            .read()
            .get(&username)
            .cloned()
            .ok_or(ServiceError::InvalidCredentials)?;

        if bcrypt::verify(password, &record.password_hash)? {
            Ok(User {
                username,
                role: record.role,
            })
        } else {
            Err(ServiceError::InvalidCredentials)
        }
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if no users are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn insert(&self, username: Subject, password: &str, role: Role) -> Result<User> {
        // Hash before taking the lock.
        let password_hash = bcrypt::hash(password, self.cost)?;

        let mut users = self.users.write();
        if users.contains_key(&username) {
            return Err(ServiceError::UserExists);
        }
        users.insert(
            username.clone(),
            UserRecord {
                role,
                password_hash,
            },
        );
        Ok(User { username, role })
    }
}
