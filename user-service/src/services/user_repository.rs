//! In-memory user store.
//!
//! Records live in insertion order in a `Vec` next to the id counter, both
//! behind one mutex. Every operation takes the lock once and never awaits
//! while holding it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{User, UserId};

/// Records present in a freshly constructed repository, ids 1 and 2.
const SEED_USERS: [(&str, &str); 2] = [
    ("John Doe", "john@example.com"),
    ("Jane Smith", "jane@example.com"),
];

struct UserStore {
    users: Vec<User>,
    next_id: UserId,
}

impl UserStore {
    fn insert(&mut self, name: String, email: String) -> User {
        let id = self.next_id;
        self.next_id += 1;

        let user = User::new(id, name, email);
        self.users.push(user.clone());
        user
    }
}

/// Owns every user record for the lifetime of the process.
///
/// Ids are assigned from a counter that only moves forward, so an id is
/// never handed out twice even after the record holding it is deleted.
pub struct UserRepository {
    store: Mutex<UserStore>,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository {
    /// A repository holding the seed records.
    pub fn new() -> Self {
        let mut store = UserStore {
            users: Vec::with_capacity(SEED_USERS.len()),
            next_id: 1,
        };
        for (name, email) in SEED_USERS {
            store.insert(name.to_string(), email.to_string());
        }

        Self {
            store: Mutex::new(store),
        }
    }

    // Each operation leaves the store consistent before anything can panic,
    // so a poisoned lock is safe to keep using.
    fn store(&self) -> MutexGuard<'_, UserStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Vec<User> {
        self.store().users.clone()
    }

    pub fn get_by_id(&self, id: UserId) -> Option<User> {
        self.store().users.iter().find(|u| u.id == id).cloned()
    }

    /// Store a new record under the next id and return it.
    pub fn create(&self, name: impl Into<String>, email: impl Into<String>) -> User {
        self.store().insert(name.into(), email.into())
    }

    /// Remove the record with `id`. Returns `false` when there was none.
    pub fn delete_by_id(&self, id: UserId) -> bool {
        let mut store = self.store();
        match store.users.iter().position(|u| u.id == id) {
            Some(index) => {
                store.users.remove(index);
                true
            }
            None => false,
        }
    }
}
