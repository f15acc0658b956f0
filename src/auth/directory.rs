use once_cell::sync::Lazy;
use sha2::{Digest, Sha512};

use crate::schema::{Role, User};
use crate::types::UserId;

/// Password of every demo account.
pub const DEMO_PASSWORD: &str = "password";

static DEMO_USERS: Lazy<Directory> = Lazy::new(|| {
    let entries = [
        ("1", "editor", "Eddie Tor", Role::Editor),
        ("2", "admin", "Adam Min", Role::Admin),
        ("3", "user", "Jane Doe", Role::User),
    ];

    Directory {
        entries: entries
            .into_iter()
            .map(|(id, username, name, role)| Entry {
                password_hash: hash_password(username, DEMO_PASSWORD),
                user: User {
                    id: UserId::new(id),
                    username: username.into(),
                    name: name.into(),
                    role,
                },
            })
            .collect(),
    }
});

#[derive(Debug)]
struct Entry {
    user: User,
    password_hash: String,
}

/// Known users and their password hashes.
#[derive(Debug)]
pub struct Directory {
    entries: Vec<Entry>,
}

impl Directory {
    /// The built-in demo accounts: `editor`, `admin` and `user`.
    #[must_use]
    pub fn demo() -> &'static Self {
        &DEMO_USERS
    }

    #[must_use]
    pub fn find_by_id(&self, id: &UserId) -> Option<&User> {
        self.entries
            .iter()
            .map(|entry| &entry.user)
            .find(|user| &user.id == id)
    }

    #[tracing::instrument(skip(self, password))]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.user.username == username)?;

        let attempt = hash_password(username, password);
        let matched = entry
            .password_hash
            .bytes()
            .zip(attempt.bytes())
            .fold(true, |matched, (a, b)| matched & (a == b));

        matched.then_some(&entry.user)
    }
}

fn hash_password(username: &str, password: &str) -> String {
    let mut hasher = Sha512::default();
    hasher.update(format!("{username}:{password}"));
    hex::encode(hasher.finalize())
}
