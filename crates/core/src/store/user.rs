use std::collections::BTreeMap;

use hashbrown::HashMap;

use super::Registry;
use crate::error::{Conflict, NotFound, Result};
use crate::record::{User, UserId};

/// Registered users, keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStore {
    users: HashMap<UserId, User>,
}

impl UserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted table, keying each record by its own id.
    /// Records that lose to another record with the same id are returned
    /// alongside the store.
    #[must_use]
    pub fn from_table(table: HashMap<UserId, User>) -> (Self, Vec<User>) {
        let (users, dropped) = super::rekey(table, |user| &user.user_id);
        (Self { users }, dropped)
    }

    #[must_use]
    pub fn table(&self) -> BTreeMap<&UserId, &User> {
        self.users.iter().collect()
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::DuplicateUser`] if the id is taken.
    pub fn add(&mut self, user: User) -> Result<()> {
        if self.users.contains_key(&user.user_id) {
            return Err(Conflict::DuplicateUser(user.user_id).into());
        }
        tracing::debug!(user_id = %user.user_id, "user added");
        self.users.insert(user.user_id.clone(), user);
        Ok(())
    }

    /// Changes a user's password. The name is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::User`] for an unknown id and
    /// [`Conflict::PasswordUnchanged`] if `password` is the current one.
    pub fn update_password(&mut self, user_id: &str, password: impl Into<String>) -> Result<()> {
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| NotFound::User(user_id.into()))?;
        let password = password.into();
        if user.password == password {
            return Err(Conflict::PasswordUnchanged(user.user_id.clone()).into());
        }
        user.password = password;
        tracing::debug!(%user_id, "password changed");
        Ok(())
    }

    /// Removes a user and returns the record.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::User`] for an unknown id.
    pub fn remove(&mut self, user_id: &str) -> Result<User> {
        let user = self
            .users
            .remove(user_id)
            .ok_or_else(|| NotFound::User(user_id.into()))?;
        tracing::debug!(%user_id, "user removed");
        Ok(user)
    }

    /// `true` only if the user exists and `password` matches.
    #[must_use]
    pub fn verify(&self, user_id: &str, password: &str) -> bool {
        self.users
            .get(user_id)
            .is_some_and(|user| user.password == password)
    }

    #[must_use]
    pub fn search_by_id(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// All users whose name equals `name` exactly.
    #[must_use]
    pub fn search_by_name(&self, name: &str) -> BTreeMap<&UserId, &User> {
        self.users
            .iter()
            .filter(|(_, user)| user.name == name)
            .collect()
    }

    /// Users ordered by id.
    pub fn list(&self) -> impl Iterator<Item = &User> {
        self.table().into_values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Registry for UserStore {
    type Record = User;

    fn get(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }
}
