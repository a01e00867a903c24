//! Signed-in customer session.
//!
//! Authentication itself belongs to an external provider. Once it hands us an
//! identity, [`LocalSession`] keeps it in the collection store so the customer
//! stays signed in across runs until they sign out.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use bookhub_core::UserId;

use crate::store::{CollectionStore, SESSION_KEY, save_best_effort};

/// Identity of the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionUser {
    /// Identity with an id only.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    /// Whether the id is usable. A blank id never counts as signed in.
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.as_str().trim().is_empty()
    }

    /// Attach an email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Source of the current customer identity.
pub trait AuthProvider {
    /// The signed-in customer, if any.
    fn current_user(&self) -> Option<&SessionUser>;

    /// Forget the signed-in customer.
    fn sign_out(&mut self);

    /// Id of the signed-in customer, if any.
    fn current_user_id(&self) -> Option<&UserId> {
        self.current_user().map(|user| &user.id)
    }
}

/// Session persisted in the collection store.
#[derive(Debug)]
pub struct LocalSession<S> {
    store: S,
    user: Option<SessionUser>,
}

impl<S: CollectionStore> LocalSession<S> {
    /// Restore the session saved by a previous run, if any.
    pub fn load(store: S) -> Self {
        let user = store
            .load::<SessionUser>(SESSION_KEY)
            .into_iter()
            .next()
            .filter(SessionUser::has_id);
        if let Some(user) = &user {
            tracing::debug!(user_id = %user.id, "Session restored");
        }
        Self { store, user }
    }

    /// Record the identity handed over by the auth provider.
    ///
    /// Returns `false` and leaves the session untouched if the id is blank.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn sign_in(&mut self, user: SessionUser) -> bool {
        if !user.has_id() {
            tracing::warn!("Refusing sign-in with a blank user id");
            return false;
        }
        save_best_effort(&self.store, SESSION_KEY, std::slice::from_ref(&user));
        self.user = Some(user);
        tracing::info!("Signed in");
        true
    }
}

impl<S: CollectionStore> AuthProvider for LocalSession<S> {
    fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    #[instrument(skip(self))]
    fn sign_out(&mut self) {
        if self.user.take().is_some() {
            tracing::info!("Signed out");
        }
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::warn!(error = %e, "Failed to remove stored session");
        }
    }
}
