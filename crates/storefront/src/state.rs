//! Customer state owner.
//!
//! [`ShopState`] owns everything that belongs to the customer's device: the
//! cart, the wishlist and the signed-in session. It is created once per run
//! and passed by reference to whatever needs it.

use bookhub_core::UserId;

use crate::cart::CartManager;
use crate::checkout::{CheckoutError, Order, ShippingMethod, place_order};
use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::rentals::Clock;
use crate::session::{AuthProvider, LocalSession};
use crate::store::{CollectionStore, FileStore};
use crate::wishlist::WishlistManager;

/// Cart, wishlist and session for one customer.
#[derive(Debug)]
pub struct ShopState<S, N> {
    cart: CartManager<S, N>,
    wishlist: WishlistManager<S, N>,
    session: LocalSession<S>,
}

impl<N: Notifier + Clone> ShopState<FileStore, N> {
    /// Load state from the configured data directory.
    #[must_use]
    pub fn open(config: &StorefrontConfig, notifier: N) -> Self {
        Self::load(FileStore::new(&config.data_dir), notifier)
    }
}

impl<S: CollectionStore + Clone, N: Notifier + Clone> ShopState<S, N> {
    /// Load every collection from `store`.
    pub fn load(store: S, notifier: N) -> Self {
        Self {
            cart: CartManager::load(store.clone(), notifier.clone()),
            wishlist: WishlistManager::load(store.clone(), notifier),
            session: LocalSession::load(store),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartManager<S, N> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartManager<S, N> {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistManager<S, N> {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistManager<S, N> {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn session(&self) -> &LocalSession<S> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut LocalSession<S> {
        &mut self.session
    }

    /// Id of the signed-in customer, if any.
    #[must_use]
    pub fn current_user_id(&self) -> Option<&UserId> {
        self.session.current_user_id()
    }

    /// Place an order for the cart as the signed-in customer.
    ///
    /// # Errors
    ///
    /// See [`place_order`].
    pub fn place_order(
        &mut self,
        shipping: ShippingMethod,
        clock: &impl Clock,
    ) -> Result<Order, CheckoutError> {
        let user = self.session.current_user_id();
        place_order(user, &mut self.cart, shipping, clock)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::notify::MemoryNotifier;
    use crate::rentals::FixedClock;
    use crate::session::SessionUser;
    use crate::store::MemoryStore;
    use crate::test_support::book;

    #[test]
    fn test_collections_share_one_store() {
        let store = MemoryStore::new();
        let mut state = ShopState::load(store.clone(), MemoryNotifier::new());
        state.cart_mut().add(&book("a", 10), 1);
        state.wishlist_mut().add(&book("b", 10));
        state.session_mut().sign_in(SessionUser::new("u1"));

        let reloaded = ShopState::load(store, MemoryNotifier::new());
        assert_eq!(reloaded.cart().count(), 1);
        assert_eq!(reloaded.wishlist().len(), 1);
        assert_eq!(reloaded.current_user_id().unwrap().as_str(), "u1");
    }

    #[test]
    fn test_place_order_uses_session() {
        let mut state = ShopState::load(MemoryStore::new(), MemoryNotifier::new());
        state.cart_mut().add(&book("a", 10), 1);
        let clock = FixedClock::new(Utc::now());

        assert!(matches!(
            state.place_order(ShippingMethod::Standard, &clock),
            Err(CheckoutError::NotAuthenticated)
        ));

        state.session_mut().sign_in(SessionUser::new("u1"));
        let order = state.place_order(ShippingMethod::Standard, &clock).unwrap();
        assert_eq!(order.user_id.as_str(), "u1");
        assert!(state.cart().is_empty());
    }
}
