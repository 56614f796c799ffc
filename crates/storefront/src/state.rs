//! Application state shared across handlers.

use std::sync::Arc;

use dashmap::DashMap;
use threadline_core::{Catalog, CatalogError, PricingPolicy, ReviewStore, UserProfile};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tower_sessions::session::Id as SessionId;

use crate::config::StorefrontConfig;
use crate::services::gateway::{OrderGateway, SimulatedGateway};

/// Catalog fixture served by the storefront.
pub const CATALOG_JSON: &str = include_str!("../data/catalog.json");
const PROFILE_JSON: &str = include_str!("../data/profile.json");
const REVIEWS_JSON: &str = include_str!("../data/reviews.json");

/// Error loading the embedded fixtures.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog fixture: {0}")]
    Catalog(#[from] CatalogError),
    #[error("profile fixture: {0}")]
    Profile(#[source] serde_json::Error),
    #[error("reviews fixture: {0}")]
    Reviews(#[source] serde_json::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the shopper profile, the order gateway and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    reviews: ReviewStore,
    profile: RwLock<UserProfile>,
    gateway: Arc<dyn OrderGateway>,
    submissions: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl AppState {
    /// Create application state from the embedded fixtures.
    ///
    /// Orders go to a [`SimulatedGateway`] configured from `config.orders`,
    /// numbering new orders after the highest one in the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture fails to parse.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let profile = UserProfile::from_json(PROFILE_JSON).map_err(StateError::Profile)?;
        let gateway = SimulatedGateway::new(
            config.orders.latency,
            profile.highest_order_index().unwrap_or(0) + 1,
            profile.highest_order_sequence().unwrap_or(0) + 1,
        )
        .declining(config.orders.decline);

        Self::with_parts(config, profile, Arc::new(gateway))
    }

    /// Create application state with a custom order gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if a fixture fails to parse.
    pub fn with_gateway(
        config: StorefrontConfig,
        gateway: Arc<dyn OrderGateway>,
    ) -> Result<Self, StateError> {
        let profile = UserProfile::from_json(PROFILE_JSON).map_err(StateError::Profile)?;
        Self::with_parts(config, profile, gateway)
    }

    fn with_parts(
        config: StorefrontConfig,
        profile: UserProfile,
        gateway: Arc<dyn OrderGateway>,
    ) -> Result<Self, StateError> {
        let catalog = Catalog::from_json(CATALOG_JSON)?;
        let reviews = ReviewStore::from_json(REVIEWS_JSON).map_err(StateError::Reviews)?;

        tracing::info!(
            products = catalog.products().len(),
            categories = catalog.categories().len(),
            "Catalog loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                reviews,
                profile: RwLock::new(profile),
                gateway,
                submissions: DashMap::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the pricing policy.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the product reviews.
    #[must_use]
    pub fn reviews(&self) -> &ReviewStore {
        &self.inner.reviews
    }

    /// Get the shopper profile lock.
    #[must_use]
    pub fn profile(&self) -> &RwLock<UserProfile> {
        &self.inner.profile
    }

    /// Get the order gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn OrderGateway {
        self.inner.gateway.as_ref()
    }

    /// Wait for exclusive use of a session's order submission.
    ///
    /// Hold the guard until the session has been written back to the
    /// store.
    pub async fn lock_submission(&self, session_id: SessionId) -> OwnedMutexGuard<()> {
        // Forget locks that no request holds or waits on
        self.inner
            .submissions
            .retain(|_, lock| Arc::strong_count(lock) > 1);
        let lock = self
            .inner
            .submissions
            .entry(session_id)
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}
