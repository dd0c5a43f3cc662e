//! Product listing reconciliation.
//!
//! The catalog combines three signals - the fetched product list, the
//! checked categories, and the selected price bracket - into what the
//! storefront renders. Filtering is conjunctive: a product must match every
//! active filter.
//!
//! Two fetch modes back the listing and are mutually exclusive:
//! - no filter active: the paginated product list, extended page by page
//! - any filter active: one server-side filtered fetch for the whole
//!   selection
//!
//! Clearing every filter returns the view to the paginated mode from page
//! one. Responses are fenced with a generation counter so a slow fetch that
//! was superseded by a newer selection never overwrites newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, instrument, warn};

use clove_core::{Category, CategoryId, PriceRange, Product};

use crate::api::ApiClient;

/// First page of the paginated product list.
const FIRST_PAGE: u32 = 1;

/// The active category and price filters for the listing view.
///
/// Lives only as long as the view; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    /// IDs of the checked categories.
    pub checked: Vec<CategoryId>,
    /// The selected price bracket, if any.
    pub range: Option<PriceRange>,
}

impl FilterSelection {
    /// Whether any filter is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.checked.is_empty() || self.range.is_some()
    }
}

/// Loading phase of the product listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// The three initial fetches (or a filtered re-fetch) are in flight.
    LoadingInitial,
    /// The view is renderable.
    Ready,
    /// A further page is being appended to a renderable view.
    LoadingMore,
}

/// Snapshot of the product listing view.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    /// Loading phase.
    pub phase: CatalogPhase,
    /// All known categories (for the filter checkboxes).
    pub categories: Vec<Category>,
    /// Total product count across all pages.
    pub total: u64,
    /// The loaded products: pages so far, or the filtered result set.
    pub products: Vec<Product>,
    /// Highest page loaded in paginated mode.
    pub page: u32,
    /// The active filters.
    pub filters: FilterSelection,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            phase: CatalogPhase::Idle,
            categories: Vec::new(),
            total: 0,
            products: Vec::new(),
            page: FIRST_PAGE,
            filters: FilterSelection::default(),
        }
    }
}

/// Conjunction filter over an already-fetched product list.
///
/// With no active filter the input is returned unchanged, order preserved.
#[must_use]
pub fn visible_products(
    all: &[Product],
    checked: &[CategoryId],
    range: Option<PriceRange>,
) -> Vec<Product> {
    all.iter()
        .filter(|p| checked.is_empty() || checked.contains(&p.category.id))
        .filter(|p| range.is_none_or(|r| r.contains(p.price)))
        .cloned()
        .collect()
}

/// The product listing state machine.
///
/// Cheaply cloneable; clones share the same view state, so a host can spawn
/// each user interaction as its own task.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    api: ApiClient,
    state: RwLock<CatalogState>,
    generation: AtomicU64,
}

impl Catalog {
    /// Create an idle catalog over `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                api,
                state: RwLock::new(CatalogState::default()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current view state.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.inner
            .state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The loaded products narrowed by the active filters.
    ///
    /// Server-filtered result sets already satisfy the filters, so the
    /// narrowing is a no-op there; it matters when a host renders loaded
    /// pages while a filter toggle is still in flight.
    #[must_use]
    pub fn visible(&self) -> Vec<Product> {
        let state = self.state();
        visible_products(&state.products, &state.filters.checked, state.filters.range)
    }

    /// Whether the paginated view has pages left to load.
    #[must_use]
    pub fn has_more(&self) -> bool {
        let state = self.state();
        !state.filters.is_active() && (state.products.len() as u64) < state.total
    }

    /// Run the three initial fetches concurrently and become `Ready`.
    ///
    /// A failure in any one fetch is logged and that slice renders as its
    /// default; the others still land.
    #[instrument(skip(self))]
    pub async fn load_initial(&self) {
        let generation = self.begin_generation();
        self.set_phase(CatalogPhase::LoadingInitial);

        let api = &self.inner.api;
        let (categories, total, products) = tokio::join!(
            api.categories(),
            api.product_count(),
            api.product_page(FIRST_PAGE),
        );

        let categories = categories.unwrap_or_else(|e| {
            warn!(error = %e, "category list fetch failed, rendering empty");
            Vec::new()
        });
        let total = total.unwrap_or_else(|e| {
            warn!(error = %e, "product count fetch failed, rendering zero");
            0
        });
        let products = products.unwrap_or_else(|e| {
            warn!(error = %e, "first product page fetch failed, rendering empty");
            Vec::new()
        });

        self.commit(generation, |state| {
            state.categories = categories;
            state.total = total;
            state.products = products;
            state.page = FIRST_PAGE;
            state.phase = CatalogPhase::Ready;
        });
    }

    /// Append the next page in paginated mode.
    ///
    /// A no-op unless the view is `Ready` with no filter active.
    #[instrument(skip(self))]
    pub async fn load_more(&self) {
        let Some((next_page, generation)) = self.begin_load_more() else {
            return;
        };

        match self.inner.api.product_page(next_page).await {
            Ok(mut more) => {
                self.commit(generation, |state| {
                    state.products.append(&mut more);
                    state.page = next_page;
                    state.phase = CatalogPhase::Ready;
                });
            }
            Err(e) => {
                warn!(error = %e, page = next_page, "load more failed");
                self.commit(generation, |state| state.phase = CatalogPhase::Ready);
            }
        }
    }

    /// Check or uncheck a category filter, then re-fetch the listing.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn toggle_category(&self, category: CategoryId, selected: bool) {
        if let Ok(mut state) = self.inner.state.write() {
            if selected {
                if !state.filters.checked.contains(&category) {
                    state.filters.checked.push(category);
                }
            } else {
                state.filters.checked.retain(|c| c != &category);
            }
        }
        self.refresh().await;
    }

    /// Select or clear the price bracket, then re-fetch the listing.
    #[instrument(skip(self), fields(range = ?range))]
    pub async fn set_price_range(&self, range: Option<PriceRange>) {
        if let Ok(mut state) = self.inner.state.write() {
            state.filters.range = range;
        }
        self.refresh().await;
    }

    /// Clear both filters in one step and restore the paginated view.
    #[instrument(skip(self))]
    pub async fn reset_filters(&self) {
        if let Ok(mut state) = self.inner.state.write() {
            state.filters = FilterSelection::default();
        }
        self.refresh().await;
    }

    /// Re-fetch the listing for the current filter selection.
    ///
    /// Filters active: one filtered fetch. No filters: paginated fetch from
    /// page one. Either way the view passes back through `LoadingInitial`.
    async fn refresh(&self) {
        let filters = self
            .inner
            .state
            .read()
            .map(|state| state.filters.clone())
            .unwrap_or_default();

        let generation = self.begin_generation();
        self.set_phase(CatalogPhase::LoadingInitial);

        let fetched = if filters.is_active() {
            self.inner
                .api
                .filtered_products(&filters.checked, filters.range)
                .await
        } else {
            self.inner.api.product_page(FIRST_PAGE).await
        };

        let products = fetched.unwrap_or_else(|e| {
            warn!(error = %e, "listing re-fetch failed, rendering empty");
            Vec::new()
        });

        self.commit(generation, |state| {
            state.products = products;
            state.page = FIRST_PAGE;
            state.phase = CatalogPhase::Ready;
        });
    }

    /// Start a new generation, superseding any in-flight fetch.
    fn begin_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mark the view as loading more and reserve the next page number.
    fn begin_load_more(&self) -> Option<(u32, u64)> {
        let mut state = self.inner.state.write().ok()?;
        if state.phase != CatalogPhase::Ready || state.filters.is_active() {
            return None;
        }
        state.phase = CatalogPhase::LoadingMore;
        Some((state.page + 1, self.inner.generation.load(Ordering::SeqCst)))
    }

    /// Apply `apply` to the state unless `generation` has been superseded.
    fn commit(&self, generation: u64, apply: impl FnOnce(&mut CatalogState)) {
        if let Ok(mut state) = self.inner.state.write() {
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "discarding stale catalog response");
                return;
            }
            apply(&mut state);
        }
    }

    fn set_phase(&self, phase: CatalogPhase) {
        if let Ok(mut state) = self.inner.state.write() {
            state.phase = phase;
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").field("state", &self.state()).finish()
    }
}
