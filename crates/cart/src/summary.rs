//! Floating cart summary view-model.
//!
//! A read-only projection of [`CartStore`](crate::store::CartStore) state:
//! the subtotal and unit count shown in the always-visible cart pill, plus
//! the single affordance that requests navigation to the full cart view.
//! Rendering, styling, and the navigation stack itself live with the host.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tokio::sync::watch;

use gomarket_core::CurrencyCode;

use crate::model::{Cart, LineItem};
use crate::store::CartStore;

/// Route requested when the summary affordance is activated.
pub const CART_ROUTE: &str = "Cart";

/// Capability to request a named-route transition.
///
/// No parameters are passed and no return value is observed.
pub trait Navigator: Send + Sync {
    /// Request a transition to `route`.
    fn navigate(&self, route: &str);
}

/// Maps a numeric amount to a localized currency display string.
pub trait PriceFormatter: Send + Sync {
    /// Format `amount` for display.
    fn format(&self, amount: Decimal) -> String;
}

/// Default formatter: currency symbol followed by the amount with two
/// decimal places.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolFormatter {
    currency: CurrencyCode,
}

impl SymbolFormatter {
    /// Create a formatter for `currency`.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self { currency }
    }
}

impl PriceFormatter for SymbolFormatter {
    fn format(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency.symbol(), amount)
    }
}

/// Cart summary display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    /// Formatted total price of everything in the cart.
    pub subtotal: String,
    /// Total unit count (not distinct products).
    pub item_count: u64,
}

/// Sum of price times quantity over `items`.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Sum of quantities over `items` - a count of units, not of lines.
#[must_use]
pub fn unit_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Aggregates derived from one snapshot.
#[derive(Debug, Clone, Copy)]
struct Totals {
    subtotal: Decimal,
    unit_count: u64,
}

impl Totals {
    fn of(items: &[LineItem]) -> Self {
        Self {
            subtotal: subtotal(items),
            unit_count: unit_count(items),
        }
    }
}

/// The floating cart indicator.
///
/// Holds a subscription to the store, a price formatter, and a navigator.
/// Aggregates are recomputed only when the published snapshot changes
/// (`Arc::ptr_eq` on the snapshot is the memoization key); repeated reads
/// of an unchanged cart reuse the cached totals.
pub struct FloatingCart {
    items: watch::Receiver<Arc<Cart>>,
    formatter: Arc<dyn PriceFormatter>,
    navigator: Arc<dyn Navigator>,
    cached: Mutex<Option<(Arc<Cart>, Totals)>>,
}

impl FloatingCart {
    /// Create a summary view over `store`.
    #[must_use]
    pub fn new(
        store: &CartStore,
        formatter: Arc<dyn PriceFormatter>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            items: store.subscribe(),
            formatter,
            navigator,
            cached: Mutex::new(None),
        }
    }

    /// The current summary: formatted subtotal and unit count.
    #[must_use]
    pub fn view(&self) -> SummaryView {
        let cart = self.items.borrow().clone();
        let totals = self.totals_for(&cart);

        SummaryView {
            subtotal: self.formatter.format(totals.subtotal),
            item_count: totals.unit_count,
        }
    }

    /// Request navigation to the full cart view.
    pub fn open_cart(&self) {
        self.navigator.navigate(CART_ROUTE);
    }

    fn totals_for(&self, cart: &Arc<Cart>) -> Totals {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((snapshot, totals)) = cached.as_ref()
            && Arc::ptr_eq(snapshot, cart)
        {
            return *totals;
        }

        let totals = Totals::of(cart.items());
        *cached = Some((cart.clone(), totals));
        totals
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gomarket_core::{Price, ProductId};

    use super::*;
    use crate::model::Product;
    use crate::storage::MemoryStorage;

    fn product(id: &str, cents: u64) -> Product {
        Product {
            id: ProductId::parse(id).unwrap(),
            title: format!("Product {id}"),
            image_url: format!("https://img.test/{id}.png"),
            price: Price::from_cents(cents),
        }
    }

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    /// Navigator double that records requested routes.
    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: &str) {
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(route.to_string());
        }
    }

    async fn open_store() -> CartStore {
        CartStore::open(Arc::new(MemoryStorage::new())).await.unwrap()
    }

    fn floating(store: &CartStore) -> (FloatingCart, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let view = FloatingCart::new(
            store,
            Arc::new(SymbolFormatter::new(CurrencyCode::USD)),
            navigator.clone(),
        );
        (view, navigator)
    }

    #[test]
    fn test_subtotal_and_unit_count() {
        let items = vec![
            LineItem {
                id: id("a"),
                title: "A".to_string(),
                image_url: "ua".to_string(),
                price: Price::from_cents(1000),
                quantity: 2,
            },
            LineItem {
                id: id("b"),
                title: "B".to_string(),
                image_url: "ub".to_string(),
                price: Price::from_cents(500),
                quantity: 3,
            },
        ];

        assert_eq!(subtotal(&items), Decimal::from(35));
        assert_eq!(unit_count(&items), 5);
    }

    #[test]
    fn test_aggregates_of_empty_cart() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
        assert_eq!(unit_count(&[]), 0);
    }

    #[tokio::test]
    async fn test_view_formats_subtotal() {
        let store = open_store().await;
        let (view, _) = floating(&store);

        store.add_to_cart(product("p1", 400));
        store.add_to_cart(product("p1", 400));

        let summary = view.view();
        assert_eq!(summary.subtotal, "$8.00");
        assert_eq!(summary.item_count, 2);
    }

    #[tokio::test]
    async fn test_view_of_empty_cart() {
        let store = open_store().await;
        let (view, _) = floating(&store);

        let summary = view.view();
        assert_eq!(summary.subtotal, "$0.00");
        assert_eq!(summary.item_count, 0);
    }

    #[tokio::test]
    async fn test_totals_cached_per_snapshot() {
        let store = open_store().await;
        let (view, _) = floating(&store);

        store.add_to_cart(product("p1", 400));
        let _ = view.view();

        let cached_snapshot = {
            let cached = view.cached.lock().unwrap();
            cached.as_ref().map(|(snapshot, _)| snapshot.clone()).unwrap()
        };

        // A second read of the unchanged cart reuses the cached entry.
        let _ = view.view();
        {
            let cached = view.cached.lock().unwrap();
            let (snapshot, _) = cached.as_ref().unwrap();
            assert!(Arc::ptr_eq(snapshot, &cached_snapshot));
        }

        // A mutation publishes a new snapshot and invalidates the cache.
        store.add_to_cart(product("p2", 100));
        let _ = view.view();
        {
            let cached = view.cached.lock().unwrap();
            let (snapshot, totals) = cached.as_ref().unwrap();
            assert!(!Arc::ptr_eq(snapshot, &cached_snapshot));
            assert_eq!(totals.unit_count, 2);
        }
    }

    #[tokio::test]
    async fn test_view_tracks_decrement_scenario() {
        let store = open_store().await;
        let (view, _) = floating(&store);

        store.add_to_cart(product("p1", 400));
        assert_eq!(view.view(), SummaryView {
            subtotal: "$4.00".to_string(),
            item_count: 1,
        });

        store.add_to_cart(product("p1", 400));
        assert_eq!(view.view(), SummaryView {
            subtotal: "$8.00".to_string(),
            item_count: 2,
        });

        store.decrement(&id("p1"));
        assert_eq!(view.view(), SummaryView {
            subtotal: "$4.00".to_string(),
            item_count: 1,
        });

        store.decrement(&id("p1"));
        assert_eq!(view.view(), SummaryView {
            subtotal: "$0.00".to_string(),
            item_count: 0,
        });
    }

    #[tokio::test]
    async fn test_open_cart_requests_cart_route() {
        let store = open_store().await;
        let (view, navigator) = floating(&store);

        view.open_cart();

        let routes = navigator.routes.lock().unwrap();
        assert_eq!(*routes, ["Cart"]);
    }

    #[test]
    fn test_symbol_formatter_currencies() {
        let usd = SymbolFormatter::new(CurrencyCode::USD);
        assert_eq!(usd.format(Decimal::new(3550, 2)), "$35.50");

        let brl = SymbolFormatter::new(CurrencyCode::BRL);
        assert_eq!(brl.format(Decimal::from(12)), "R$ 12.00");
    }

    /// Formatter double that counts invocations (the formatter runs per
    /// view read; only the reduction is memoized).
    struct CountingFormatter(AtomicUsize);

    impl PriceFormatter for CountingFormatter {
        fn format(&self, amount: Decimal) -> String {
            self.0.fetch_add(1, Ordering::SeqCst);
            format!("{amount:.2}")
        }
    }

    #[tokio::test]
    async fn test_formatter_called_per_read() {
        let store = open_store().await;
        let formatter = Arc::new(CountingFormatter(AtomicUsize::new(0)));
        let view = FloatingCart::new(
            &store,
            formatter.clone(),
            Arc::new(RecordingNavigator::default()),
        );

        let _ = view.view();
        let _ = view.view();

        assert_eq!(formatter.0.load(Ordering::SeqCst), 2);
    }
}
