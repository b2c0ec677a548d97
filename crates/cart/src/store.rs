//! Cart state container.
//!
//! [`CartStore`] is the canonical owner of cart state. It is created by
//! [`CartStore::open`], which hydrates the cart from persistent storage
//! exactly once; every subsequent mutation updates the in-memory snapshot
//! synchronously and enqueues a persistence write on a single-writer
//! queue. Consumers hold a cheaply cloneable handle and read immutable
//! snapshots - there is no way to reach cart operations without a handle
//! obtained from `open`.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use gomarket_core::ProductId;

use crate::error::CartError;
use crate::model::{Cart, Product};
use crate::storage::{CartStorage, keys};

/// Messages handled by the persistence writer task.
enum WriterMsg {
    /// Serialize and store this snapshot.
    Persist(Arc<Cart>),
    /// Acknowledge once every previously enqueued write has completed.
    Flush(oneshot::Sender<()>),
}

/// Canonical owner of cart state.
///
/// Cheaply cloneable; all clones share the same state and writer queue.
///
/// # Snapshots
///
/// Mutations are copy-on-write: each one builds a new [`Cart`] value,
/// publishes it as a fresh `Arc<Cart>`, and leaves previously returned
/// snapshots untouched. Snapshot identity (`Arc::ptr_eq`) therefore
/// doubles as a change marker for memoizing consumers.
///
/// # Persistence
///
/// Writes are fire-and-forget from the mutating caller's perspective. The
/// snapshot is enqueued while the state lock is held, so queue order
/// always equals mutation order, and a single background task completes
/// the writes strictly in that order. Storage and serialization failures
/// are logged at `warn` and dropped.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    items: watch::Sender<Arc<Cart>>,
    writer_tx: mpsc::UnboundedSender<WriterMsg>,
}

impl CartStore {
    /// Open the store: hydrate the cart from `storage` and start the
    /// persistence writer.
    ///
    /// An absent blob yields an empty cart. A present but malformed blob
    /// is logged and discarded, also yielding an empty cart - the next
    /// mutation overwrites it with well-formed data.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the persistent store cannot be
    /// read.
    pub async fn open(storage: Arc<dyn CartStorage>) -> Result<Self, CartError> {
        let cart = match storage.get(keys::CART).await? {
            Some(bytes) => match serde_json::from_slice::<Cart>(&bytes) {
                Ok(cart) => {
                    tracing::debug!(items = cart.len(), "cart hydrated");
                    cart
                }
                Err(e) => {
                    tracing::warn!(error = %e, "persisted cart is malformed, starting empty");
                    Cart::new()
                }
            },
            None => Cart::new(),
        };

        let (items, _) = watch::channel(Arc::new(cart));
        let (writer_tx, writer_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(storage, writer_rx));

        Ok(Self {
            inner: Arc::new(CartStoreInner { items, writer_tx }),
        })
    }

    /// The current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        self.inner.items.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver immediately holds the current snapshot and observes
    /// every subsequent mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.inner.items.subscribe()
    }

    /// Add a product: bump the quantity if the id is already in the cart,
    /// otherwise append a new line with quantity 1.
    ///
    /// The in-memory update is visible before this returns; the
    /// persistence write completes in the background.
    pub fn add_to_cart(&self, product: Product) {
        self.mutate(|cart| {
            cart.add(product);
            true
        });
    }

    /// Increase the quantity of an existing line by 1.
    ///
    /// A no-op (including persistence) if the id is not in the cart.
    pub fn increment(&self, id: &ProductId) {
        self.mutate(|cart| cart.increment(id));
    }

    /// Decrease the quantity of an existing line by 1, removing the line
    /// when it reaches zero.
    ///
    /// A no-op (including persistence) if the id is not in the cart.
    pub fn decrement(&self, id: &ProductId) {
        self.mutate(|cart| cart.decrement(id));
    }

    /// Wait until every write enqueued before this call has completed.
    ///
    /// Mutations themselves never wait on storage; call this from host
    /// shutdown paths (or tests) that need the durable state settled.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.inner.writer_tx.send(WriterMsg::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Apply `f` copy-on-write: clone the current cart, let `f` mutate the
    /// clone, and only if `f` reports a change publish the new snapshot
    /// and enqueue its persistence write.
    ///
    /// Publishing and enqueueing happen inside the watch sender's critical
    /// section, so concurrent mutations cannot reorder in-memory updates
    /// relative to their queued writes.
    fn mutate(&self, f: impl FnOnce(&mut Cart) -> bool) {
        self.inner.items.send_if_modified(|current| {
            let mut next = Cart::clone(current);
            if !f(&mut next) {
                return false;
            }

            let next = Arc::new(next);
            let _ = self.inner.writer_tx.send(WriterMsg::Persist(next.clone()));
            *current = next;
            true
        });
    }
}

/// Single-writer persistence loop.
///
/// Owns the storage handle for the lifetime of the store and completes
/// writes strictly in queue order. Failures are logged and skipped; cart
/// contents are best-effort data and the next mutation writes a fresh
/// snapshot anyway.
async fn write_loop(storage: Arc<dyn CartStorage>, mut rx: mpsc::UnboundedReceiver<WriterMsg>) {
    while let Some(msg) = rx.recv().await {
        match msg {
            WriterMsg::Persist(cart) => match serde_json::to_vec(&*cart) {
                Ok(bytes) => {
                    if let Err(e) = storage.set(keys::CART, bytes).await {
                        tracing::warn!(error = %e, "cart persistence write failed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cart serialization failed");
                }
            },
            WriterMsg::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}
