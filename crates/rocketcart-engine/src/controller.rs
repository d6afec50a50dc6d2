//! # Cart Controller
//!
//! Owns the current cart and applies every mutation, one at a time.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Controller                                  │
//! │                                                                         │
//! │  CartHandle (clone freely)                                              │
//! │   add_item / remove_item / set_item_amount / clear                      │
//! │       │                                                                 │
//! │       │ CartCommand + oneshot reply                                     │
//! │       ▼                                                                 │
//! │  ┌───────────────┐                                                      │
//! │  │ mpsc queue    │  bounded, FIFO                                       │
//! │  └──────┬────────┘                                                      │
//! │         ▼                                                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Controller task (single writer)                                │   │
//! │  │                                                                 │   │
//! │  │  1. lookups (stock, catalog)   ── may suspend, queue waits      │   │
//! │  │  2. pure transition on Cart    ── rocketcart-core               │   │
//! │  │  3. store.save(key, next)      ── failure: nothing published    │   │
//! │  │  4. watch::send_replace(next)  ── readers see the new snapshot  │   │
//! │  │  5. notifier.notify(notice)                                     │   │
//! │  │  6. reply to caller                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  watch::Receiver<Arc<Cart>>  ──► CartHandle::cart() / subscribe()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! A command runs to completion, lookups included, before the next one is
//! taken from the queue. Two overlapping `add_item(1)` calls therefore see
//! each other's result instead of racing on the same starting cart.

use std::sync::Arc;

use rocketcart_core::cart::ensure_positive;
use rocketcart_core::validation::validate_stock_record;
use rocketcart_core::{
    Cart, CartError, CartOperation, CartResult, CartStore, CatalogLookup, LookupError, Notice,
    NotificationSink, ProductId, ProductRecord, StockLookup, StockRecord,
};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;

// =============================================================================
// Results
// =============================================================================

/// Outcome of a successful mutation.
#[derive(Debug, Clone)]
pub struct CartUpdate {
    /// The cart as published after the mutation.
    pub cart: Arc<Cart>,

    /// Informational notice, if the operation produced one.
    pub notice: Option<Notice>,
}

type Reply = oneshot::Sender<CartResult<CartUpdate>>;

/// Commands for the controller task.
#[derive(Debug)]
enum CartCommand {
    Add { product_id: ProductId, reply: Reply },
    Remove { product_id: ProductId, reply: Reply },
    SetAmount {
        product_id: ProductId,
        amount: i64,
        reply: Reply,
    },
    Clear { reply: Reply },
    Shutdown,
}

// =============================================================================
// Cart Handle
// =============================================================================

/// Handle for reading and mutating the cart.
#[derive(Clone)]
pub struct CartHandle {
    cmd_tx: mpsc::Sender<CartCommand>,
    cart_rx: watch::Receiver<Arc<Cart>>,
}

impl CartHandle {
    /// Returns the last published cart.
    pub fn cart(&self) -> Arc<Cart> {
        self.cart_rx.borrow().clone()
    }

    /// Subscribes to cart replacements.
    ///
    /// The returned receiver starts at the current cart; `changed()` resolves
    /// on the next successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        let mut rx = self.cart_rx.clone();
        rx.borrow_and_update();
        rx
    }

    /// Adds one unit of a product.
    ///
    /// A product not yet in the cart is appended with amount 1 and an
    /// "Added ..." notice. A product already in the cart is incremented by 1.
    pub async fn add_item(&self, product_id: ProductId) -> CartResult<CartUpdate> {
        self.request(|reply| CartCommand::Add { product_id, reply })
            .await
    }

    /// Removes a product from the cart.
    pub async fn remove_item(&self, product_id: ProductId) -> CartResult<CartUpdate> {
        self.request(|reply| CartCommand::Remove { product_id, reply })
            .await
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// `amount <= 0` is rejected with `InvalidAmount`; it never removes.
    pub async fn set_item_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> CartResult<CartUpdate> {
        self.request(|reply| CartCommand::SetAmount {
            product_id,
            amount,
            reply,
        })
        .await
    }

    /// Empties the cart.
    pub async fn clear(&self) -> CartResult<CartUpdate> {
        self.request(|reply| CartCommand::Clear { reply }).await
    }

    /// Stops the controller after the commands already queued.
    pub async fn shutdown(&self) -> CartResult<()> {
        self.cmd_tx
            .send(CartCommand::Shutdown)
            .await
            .map_err(|_| CartError::ControllerClosed)
    }

    async fn request(&self, command: impl FnOnce(Reply) -> CartCommand) -> CartResult<CartUpdate> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.cmd_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| CartError::ControllerClosed)?;

        reply_rx.await.map_err(|_| CartError::ControllerClosed)?
    }
}

// =============================================================================
// Cart Controller
// =============================================================================

/// The cart controller, before it is started.
pub struct CartController {
    storage_key: String,
    queue_capacity: usize,
    stock: Arc<dyn StockLookup>,
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl CartController {
    /// Creates a controller.
    pub fn new(
        config: &EngineConfig,
        stock: Arc<dyn StockLookup>,
        catalog: Arc<dyn CatalogLookup>,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        CartController {
            storage_key: config.storage_key().to_string(),
            queue_capacity: config.controller.queue_capacity.max(1),
            stock,
            catalog,
            store,
            notifier,
        }
    }

    /// Restores the stored cart, starts the controller task and returns a handle.
    ///
    /// A missing snapshot starts an empty cart. So does a snapshot that cannot
    /// be read; it is overwritten by the next successful mutation.
    pub async fn start(self) -> CartHandle {
        let initial = match self.store.load(&self.storage_key).await {
            Ok(Some(cart)) => {
                info!(
                    key = %self.storage_key,
                    items = cart.item_count(),
                    "Restored stored cart"
                );
                cart
            }
            Ok(None) => {
                debug!(key = %self.storage_key, "No stored cart, starting empty");
                Cart::new()
            }
            Err(e) => {
                error!(
                    key = %self.storage_key,
                    error = %e,
                    "Failed to restore stored cart, starting empty"
                );
                Cart::new()
            }
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(self.queue_capacity);
        let (cart_tx, cart_rx) = watch::channel(Arc::new(initial));

        let task = ControllerTask {
            storage_key: self.storage_key,
            stock: self.stock,
            catalog: self.catalog,
            store: self.store,
            notifier: self.notifier,
            cart_tx,
        };

        tokio::spawn(async move {
            task.run(cmd_rx).await;
        });

        CartHandle { cmd_tx, cart_rx }
    }
}

// =============================================================================
// Controller Task
// =============================================================================

struct ControllerTask {
    storage_key: String,
    stock: Arc<dyn StockLookup>,
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn NotificationSink>,
    cart_tx: watch::Sender<Arc<Cart>>,
}

impl ControllerTask {
    /// Main controller loop.
    async fn run(self, mut cmd_rx: mpsc::Receiver<CartCommand>) {
        info!(key = %self.storage_key, "Cart controller started");

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                CartCommand::Add { product_id, reply } => {
                    let result = self.add_item(product_id).await;
                    self.finish(CartOperation::Add, result, reply);
                }
                CartCommand::Remove { product_id, reply } => {
                    let result = self.remove_item(product_id).await;
                    self.finish(CartOperation::Remove, result, reply);
                }
                CartCommand::SetAmount {
                    product_id,
                    amount,
                    reply,
                } => {
                    let result = self.set_item_amount(product_id, amount).await;
                    self.finish(CartOperation::SetAmount, result, reply);
                }
                CartCommand::Clear { reply } => {
                    let result = self.commit(Cart::new(), None).await;
                    self.finish(CartOperation::Clear, result, reply);
                }
                CartCommand::Shutdown => {
                    info!("Cart controller shutting down");
                    break;
                }
            }
        }
    }

    fn current(&self) -> Arc<Cart> {
        self.cart_tx.borrow().clone()
    }

    async fn add_item(&self, product_id: ProductId) -> CartResult<CartUpdate> {
        debug!(product_id = %product_id, "add_item");

        let cart = self.current();
        let stock = self.fetch_stock(product_id).await?;

        if cart.contains(product_id) {
            let next = cart.increment(product_id, &stock)?;
            return self.commit(next, None).await;
        }

        // A sold-out product never reaches the catalog.
        stock.ensure_covers(1)?;

        let product = self.fetch_product(product_id).await?;
        let next = cart.insert(&product, &stock)?;
        self.commit(next, Some(Notice::added(&product.title))).await
    }

    async fn remove_item(&self, product_id: ProductId) -> CartResult<CartUpdate> {
        debug!(product_id = %product_id, "remove_item");

        let next = self.current().remove(product_id)?;
        self.commit(next, None).await
    }

    async fn set_item_amount(&self, product_id: ProductId, amount: i64) -> CartResult<CartUpdate> {
        debug!(product_id = %product_id, amount, "set_item_amount");

        ensure_positive(amount)?;

        let stock = self.fetch_stock(product_id).await?;
        let next = self.current().set_amount(product_id, amount, &stock)?;
        self.commit(next, None).await
    }

    /// Persists `next`, then publishes it.
    async fn commit(&self, next: Cart, notice: Option<Notice>) -> CartResult<CartUpdate> {
        self.store.save(&self.storage_key, &next).await?;

        let cart = Arc::new(next);
        self.cart_tx.send_replace(cart.clone());

        debug!(
            items = cart.item_count(),
            quantity = cart.total_quantity(),
            "Cart published"
        );

        Ok(CartUpdate { cart, notice })
    }

    /// Emits the notice for `result` and replies to the caller.
    fn finish(&self, operation: CartOperation, result: CartResult<CartUpdate>, reply: Reply) {
        match &result {
            Ok(update) => {
                if let Some(ref notice) = update.notice {
                    self.notifier.notify(notice);
                }
            }
            Err(e) => {
                match e {
                    CartError::Collaborator(_) | CartError::Persistence(_) => {
                        error!(operation = %operation, error = %e, "Cart operation failed")
                    }
                    _ => warn!(operation = %operation, error = %e, "Cart operation rejected"),
                }
                self.notifier.notify(&e.notice(operation));
            }
        }

        if reply.send(result).is_err() {
            debug!(operation = %operation, "Caller went away before the reply");
        }
    }

    async fn fetch_stock(&self, product_id: ProductId) -> CartResult<StockRecord> {
        let stock = self.stock.stock(product_id).await?;

        if stock.id != product_id {
            return Err(LookupError::Invalid(format!(
                "asked for stock of product {}, got product {}",
                product_id, stock.id
            ))
            .into());
        }

        validate_stock_record(&stock).map_err(|e| LookupError::Invalid(e.to_string()))?;
        Ok(stock)
    }

    async fn fetch_product(&self, product_id: ProductId) -> CartResult<ProductRecord> {
        let product = self.catalog.product(product_id).await?;

        if product.id != product_id {
            return Err(LookupError::Invalid(format!(
                "asked for product {}, got product {}",
                product_id, product.id
            ))
            .into());
        }

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCartStore, StaticInventory};
    use crate::notify::ChannelNotifier;
    use async_trait::async_trait;
    use rocketcart_core::{LineItem, LookupResult, NoticeLevel};

    const KEY: &str = "@RocketShoes:cart";

    fn product(id: u64) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id),
            title: format!("Product {}", id),
            price: 139.9,
            image_url: format!("https://example.com/{}.jpg", id),
        }
    }

    fn cart_of(entries: &[(u64, i64)]) -> Cart {
        Cart::from_items(
            entries
                .iter()
                .map(|&(id, amount)| LineItem::from_product(&product(id), amount))
                .collect(),
        )
        .unwrap()
    }

    fn amounts(cart: &Cart) -> Vec<(u64, i64)> {
        cart.items().iter().map(|i| (i.id.get(), i.amount)).collect()
    }

    /// Answers every lookup with a record for a different product.
    struct MislabelledInventory {
        stock_shift: u64,
        product_shift: u64,
    }

    #[async_trait]
    impl StockLookup for MislabelledInventory {
        async fn stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
            Ok(StockRecord {
                id: ProductId::new(product_id.get() + self.stock_shift),
                amount: 5,
            })
        }
    }

    #[async_trait]
    impl CatalogLookup for MislabelledInventory {
        async fn product(&self, product_id: ProductId) -> LookupResult<ProductRecord> {
            Ok(product(product_id.get() + self.product_shift))
        }
    }

    async fn start_controller(
        stock: Arc<dyn StockLookup>,
        catalog: Arc<dyn CatalogLookup>,
        store: Arc<MemoryCartStore>,
    ) -> (CartHandle, mpsc::UnboundedReceiver<Notice>) {
        let (notifier, notices) = ChannelNotifier::new();

        let handle = CartController::new(
            &EngineConfig::default(),
            stock,
            catalog,
            store,
            Arc::new(notifier),
        )
        .start()
        .await;

        (handle, notices)
    }

    fn drain(notices: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
        let mut out = Vec::new();
        while let Ok(notice) = notices.try_recv() {
            out.push(notice);
        }
        out
    }

    struct Harness {
        handle: CartHandle,
        inventory: Arc<StaticInventory>,
        store: Arc<MemoryCartStore>,
        notices: mpsc::UnboundedReceiver<Notice>,
    }

    impl Harness {
        async fn start(initial: &[(u64, i64)], stock: &[(u64, i64)]) -> Harness {
            let inventory = stock
                .iter()
                .fold(StaticInventory::new(), |inv, &(id, amount)| {
                    inv.with_product(product(id), amount)
                });
            let store = MemoryCartStore::new()
                .with_cart(KEY, &cart_of(initial))
                .unwrap();
            Harness::start_with(Arc::new(inventory), Arc::new(store)).await
        }

        async fn start_with(inventory: Arc<StaticInventory>, store: Arc<MemoryCartStore>) -> Harness {
            let (handle, notices) =
                start_controller(inventory.clone(), inventory.clone(), store.clone()).await;

            Harness {
                handle,
                inventory,
                store,
                notices,
            }
        }

        fn drain(&mut self) -> Vec<Notice> {
            drain(&mut self.notices)
        }

        async fn stored(&self) -> Cart {
            self.store.load(KEY).await.unwrap().unwrap_or_default()
        }
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_new_product() {
        let mut h = Harness::start(&[], &[(1, 5)]).await;

        let update = h.handle.add_item(ProductId::new(1)).await.unwrap();

        assert_eq!(amounts(&update.cart), vec![(1, 1)]);
        assert_eq!(update.cart.items()[0].title, "Product 1");

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert_eq!(notices[0].message, "Added Product 1 to the cart");
        assert_eq!(update.notice, Some(notices[0].clone()));
    }

    #[tokio::test]
    async fn test_add_at_stock_limit_is_rejected() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 1)]).await;

        let result = h.handle.add_item(ProductId::new(1)).await;

        assert!(matches!(result, Err(CartError::StockExceeded { .. })));
        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert_eq!(notices[0].message, "Requested quantity is out of stock");
    }

    #[tokio::test]
    async fn test_set_amount_within_stock() {
        let mut h = Harness::start(&[(1, 2)], &[(1, 5)]).await;

        let update = h.handle.set_item_amount(ProductId::new(1), 4).await.unwrap();

        assert_eq!(amounts(&update.cart), vec![(1, 4)]);
        assert!(update.notice.is_none());
        assert!(h.drain().is_empty());
        assert_eq!(h.stored().await, *update.cart);
    }

    #[tokio::test]
    async fn test_set_amount_zero_never_removes() {
        let mut h = Harness::start(&[(1, 2)], &[(1, 5)]).await;

        let result = h.handle.set_item_amount(ProductId::new(1), 0).await;

        assert!(matches!(result, Err(CartError::InvalidAmount(0))));
        assert_eq!(amounts(&h.handle.cart()), vec![(1, 2)]);

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to change product quantity");
    }

    #[tokio::test]
    async fn test_remove_item() {
        let mut h = Harness::start(&[(1, 1), (2, 1)], &[(1, 5), (2, 5)]).await;

        let update = h.handle.remove_item(ProductId::new(1)).await.unwrap();

        assert_eq!(amounts(&update.cart), vec![(2, 1)]);
        assert!(h.drain().is_empty());
        assert_eq!(amounts(&h.stored().await), vec![(2, 1)]);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_overlapping_adds_keep_products_unique() {
        let h = Harness::start(&[], &[(1, 3), (2, 10)]).await;

        let mut tasks = Vec::new();
        for i in 0..8u64 {
            let handle = h.handle.clone();
            let id = ProductId::new(1 + i % 2);
            tasks.push(tokio::spawn(async move { handle.add_item(id).await }));
        }

        let mut rejected = 0;
        for task in tasks {
            if task.await.unwrap().is_err() {
                rejected += 1;
            }
        }

        let cart = h.handle.cart();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 3);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 4);
        assert_eq!(rejected, 1);
        assert_eq!(h.stored().await, *cart);
    }

    #[tokio::test]
    async fn test_amounts_bounded_by_observed_stock() {
        let mut h = Harness::start(&[(1, 2)], &[(1, 5)]).await;

        h.inventory.set_stock(ProductId::new(1), 2).await;

        assert!(matches!(
            h.handle.add_item(ProductId::new(1)).await,
            Err(CartError::StockExceeded {
                available: 2,
                requested: 3,
                ..
            })
        ));
        assert!(matches!(
            h.handle.set_item_amount(ProductId::new(1), 3).await,
            Err(CartError::StockExceeded { .. })
        ));

        let update = h.handle.set_item_amount(ProductId::new(1), 1).await.unwrap();
        assert_eq!(amounts(&update.cart), vec![(1, 1)]);

        let notices = h.drain();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.message == "Requested quantity is out of stock"));
    }

    #[tokio::test]
    async fn test_missing_product_leaves_cart_unchanged() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 5), (9, 5)]).await;

        let result = h.handle.remove_item(ProductId::new(9)).await;
        assert!(matches!(result, Err(CartError::NotFoundInCart(_))));
        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to remove product");

        let result = h.handle.set_item_amount(ProductId::new(9), 2).await;
        assert!(matches!(result, Err(CartError::NotFoundInCart(_))));
        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to change product quantity");

        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_stored_cart_survives_restart() {
        let h = Harness::start(&[], &[(1, 5), (2, 5), (3, 5)]).await;

        for id in [3, 1, 2, 1] {
            h.handle.add_item(ProductId::new(id)).await.unwrap();
        }
        let before = h.handle.cart();
        h.handle.shutdown().await.unwrap();

        let restarted = Harness::start_with(h.inventory.clone(), h.store.clone()).await;
        assert_eq!(*restarted.handle.cart(), *before);
        assert_eq!(amounts(&before), vec![(3, 1), (1, 2), (2, 1)]);
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 5)]).await;

        assert!(h.handle.remove_item(ProductId::new(1)).await.is_ok());
        assert!(matches!(
            h.handle.remove_item(ProductId::new(1)).await,
            Err(CartError::NotFoundInCart(_))
        ));

        assert!(h.handle.cart().is_empty());
        assert_eq!(h.store.write_count(), 1);
        assert_eq!(h.drain().len(), 1);
    }

    // -------------------------------------------------------------------------
    // Failure paths
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sold_out_new_product_skips_catalog() {
        let mut h = Harness::start(&[], &[(1, 0)]).await;

        let result = h.handle.add_item(ProductId::new(1)).await;

        assert!(matches!(result, Err(CartError::StockExceeded { .. })));
        assert!(h.handle.cart().is_empty());
        assert_eq!(h.inventory.catalog_lookups(), 0);

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Requested quantity is out of stock");
    }

    #[tokio::test]
    async fn test_lookup_failure() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 5)]).await;
        h.inventory.set_failing(true);

        let result = h.handle.add_item(ProductId::new(1)).await;
        assert!(matches!(result, Err(CartError::Collaborator(_))));
        assert_eq!(h.drain()[0].message, "Failed to add product");

        let result = h.handle.set_item_amount(ProductId::new(1), 2).await;
        assert!(matches!(result, Err(CartError::Collaborator(_))));
        assert_eq!(h.drain()[0].message, "Failed to change product quantity");

        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_catalog_failure_after_stock_lookup() {
        let mut h = Harness::start(&[], &[(1, 5)]).await;
        h.inventory.set_catalog_failing(true);

        let result = h.handle.add_item(ProductId::new(1)).await;

        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Status { status: 500, .. }))
        ));
        assert!(h.handle.cart().is_empty());
        assert_eq!(h.store.write_count(), 0);

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_negative_stock_is_rejected() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 5)]).await;
        h.inventory.set_stock(ProductId::new(1), -3).await;

        let result = h.handle.add_item(ProductId::new(1)).await;
        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Invalid(_)))
        ));
        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to add product");

        let result = h.handle.set_item_amount(ProductId::new(1), 1).await;
        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Invalid(_)))
        ));
        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to change product quantity");

        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_stock_for_another_product_is_rejected() {
        let store = Arc::new(
            MemoryCartStore::new()
                .with_cart(KEY, &cart_of(&[(1, 1)]))
                .unwrap(),
        );
        let inventory = Arc::new(MislabelledInventory {
            stock_shift: 1,
            product_shift: 0,
        });
        let (handle, mut notices) =
            start_controller(inventory.clone(), inventory, store.clone()).await;

        let result = handle.add_item(ProductId::new(1)).await;
        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Invalid(_)))
        ));
        let seen = drain(&mut notices);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "Failed to add product");

        let result = handle.set_item_amount(ProductId::new(1), 2).await;
        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Invalid(_)))
        ));
        let seen = drain(&mut notices);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "Failed to change product quantity");

        assert_eq!(amounts(&handle.cart()), vec![(1, 1)]);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_record_for_another_product_is_rejected() {
        let store = Arc::new(MemoryCartStore::new());
        let inventory = Arc::new(MislabelledInventory {
            stock_shift: 0,
            product_shift: 1,
        });
        let (handle, mut notices) =
            start_controller(inventory.clone(), inventory, store.clone()).await;

        let result = handle.add_item(ProductId::new(1)).await;

        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::Invalid(_)))
        ));
        assert!(handle.cart().is_empty());
        assert_eq!(store.write_count(), 0);

        let seen = drain(&mut notices);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "Failed to add product");
    }

    #[tokio::test]
    async fn test_add_at_max_amount_keeps_controller_running() {
        let mut h = Harness::start(&[(1, i64::MAX)], &[(1, 5)]).await;

        let result = h.handle.add_item(ProductId::new(1)).await;

        assert!(matches!(result, Err(CartError::StockExceeded { .. })));
        assert_eq!(amounts(&h.handle.cart()), vec![(1, i64::MAX)]);
        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Requested quantity is out of stock");

        let update = h.handle.remove_item(ProductId::new(1)).await.unwrap();
        assert!(update.cart.is_empty());
        assert!(h.stored().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let mut h = Harness::start(&[], &[]).await;

        let result = h.handle.add_item(ProductId::new(42)).await;
        assert!(matches!(
            result,
            Err(CartError::Collaborator(LookupError::NotFound(_)))
        ));
        assert_eq!(h.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_persistence_failure_publishes_nothing() {
        let mut h = Harness::start(&[(1, 1)], &[(1, 5), (2, 5)]).await;
        let mut updates = h.handle.subscribe();
        h.store.set_fail_writes(true);

        let result = h.handle.add_item(ProductId::new(2)).await;

        assert!(matches!(result, Err(CartError::Persistence(_))));
        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);
        assert_eq!(amounts(&h.stored().await), vec![(1, 1)]);
        assert!(!updates.has_changed().unwrap());

        let notices = h.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Failed to add product");

        h.store.set_fail_writes(false);
        assert!(h.handle.add_item(ProductId::new(2)).await.is_ok());
        assert!(updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let store = Arc::new(MemoryCartStore::new().with_raw(KEY, "{\"broken\""));
        let inventory = Arc::new(StaticInventory::new().with_product(product(1), 5));
        let h = Harness::start_with(inventory, store).await;

        assert!(h.handle.cart().is_empty());

        h.handle.add_item(ProductId::new(1)).await.unwrap();
        assert_eq!(amounts(&h.stored().await), vec![(1, 1)]);
    }

    // -------------------------------------------------------------------------
    // Handle
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_subscribe_sees_each_replacement() {
        let h = Harness::start(&[], &[(1, 5)]).await;
        let mut updates = h.handle.subscribe();

        h.handle.add_item(ProductId::new(1)).await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(amounts(&updates.borrow_and_update()), vec![(1, 1)]);

        h.handle.add_item(ProductId::new(1)).await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(amounts(&updates.borrow_and_update()), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn test_clear() {
        let mut h = Harness::start(&[(1, 2), (2, 1)], &[]).await;

        let update = h.handle.clear().await.unwrap();

        assert!(update.cart.is_empty());
        assert!(h.stored().await.is_empty());
        assert!(h.drain().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_closes_handle() {
        let h = Harness::start(&[(1, 1)], &[(1, 5)]).await;

        h.handle.shutdown().await.unwrap();

        assert!(matches!(
            h.handle.add_item(ProductId::new(1)).await,
            Err(CartError::ControllerClosed)
        ));
        assert_eq!(amounts(&h.handle.cart()), vec![(1, 1)]);
    }
}
