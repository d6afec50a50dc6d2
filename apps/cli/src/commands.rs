//! # Cart Commands
//!
//! One subcommand per cart operation. Each runs against a started
//! [`CartHandle`] and yields the resulting cart.

use std::sync::Arc;

use clap::Subcommand;
use rocketcart_core::{
    Cart, CartOperation, CartResult, CartStore, CatalogLookup, Notice, ProductId, StockLookup,
};
use rocketcart_engine::{CartController, CartHandle, CartUpdate, EngineConfig, NoOpNotifier};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Print the current cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },

    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },

    /// Set the amount of a product already in the cart
    Set {
        /// Product ID
        id: ProductId,

        /// New amount (must be at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Empty the cart
    Clear,
}

impl Command {
    /// The cart operation this command performs, if it mutates.
    pub fn operation(&self) -> Option<CartOperation> {
        match self {
            Command::Show => None,
            Command::Add { .. } => Some(CartOperation::Add),
            Command::Remove { .. } => Some(CartOperation::Remove),
            Command::Set { .. } => Some(CartOperation::SetAmount),
            Command::Clear => Some(CartOperation::Clear),
        }
    }
}

/// What a successful command prints.
#[derive(Debug, Serialize)]
pub struct CommandOutput {
    pub items: Cart,
    pub item_count: usize,
    pub total_quantity: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl CommandOutput {
    fn new(cart: &Cart, notice: Option<Notice>) -> Self {
        CommandOutput {
            items: cart.clone(),
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            notice,
        }
    }
}

impl From<CartUpdate> for CommandOutput {
    fn from(update: CartUpdate) -> Self {
        CommandOutput::new(&update.cart, update.notice)
    }
}

/// Builds the controller the CLI runs commands against.
///
/// Notices reach the user through [`CommandOutput`] or the error report, so
/// the controller's own sink discards them.
pub fn controller(
    config: &EngineConfig,
    stock: Arc<dyn StockLookup>,
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn CartStore>,
) -> CartController {
    CartController::new(config, stock, catalog, store, Arc::new(NoOpNotifier))
}

/// Runs `command` against the cart.
pub async fn run(command: &Command, cart: &CartHandle) -> CartResult<CommandOutput> {
    let update = match *command {
        Command::Show => return Ok(CommandOutput::new(&cart.cart(), None)),
        Command::Add { id } => cart.add_item(id).await?,
        Command::Remove { id } => cart.remove_item(id).await?,
        Command::Set { id, amount } => cart.set_item_amount(id, amount).await?,
        Command::Clear => cart.clear().await?,
    };

    Ok(update.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use rocketcart_core::{CartError, ProductRecord};
    use rocketcart_engine::{MemoryCartStore, StaticInventory};

    fn shoe(id: u64) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(id),
            title: "Tênis de Caminhada Leve Confortável".to_string(),
            price: 179.9,
            image_url: format!("https://example.com/{}.jpg", id),
        }
    }

    async fn start() -> CartHandle {
        let inventory = Arc::new(
            StaticInventory::new()
                .with_product(shoe(1), 2)
                .with_product(shoe(2), 0),
        );

        controller(
            &EngineConfig::default(),
            inventory.clone(),
            inventory,
            Arc::new(MemoryCartStore::new()),
        )
        .start()
        .await
    }

    #[tokio::test]
    async fn test_add_then_show() {
        let cart = start().await;

        let added = run(&Command::Add { id: ProductId::new(1) }, &cart)
            .await
            .unwrap();
        assert_eq!(added.item_count, 1);
        assert!(added.notice.is_some());

        let shown = run(&Command::Show, &cart).await.unwrap();
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["items"][0]["id"], 1);
        assert_eq!(json["items"][0]["amount"], 1);
        assert_eq!(json["total_quantity"], 1);
        assert!(json.get("notice").is_none());
    }

    #[tokio::test]
    async fn test_set_negative_amount_is_rejected() {
        let cart = start().await;
        run(&Command::Add { id: ProductId::new(1) }, &cart)
            .await
            .unwrap();

        let result = run(
            &Command::Set {
                id: ProductId::new(1),
                amount: -1,
            },
            &cart,
        )
        .await;

        assert!(matches!(result, Err(CartError::InvalidAmount(-1))));
    }

    #[tokio::test]
    async fn test_failed_add_reports_notice_once() {
        let cart = start().await;
        let command = Command::Add { id: ProductId::new(2) };

        let err = CliError::from(run(&command, &cart).await.unwrap_err());
        let report = err.report(command.operation());

        assert_eq!(report.code, "STOCK_EXCEEDED");
        assert_eq!(
            report.notice.as_deref(),
            Some("Requested quantity is out of stock")
        );
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_operations() {
        assert_eq!(Command::Show.operation(), None);
        assert_eq!(Command::Clear.operation(), Some(CartOperation::Clear));
        assert_eq!(
            Command::Set {
                id: ProductId::new(1),
                amount: 2
            }
            .operation(),
            Some(CartOperation::SetAmount)
        );
    }
}
