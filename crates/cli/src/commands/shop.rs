//! Product browsing and the local cart.

use clap::Subcommand;

use lumiere_api::models::Product;
use lumiere_api::services::ProductService;
use lumiere_core::ProductId;
use lumiere_storefront::cart::{CartItem, CartStore};
use lumiere_storefront::checkout::CheckoutSummary;

use crate::context::{CliError, Context};

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List the catalog
    List,
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product (adds to the quantity already in the cart)
    Add {
        /// Product ID
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (values below 1 are ignored)
    Update {
        /// Product ID
        id: String,
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

pub async fn products(ctx: &Context, action: ProductsAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = ProductService::new(ctx.client().clone());
    match action {
        ProductsAction::List => {
            let products = service.list().await?;
            say!("{} products", products.len());
            for product in &products {
                say!("  {}", product_line(product));
            }
        }
        ProductsAction::Show { id } => {
            let product = service.get(&ProductId::new(id)).await?;
            say!("{}", product_line(&product));
            if let Some(category) = &product.category {
                say!("  category: {category}");
            }
            if let Some(stock) = product.stock {
                say!("  in stock: {stock}");
            }
            if let Some(description) = &product.description {
                say!("  {description}");
            }
        }
    }
    Ok(())
}

pub async fn cart(ctx: &Context, action: CartAction) -> Result<(), Box<dyn std::error::Error>> {
    let cart = ctx.cart();
    match action {
        CartAction::Show => {}
        CartAction::Add { id, quantity } => {
            let product = ProductService::new(ctx.client().clone())
                .get(&ProductId::new(id))
                .await?;
            say!("Adding {quantity} x {}", product.name);
            cart.add(product, quantity)?;
        }
        CartAction::Update { id, quantity } => {
            cart.update_quantity(&ProductId::new(id), quantity)?;
        }
        CartAction::Remove { id } => {
            cart.remove(&ProductId::new(id))?;
        }
        CartAction::Clear => cart.clear()?,
    }

    let items = cart.items();
    ensure_saved(&cart)?;
    show_cart(&items);
    Ok(())
}

/// A one-shot process loses an in-memory cart on exit, so a cart that fell
/// back to memory is an error here.
fn ensure_saved(cart: &CartStore) -> Result<(), CliError> {
    if cart.is_degraded() {
        Err(CliError::CartNotSaved)
    } else {
        Ok(())
    }
}

fn show_cart(items: &[CartItem]) {
    if items.is_empty() {
        say!("Your cart is empty");
        return;
    }

    for item in items {
        say!(
            "  {:>3} x {:<32} {:>14}  [{}]",
            item.quantity,
            item.product.name,
            item.line_total().to_string(),
            item.product.id
        );
    }
    let summary = CheckoutSummary::from_items(items);
    say!("  subtotal {}", summary.subtotal);
    say!("  shipping {}", summary.shipping);
    say!("  total    {}", summary.total);
}

fn product_line(product: &Product) -> String {
    let mut line = format!("{}  {}  {}", product.id, product.name, product.price);
    if let Some(original) = product.original_price.filter(|_| product.is_on_sale()) {
        line.push_str(&format!(" (was {original})"));
    }
    line
}
