//! Cart route handlers.
//!
//! The cart lives in the browser's session. Every change rewrites the whole
//! cart and answers with `HX-Trigger: cart-updated` so the navbar badge
//! refreshes; other tabs of the same browser hear it over `/events`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use fakeshop_core::{Cart, CartItem, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::FilterContext;
use crate::routes::nav::NavView;
use crate::state::AppState;
use crate::storage::{BrowserStorage, CollectionKind};

/// Cart row display data for templates.
#[derive(Clone)]
pub struct CartRowView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub decrement: i64,
    pub increment: i64,
}

impl From<&CartItem> for CartRowView {
    fn from(item: &CartItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            id: item.product.id,
            title: item.product.title.clone(),
            image: item.product.image.clone(),
            price: item.product.price.display_rounded(),
            quantity: item.quantity,
            decrement: quantity - 1,
            increment: quantity + 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub rows: Vec<CartRowView>,
    pub item_count: usize,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            rows: cart.items().iter().map(CartRowView::from).collect(),
            item_count: cart.len(),
            total: cart.total().display_rounded(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: NavView,
    pub cart: CartView,
}

/// Cart contents fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_contents.html")]
pub struct CartContentsTemplate {
    pub cart: CartView,
}

/// Add-to-cart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/add_to_cart.html")]
pub struct AddToCartTemplate {
    pub product_id: ProductId,
    pub added: bool,
}

fn cart_updated() -> AppendHeaders<[(&'static str, &'static str); 1]> {
    AppendHeaders([("HX-Trigger", CollectionKind::Cart.event_name())])
}

/// Display cart page.
#[instrument(skip(state, filter, storage), fields(browser = %storage.browser()))]
pub async fn show(
    State(state): State<AppState>,
    filter: FilterContext,
    storage: BrowserStorage,
) -> Result<impl IntoResponse> {
    let cart: Cart = storage.load().await?;

    Ok(CartShowTemplate {
        nav: NavView::new(&filter, state.config()),
        cart: CartView::from(&cart),
    })
}

/// Add a product to the cart (HTMX).
///
/// Always appends a new row with quantity 1, even when the product is
/// already in the cart. Returns the action panel's button in its "Added!"
/// state.
#[instrument(skip(state, storage), fields(browser = %storage.browser()))]
pub async fn add(
    State(state): State<AppState>,
    storage: BrowserStorage,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state
        .catalog()
        .get_product(form.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;
    let product_id = product.id;

    storage
        .modify(|cart: &mut Cart| {
            cart.add(product);
            Some(())
        })
        .await?;

    let id = product_id.to_string();
    add_breadcrumb("cart", "Added product", Some(&[("product_id", id.as_str())]));

    let button = AddToCartTemplate {
        product_id,
        added: true,
    };
    Ok((cart_updated(), button).into_response())
}

/// Add-to-cart button in its resting state (HTMX).
///
/// The "Added!" button requests this shortly after it is shown to revert
/// its label.
pub async fn add_button(Query(form): Query<AddToCartForm>) -> impl IntoResponse {
    AddToCartTemplate {
        product_id: form.product_id,
        added: false,
    }
}

/// Change the quantity of a product's rows (HTMX).
///
/// Quantities below 1 are ignored: the cart is left untouched and no
/// notification is sent.
#[instrument(skip(storage), fields(browser = %storage.browser()))]
pub async fn update(storage: BrowserStorage, Form(form): Form<UpdateCartForm>) -> Result<Response> {
    let updated = storage
        .modify(|cart: &mut Cart| {
            match cart.set_quantity(form.product_id, form.quantity) {
                Ok(rows) => Some(rows),
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring quantity change");
                    None
                }
            }
        })
        .await?;

    contents(&storage, updated.is_some()).await
}

/// Remove every row of a product from the cart (HTMX).
#[instrument(skip(storage), fields(browser = %storage.browser()))]
pub async fn remove(
    storage: BrowserStorage,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    storage
        .modify(|cart: &mut Cart| Some(cart.remove(form.product_id)))
        .await?;

    contents(&storage, true).await
}

/// Render the refreshed cart contents, announcing the change if one was written.
async fn contents(storage: &BrowserStorage, changed: bool) -> Result<Response> {
    let cart: Cart = storage.load().await?;
    let template = CartContentsTemplate {
        cart: CartView::from(&cart),
    };

    if changed {
        Ok((cart_updated(), template).into_response())
    } else {
        Ok(template.into_response())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fakeshop_core::{Price, Product, Rating};

    use super::*;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            category: "electronics".to_string(),
            image: String::new(),
            description: String::new(),
            rating: Rating {
                rate: 4.1,
                count: 10,
            },
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::default();
        cart.add(product(1, 1000));
        cart.add(product(2, 550));
        cart.set_quantity(ProductId::new(1), 2).unwrap();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "$25.50");
        assert_eq!(view.rows[0].price, "$10.00");
        assert_eq!(view.rows[0].decrement, 1);
        assert_eq!(view.rows[0].increment, 3);
    }

    #[test]
    fn test_added_button_reverts_after_delay() {
        let html = AddToCartTemplate {
            product_id: ProductId::new(7),
            added: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("Added!"));
        assert!(html.contains("hx-get=\"/cart/button?product_id=7\""));
        assert!(html.contains("hx-trigger=\"load delay:300ms\""));

        let html = AddToCartTemplate {
            product_id: ProductId::new(7),
            added: false,
        }
        .render()
        .unwrap();
        assert!(html.contains("Add to Cart"));
        assert!(!html.contains("/cart/button"));
        assert!(html.contains("hx-post=\"/cart/add\""));
    }

    #[test]
    fn test_empty_cart_renders_empty_state() {
        let html = CartContentsTemplate {
            cart: CartView::from(&Cart::default()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your cart is empty"));
        assert!(html.contains("Continue Shopping"));
        assert!(!html.contains("Order Summary"));
    }

    #[test]
    fn test_cart_renders_summary() {
        let mut cart = Cart::default();
        cart.add(product(4, 1999));

        let html = CartContentsTemplate {
            cart: CartView::from(&cart),
        }
        .render()
        .unwrap();

        assert!(html.contains("Order Summary"));
        assert!(html.contains("$19.99"));
        assert!(html.contains("Free"));
        assert!(html.contains("Proceed to Checkout"));
    }
}
