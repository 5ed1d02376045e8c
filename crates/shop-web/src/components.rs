//! UI Components

use std::time::Duration;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use shop_core::{CartController, CartItem, Product, format_price};

use crate::storage::LocalStorage;

/// How long the "added to cart" toast stays up
const TOAST_DURATION: Duration = Duration::from_millis(1800);

/// Cart shared by every page through context
#[derive(Clone, Copy)]
pub struct CartState {
    pub controller: RwSignal<CartController<LocalStorage>>,
    pub drawer_open: RwSignal<bool>,
    toast: RwSignal<Option<String>>,
    toast_seq: RwSignal<u32>,
}

impl CartState {
    /// Restore the cart saved in this browser
    pub fn load() -> Self {
        Self {
            controller: RwSignal::new(CartController::load(LocalStorage)),
            drawer_open: RwSignal::new(false),
            toast: RwSignal::new(None),
            toast_seq: RwSignal::new(0),
        }
    }

    pub fn count(&self) -> u32 {
        self.controller.with(|c| c.cart().count())
    }

    pub fn add(&self, product: &Product) {
        let mut message = String::new();
        self.controller.update(|c| message = c.add(product));
        self.show_toast(message);
    }

    pub fn increase(&self, id: &str) {
        self.controller.update(|c| {
            c.increase(id);
        });
    }

    pub fn decrease(&self, id: &str) {
        self.controller.update(|c| {
            c.decrease(id);
        });
    }

    pub fn remove(&self, id: &str) {
        self.controller.update(|c| {
            c.remove(id);
        });
    }

    fn show_toast(&self, message: String) {
        let seq = self.toast_seq.get_untracked().wrapping_add(1);
        self.toast_seq.set(seq);
        self.toast.set(Some(message));

        // Only the latest toast may hide itself
        let (toast, toast_seq) = (self.toast, self.toast_seq);
        set_timeout(
            move || {
                if toast_seq.get_untracked() == seq {
                    toast.set(None);
                }
            },
            TOAST_DURATION,
        );
    }
}

/// Site navigation with the cart badge
#[component]
pub fn SiteHeader() -> impl IntoView {
    let cart = expect_context::<CartState>();

    view! {
        <header class="site-header">
            <a href="/" class="logo">"RAVEN"</a>
            <nav>
                <a href="/">"Home"</a>
                <a href="/collections">"Collections"</a>
                <a href="/contact">"Contact"</a>
            </nav>
            <button class="cart-trigger" on:click=move |_| cart.drawer_open.set(true)>
                "Cart "
                <span class="cart-count">{move || cart.count()}</span>
            </button>
        </header>
    }
}

/// Product tile
///
/// With `enquire` set the buy button links to the contact form instead of
/// adding to the cart.
#[component]
pub fn ProductCard(product: Product, #[prop(optional)] enquire: bool) -> impl IntoView {
    let cart = expect_context::<CartState>();
    let price = format_price(product.price);

    let action = if enquire {
        let href = format!("/contact?item={}", product.id);
        view! { <a class="buy-btn" href=href>"Buy Now"</a> }.into_any()
    } else {
        let item = product.clone();
        view! {
            <button
                class="buy-btn"
                on:click=move |_| {
                    cart.add(&item);
                    cart.drawer_open.set(true);
                }
            >
                "Add to Cart"
            </button>
        }
        .into_any()
    };

    view! {
        <div class="product-box">
            <img src=product.image alt=product.name.clone() />
            <h4>{product.name}</h4>
            <p class="price">{price}</p>
            {action}
        </div>
    }
}

#[component]
fn CartLine(item: CartItem) -> impl IntoView {
    let cart = expect_context::<CartState>();
    let (dec, inc, rm) = (item.id.clone(), item.id.clone(), item.id.clone());

    view! {
        <div class="cart-item">
            <div class="cart-item-image">
                <img src=item.image alt=item.name.clone() />
            </div>
            <div class="cart-item-body">
                <p class="cart-item-name">{item.name}</p>
                <p class="cart-item-price">{format_price(item.price)}</p>
                <div class="cart-item-actions">
                    <button type="button" aria-label="Decrease quantity" on:click=move |_| cart.decrease(&dec)>
                        "-"
                    </button>
                    <span>{item.quantity}</span>
                    <button type="button" aria-label="Increase quantity" on:click=move |_| cart.increase(&inc)>
                        "+"
                    </button>
                    <button type="button" on:click=move |_| cart.remove(&rm)>
                        "Remove"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Slide-out cart with quantity controls
#[component]
pub fn CartDrawer() -> impl IntoView {
    let cart = expect_context::<CartState>();
    let navigate = use_navigate();

    let open = move || cart.drawer_open.get();
    let close = move |_| cart.drawer_open.set(false);
    let lines = move || cart.controller.with(|c| c.cart().items().to_vec());
    let is_empty = move || cart.controller.with(|c| c.cart().is_empty());
    let total = move || cart.controller.with(|c| format_price(c.cart().total()));

    view! {
        <div class="cart-overlay" hidden=move || !open() on:click=close></div>
        <aside class="cart-drawer" class:open=open aria-hidden=move || (!open()).to_string()>
            <div class="cart-header">
                <h3>"Your Cart"</h3>
                <button class="close-cart" aria-label="Close cart" on:click=close>"×"</button>
            </div>

            <div class="cart-items">
                <For
                    each=lines
                    key=|item| (item.id.clone(), item.quantity)
                    children=move |item| view! { <CartLine item=item /> }
                />
            </div>
            <p class="cart-empty" style:display=move || if is_empty() { "block" } else { "none" }>
                "Your cart is empty."
            </p>

            <div class="cart-footer">
                <span>"Total"</span>
                <strong class="cart-total">{total}</strong>
                <button
                    class="btn btn-primary cart-checkout"
                    disabled=is_empty
                    on:click=move |_| {
                        if !is_empty() {
                            cart.drawer_open.set(false);
                            navigate("/checkout", Default::default());
                        }
                    }
                >
                    "Checkout"
                </button>
            </div>
        </aside>
    }
}

/// "Added to cart" toast
#[component]
pub fn CartToast() -> impl IntoView {
    let cart = expect_context::<CartState>();

    view! {
        <div class="cart-toast" role="status" class:show=move || cart.toast.with(Option::is_some)>
            {move || cart.toast.get().unwrap_or_default()}
        </div>
    }
}
