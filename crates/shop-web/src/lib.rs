//! raven-shop Web Frontend
//!
//! Leptos-based WASM storefront: catalog, cart drawer and checkout. The cart
//! lives in `localStorage` so it survives the round trip through Stripe's
//! hosted payment page.

mod api;
mod app;
mod components;
mod pages;
mod storage;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
