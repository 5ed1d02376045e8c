//! # shop-core
//!
//! Storefront domain shared by the browser client and the server.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Browser                                │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │   Catalog   │──│  CartController  │──│   CartStorage   │  │
//! │  │  (filter)   │  │  (state machine) │  │ (localStorage)  │  │
//! │  └─────────────┘  └──────────────────┘  └─────────────────┘  │
//! │                            │                                  │
//! │                   CreateSessionRequest                        │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              ▼
//!                        shop-server API
//! ```
//!
//! Nothing here performs I/O beyond the `CartStorage` trait, so the crate
//! builds for both native and `wasm32` targets.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod error;
pub mod money;

pub use api::{CheckoutLine, CreateSessionRequest, Customer, ErrorResponse, SessionStatus};
pub use cart::{CART_STORAGE_KEY, Cart, CartController, CartItem, CartStorage, MemoryCartStorage};
pub use catalog::{CatalogFilter, Product, catalog, slugify};
pub use checkout::{PaymentNotice, ReturnStatus};
pub use error::{Result, ShopError};
pub use money::format_price;
