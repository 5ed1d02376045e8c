//! Page Components

mod checkout;
mod collections;
mod contact;
mod home;

pub use checkout::CheckoutPage;
pub use collections::CollectionsPage;
pub use contact::ContactPage;
pub use home::HomePage;
