//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::components::{CartDrawer, CartState, CartToast, SiteHeader};
use crate::pages::{CheckoutPage, CollectionsPage, ContactPage, HomePage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_context(CartState::load());

    view! {
        <Router>
            <SiteHeader />
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/collections") view=CollectionsPage />
                    <Route path=path!("/checkout") view=CheckoutPage />
                    <Route path=path!("/contact") view=ContactPage />
                </Routes>
            </main>
            <CartDrawer />
            <CartToast />
        </Router>
    }
}
