//! Home Page

use leptos::prelude::*;
use shop_core::catalog;

use crate::components::ProductCard;

/// Products featured on the landing page
const FEATURED: usize = 4;

#[component]
pub fn HomePage() -> impl IntoView {
    let featured: Vec<_> = catalog().into_iter().take(FEATURED).collect();

    view! {
        <div class="home">
            <header class="hero">
                <h1>"Raven"</h1>
                <p class="tagline">"Streetwear cut for the night shift"</p>
                <div class="cta">
                    <a href="/collections" class="btn btn-primary">"Shop the Collection"</a>
                    <a href="/contact" class="btn">"Get in Touch"</a>
                </div>
            </header>

            <section class="featured">
                <h2>"Featured"</h2>
                <div class="product-grid">
                    {featured
                        .into_iter()
                        .map(|product| view! { <ProductCard product=product enquire=true /> })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
