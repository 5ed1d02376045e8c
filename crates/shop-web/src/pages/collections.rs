//! Collections Page

use leptos::prelude::*;
use shop_core::catalog::{ALL_CATEGORIES, categories};
use shop_core::{CatalogFilter, catalog};

use crate::components::ProductCard;

#[component]
pub fn CollectionsPage() -> impl IntoView {
    let products = StoredValue::new(catalog());
    let (category, set_category) = signal(ALL_CATEGORIES.to_string());
    let (search, set_search) = signal(String::new());

    let mut filters = vec![ALL_CATEGORIES.to_string()];
    filters.extend(products.with_value(|p| categories(p)));

    let visible = move || {
        let filter = CatalogFilter::new()
            .with_category(&category.get())
            .with_query(&search.get());
        products.with_value(|p| filter.apply(p).into_iter().cloned().collect::<Vec<_>>())
    };

    view! {
        <div class="collections">
            <h1>"Collections"</h1>

            <div class="catalog-controls">
                <div class="filters">
                    {filters
                        .into_iter()
                        .map(|name| {
                            let value = name.clone();
                            let label = name.clone();
                            view! {
                                <button
                                    class="filter-btn"
                                    class:active=move || category.get() == name
                                    on:click=move |_| set_category.set(value.clone())
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
                <input
                    type="search"
                    class="search"
                    placeholder="Search products..."
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
            </div>

            <div class="product-grid">
                <For
                    each=visible
                    key=|product| product.id.clone()
                    children=move |product| view! { <ProductCard product=product /> }
                />
            </div>
            <Show when=move || visible().is_empty()>
                <p class="catalog-empty">"No products match your search."</p>
            </Show>
        </div>
    }
}
