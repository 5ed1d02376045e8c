//! Contact Page
//!
//! Product tiles outside the collections page link here with
//! `?item=<product id>` to open an order enquiry.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use shop_core::catalog;
use shop_core::contact::enquiry_message;

/// Display name for an `item` query value; unknown ids are shown as given
fn item_label(item: &str) -> String {
    catalog()
        .into_iter()
        .find(|p| p.id == item)
        .map_or_else(|| item.to_string(), |p| p.name)
}

#[component]
pub fn ContactPage() -> impl IntoView {
    let query = use_query_map();
    let initial = query
        .with_untracked(|q| q.get("item"))
        .and_then(|item| enquiry_message(&item_label(&item), ""))
        .unwrap_or_default();

    let (message, set_message) = signal(initial);

    view! {
        <div class="contact">
            <h1>"Contact"</h1>
            <p class="subtitle">"Questions about sizing or an order? Send us a note."</p>

            <form class="contact-form" action="mailto:orders@raven.example" method="post" enctype="text/plain">
                <label for="name">"Name"</label>
                <input id="name" name="name" type="text" required />

                <label for="email">"Email"</label>
                <input id="email" name="email" type="email" required />

                <label for="message">"Message"</label>
                <textarea
                    id="message"
                    name="message"
                    rows="6"
                    prop:value=move || message.get()
                    on:input=move |ev| set_message.set(event_target_value(&ev))
                />

                <button type="submit" class="btn btn-primary">"Send"</button>
            </form>
        </div>
    }
}
