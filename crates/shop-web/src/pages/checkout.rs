//! Checkout Page
//!
//! Collects the customer's details, hands the cart to the server for a
//! hosted payment session, and confirms the session when Stripe redirects
//! back with `?status=success&session_id=..`.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use shop_core::api::CreateSessionRequest;
use shop_core::checkout::{
    CREATING_SESSION_MESSAGE, START_FAILED_MESSAGE, confirm_session, validate_customer,
};
use shop_core::{PaymentNotice, ReturnStatus, format_price};

use crate::api;
use crate::components::CartState;

#[component]
pub fn CheckoutPage() -> impl IntoView {
    let cart = expect_context::<CartState>();
    let query = use_query_map();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let notice = RwSignal::new(None::<PaymentNotice>);
    let redirecting = RwSignal::new(false);
    let completed = RwSignal::new(false);

    let return_status = query.with_untracked(|q| {
        ReturnStatus::from_query(q.get("status").as_deref(), q.get("session_id").as_deref())
    });
    notice.set(return_status.initial_notice());

    if let ReturnStatus::Success { session_id } = return_status {
        spawn_local(async move {
            let outcome = match api::fetch_session(&session_id).await {
                Ok(status) => {
                    let mut outcome = None;
                    cart.controller
                        .update(|c| outcome = Some(confirm_session(c, &status)));
                    completed.set(status.is_paid());
                    outcome
                }
                Err(e) => Some(PaymentNotice::Error(e)),
            };
            notice.set(outcome);
        });
    }

    let lines = move || cart.controller.with(|c| c.cart().items().to_vec());
    let is_empty = move || cart.controller.with(|c| c.cart().is_empty());
    let total = move || cart.controller.with(|c| format_price(c.cart().total()));

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if redirecting.get_untracked() || cart.controller.with_untracked(|c| c.cart().is_empty()) {
            return;
        }

        let customer = match validate_customer(&name.get_untracked(), &email.get_untracked()) {
            Ok(customer) => customer,
            Err(e) => {
                notice.set(Some(PaymentNotice::Error(e.user_message())));
                return;
            }
        };
        let request = cart
            .controller
            .with_untracked(|c| CreateSessionRequest::from_cart(c.cart(), customer));

        redirecting.set(true);
        notice.set(Some(PaymentNotice::Info(CREATING_SESSION_MESSAGE.into())));

        spawn_local(async move {
            let result = api::create_checkout_session(&request).await.and_then(|url| {
                web_sys::window()
                    .and_then(|w| w.location().set_href(&url).ok())
                    .ok_or_else(|| START_FAILED_MESSAGE.to_string())
            });

            if let Err(e) = result {
                notice.set(Some(PaymentNotice::Error(e)));
                redirecting.set(false);
            }
        });
    };

    let button_label = move || {
        if completed.get() {
            "Payment Complete"
        } else if redirecting.get() {
            "Redirecting..."
        } else {
            "Continue to Secure Payment"
        }
    };

    view! {
        <div class="checkout">
            <h1>"Checkout"</h1>

            <section class="order-summary">
                <h2>"Order Summary"</h2>
                <Show
                    when=move || !is_empty()
                    fallback=|| view! { <p class="checkout-note">"Your cart is empty. Please add products first."</p> }
                >
                    <For
                        each=lines
                        key=|item| (item.id.clone(), item.quantity)
                        children=move |item| {
                            view! {
                                <div class="summary-item">
                                    <span class="summary-item-name">{format!("{}x {}", item.quantity, item.name)}</span>
                                    <span class="summary-item-price">{format_price(item.line_total())}</span>
                                </div>
                            }
                        }
                    />
                </Show>
                <div class="summary-total">
                    <span>"Total"</span>
                    <strong>{total}</strong>
                </div>
            </section>

            <form class="payment-form" on:submit=submit>
                <label for="fullName">"Full name"</label>
                <input
                    id="fullName"
                    name="fullName"
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />

                <label for="email">"Email"</label>
                <input
                    id="email"
                    name="email"
                    type="email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />

                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || is_empty() || redirecting.get() || completed.get()
                >
                    {button_label}
                </button>

                <p
                    class=move || {
                        notice.with(|n| {
                            format!("payment-status {}", n.as_ref().map_or("", PaymentNotice::class))
                        })
                    }
                    role="status"
                >
                    {move || notice.with(|n| n.as_ref().map(|n| n.message().to_string()).unwrap_or_default())}
                </p>
            </form>
        </div>
    }
}
