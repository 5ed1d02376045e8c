//! Product enquiries
//!
//! Buy buttons outside the collections page link to the contact form with
//! `?item=<product id>`; the form's message box is prefilled from the
//! product name.

/// Prefilled contact message for an item, unless the shopper already typed one
pub fn enquiry_message(item: &str, current: &str) -> Option<String> {
    let item = item.trim();
    if item.is_empty() || !current.trim().is_empty() {
        return None;
    }

    Some(format!(
        "Hi Raven, I would like to order: {item}. Please share available sizes and next steps."
    ))
}
