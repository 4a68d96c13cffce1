//! UI Components

use leptos::prelude::*;
use signup_core::Tier;

/// Plan card with price, employee range and feature list
#[component]
pub fn TierCard(tier: Tier, selected: bool) -> impl IntoView {
    let pricing = tier.pricing();
    let class = if selected { "plan selected" } else { "plan" };

    view! {
        <div class=class>
            <h2>{pricing.name}</h2>
            <div class="price">{pricing.price_label()}</div>
            <p class="employees">{pricing.employees}</p>
            <ul>
                {pricing.features.iter().map(|f| view! { <li>{*f}</li> }).collect_view()}
            </ul>
        </div>
    }
}

/// Inline error message
#[component]
pub fn ErrorBanner(message: String) -> impl IntoView {
    view! { <div class="error" role="alert">{message}</div> }
}
