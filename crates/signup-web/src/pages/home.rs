//! Home Page

use leptos::prelude::*;
use signup_core::SIGNUP_ROUTE;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"CompCleared"</h1>
                <p class="tagline">"Compliance training and tracking for growing teams"</p>
                <div class="cta">
                    <a href=SIGNUP_ROUTE class="btn btn-primary">"Start Free Trial"</a>
                </div>
            </header>
        </div>
    }
}
