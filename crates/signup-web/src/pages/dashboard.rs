//! Dashboard Landing Page
//!
//! Destination after account creation. The session cookie from signup is
//! already set, so the real dashboard loads from here.

use leptos::prelude::*;

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <div class="dashboard">
            <h1>"Welcome to CompCleared"</h1>
            <p>"Your account is ready."</p>
        </div>
    }
}
