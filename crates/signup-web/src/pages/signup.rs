//! Signup Page
//!
//! Drives a `SignupController` from the browser. The controller lives in a
//! local-only slot; while a request runs it is checked out of that slot, so
//! a second click finds nothing to act on.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use signup_client::HttpSignupApi;
use signup_core::{
    AccountCredentials, Navigator, PaymentReturn, SIGNUP_ROUTE, SignupController, SignupDraft,
    SignupError, SignupState, Tier, parse_employee_count,
};

use crate::browser::{self, LocationNavigator, SessionStorage};
use crate::components::{ErrorBanner, TierCard};
use crate::config;

type Flow = SignupController<HttpSignupApi, SessionStorage, LocationNavigator>;

#[derive(Clone)]
struct FlowHandle(Rc<RefCell<Option<Flow>>>);

impl FlowHandle {
    fn open() -> Result<Self, SignupError> {
        let store = SessionStorage::open()?;
        let api = HttpSignupApi::from_config(config::api_config());
        let flow = SignupController::new(api, store, LocationNavigator);
        Ok(Self(Rc::new(RefCell::new(Some(flow)))))
    }

    fn unavailable() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    fn checkout(&self) -> Option<Flow> {
        self.0.borrow_mut().take()
    }

    fn give_back(&self, flow: Flow) {
        *self.0.borrow_mut() = Some(flow);
    }
}

/// Reactive page state plus the controller slot
#[derive(Clone, Copy)]
struct Page {
    flow: StoredValue<FlowHandle, LocalStorage>,
    state: RwSignal<SignupState>,
    error: RwSignal<Option<String>>,
    busy: RwSignal<bool>,
    company_name: RwSignal<String>,
    employee_count: RwSignal<String>,
    name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
}

impl Page {
    fn new() -> Self {
        let error = RwSignal::new(None);
        let handle = FlowHandle::open().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Signup unavailable");
            error.set(Some(e.user_message()));
            FlowHandle::unavailable()
        });

        Self {
            flow: StoredValue::new_local(handle),
            state: RwSignal::new(SignupState::default()),
            error,
            busy: RwSignal::new(false),
            company_name: RwSignal::new(String::new()),
            employee_count: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    /// Run one async controller operation, ignoring it if another is in flight
    fn run<F, Fut>(self, op: F)
    where
        F: FnOnce(Flow) -> Fut + 'static,
        Fut: Future<Output = (Flow, signup_core::Result<()>)> + 'static,
    {
        let handle = self.flow.get_value();
        let Some(flow) = handle.checkout() else {
            tracing::debug!("Request already in flight");
            return;
        };

        self.busy.set(true);
        self.error.set(None);
        leptos::task::spawn_local(async move {
            let (flow, outcome) = op(flow).await;
            self.settle(&flow, outcome);
            handle.give_back(flow);
        });
    }

    fn settle(self, flow: &Flow, outcome: signup_core::Result<()>) {
        let state = flow.state().clone();
        if let Err(e) = outcome {
            // Failed verification renders its own message
            if !matches!(state, SignupState::VerificationFailed { .. }) {
                self.error.set(Some(e.user_message()));
            }
        }
        self.state.set(state);
        self.busy.set(false);
    }

    fn resume(self) {
        let query = browser::current_query();
        if let Some(PaymentReturn {
            session_id,
            company_id,
        }) = PaymentReturn::from_query(&query)
        {
            // Show progress instead of the plan form while verification runs
            self.state.set(SignupState::PaymentVerification {
                session_id,
                company_id,
            });
        }
        self.run(move |mut flow| async move {
            let outcome = flow.resume(&query).await;
            (flow, outcome)
        });
    }

    fn prefill(self) {
        let Some(draft) = self.state.get_untracked().draft().cloned() else {
            return;
        };
        if !draft.company_name.is_empty() {
            self.company_name.set(draft.company_name);
        }
        if draft.employee_count > 0 {
            self.employee_count.set(draft.employee_count.to_string());
        }
        if !draft.name.is_empty() {
            self.name.set(draft.name);
        }
        if !draft.email.is_empty() {
            self.email.set(draft.email);
        }
    }

    fn select_tier(self, tier: Tier) {
        let handle = self.flow.get_value();
        let Some(mut flow) = handle.checkout() else {
            return;
        };
        if let Err(e) = flow.select_tier(tier) {
            self.error.set(Some(e.user_message()));
        }
        self.state.set(flow.state().clone());
        handle.give_back(flow);
    }

    /// Drop the attempt and return to a clean plan selection
    fn start_over(self) {
        let handle = self.flow.get_value();
        let Some(mut flow) = handle.checkout() else {
            return;
        };
        self.error.set(None);
        let outcome = flow.abandon();
        let restarted = outcome.is_ok();
        self.settle(&flow, outcome);
        handle.give_back(flow);
        if !restarted {
            return;
        }

        for field in [
            self.company_name,
            self.employee_count,
            self.name,
            self.email,
            self.password,
        ] {
            field.set(String::new());
        }
        // Reload without the return-trip query so it cannot verify again
        if !browser::current_query().is_empty() {
            if let Err(e) = LocationNavigator.navigate(SIGNUP_ROUTE) {
                tracing::warn!(error = %e, "Could not reload signup page");
            }
        }
    }

    fn submit_company(self) {
        let employee_count = match parse_employee_count(&self.employee_count.get_untracked()) {
            Ok(count) => count,
            Err(e) => {
                self.error.set(Some(e.to_string()));
                return;
            }
        };
        let tier = self
            .state
            .with_untracked(|s| s.draft().map(|d| d.tier))
            .unwrap_or_default();
        let draft = SignupDraft {
            company_name: self.company_name.get_untracked(),
            employee_count,
            tier,
            ..Default::default()
        };

        self.run(move |mut flow| async move {
            let outcome = flow.submit_company_info(draft).await;
            (flow, outcome)
        });
    }

    fn submit_account(self) {
        let credentials = AccountCredentials {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
        };

        self.run(move |mut flow| async move {
            let outcome = flow.submit_account(credentials).await;
            (flow, outcome)
        });
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let page = Page::new();

    // Once per page load; the controller refuses a second verification anyway
    page.resume();
    Effect::new(move |_| {
        if !page.busy.get() {
            page.prefill();
        }
    });

    view! {
        <div class="signup">
            <h1>"Create your CompCleared account"</h1>
            {move || page.error.get().map(|message| view! { <ErrorBanner message=message /> })}
            {move || match page.state.get() {
                SignupState::PlanSelection { draft } | SignupState::CreatingCheckout { draft } => {
                    plan_step(page, draft.tier).into_any()
                }
                SignupState::AwaitingPayment { .. } => {
                    view! { <p class="notice">"Redirecting to secure checkout..."</p> }.into_any()
                }
                SignupState::PaymentVerification { .. } => {
                    view! { <p class="notice">"Verifying payment..."</p> }.into_any()
                }
                SignupState::VerificationFailed { message } => {
                    view! {
                        <ErrorBanner message=message />
                        <button class="btn" on:click=move |_| page.start_over()>
                            "Start over"
                        </button>
                    }
                        .into_any()
                }
                SignupState::AccountDetails { .. } | SignupState::Submitting { .. } => {
                    account_step(page).into_any()
                }
                SignupState::Dashboard => {
                    view! { <p class="notice">"Account created. Loading your dashboard..."</p> }
                        .into_any()
                }
            }}
        </div>
    }
}

fn plan_step(page: Page, selected: Tier) -> impl IntoView {
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        page.submit_company();
    };

    view! {
        <div class="plans">
            {Tier::ALL
                .into_iter()
                .map(|tier| {
                    view! {
                        <div class="plan-option" on:click=move |_| page.select_tier(tier)>
                            <TierCard tier=tier selected={tier == selected} />
                        </div>
                    }
                })
                .collect_view()}
        </div>

        <form class="card" on:submit=on_submit>
            <h2>"Company Information"</h2>
            <div class="field">
                <label>"Company Name"</label>
                <input
                    type="text"
                    required
                    prop:value=move || page.company_name.get()
                    on:input=move |ev| page.company_name.set(event_target_value(&ev))
                />
            </div>
            <div class="field">
                <label>"Number of Employees"</label>
                <input
                    type="number"
                    min="1"
                    required
                    prop:value=move || page.employee_count.get()
                    on:input=move |ev| page.employee_count.set(event_target_value(&ev))
                />
            </div>
            <button type="submit" class="btn btn-primary" disabled=move || page.busy.get()>
                {move || if page.busy.get() { "Processing..." } else { "Continue to Payment" }}
            </button>
            <button
                type="button"
                class="btn"
                disabled=move || page.busy.get()
                on:click=move |_| page.start_over()
            >
                "Start over"
            </button>
        </form>
    }
}

fn account_step(page: Page) -> impl IntoView {
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        page.submit_account();
    };

    view! {
        <form class="card" on:submit=on_submit>
            <h2>"Create Admin Account"</h2>
            <p class="notice">"Payment confirmed."</p>
            <div class="field">
                <label>"Full Name"</label>
                <input
                    type="text"
                    required
                    prop:value=move || page.name.get()
                    on:input=move |ev| page.name.set(event_target_value(&ev))
                />
            </div>
            <div class="field">
                <label>"Email"</label>
                <input
                    type="email"
                    required
                    prop:value=move || page.email.get()
                    on:input=move |ev| page.email.set(event_target_value(&ev))
                />
            </div>
            <div class="field">
                <label>"Password"</label>
                <input
                    type="password"
                    required
                    minlength="8"
                    prop:value=move || page.password.get()
                    on:input=move |ev| page.password.set(event_target_value(&ev))
                />
            </div>
            <button type="submit" class="btn btn-primary" disabled=move || page.busy.get()>
                {move || if page.busy.get() { "Creating account..." } else { "Create Account" }}
            </button>
        </form>
    }
}
