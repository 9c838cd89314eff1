//! Registration page
//!
//! Second step of a student signup. Only reachable while the session holds
//! a pending registration; anyone else is sent back to the signup page.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::Redirect;

use crate::ui::data::{PendingSignup, load_pending_signup};
use crate::ui::layout::{AuthCard, FormField, PageLayout};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let pending = Resource::new(|| (), |_| load_pending_signup());

    view! {
        <Title text="Complete registration - CampusConnect" />
        <PageLayout>
            <Suspense fallback=|| view! { <p class="text-theme-secondary">"Loading..."</p> }>
                {move || Suspend::new(async move {
                    match pending.await {
                        Ok(Some(pending)) => view! { <RegisterForm pending /> }.into_any(),
                        Ok(None) => view! { <Redirect path="/signup" /> }.into_any(),
                        Err(e) => view! { <p class="text-red-700">{e.to_string()}</p> }.into_any(),
                    }
                })}
            </Suspense>
        </PageLayout>
    }
}

#[component]
fn RegisterForm(pending: PendingSignup) -> impl IntoView {
    let subtitle = if pending.via_provider {
        "Signed in with your provider. A few more details and you're in."
    } else {
        "A few more details and you're in."
    };

    view! {
        <div class="w-full max-w-md">
            <AuthCard
                title=format!("Welcome, {}", pending.name)
                subtitle=subtitle
                action="/auth/register"
                submit_label="Finish registration"
            >
                <p class="text-sm text-theme-secondary">{pending.email}</p>
                <FormField label="Roll number" name="roll" placeholder="S202310045" />
                <FormField label="Section" name="section" input_type="number" />
                <FormField label="Phone" name="phone" input_type="tel" placeholder="10 digits" />
            </AuthCard>
        </div>
    }
}
