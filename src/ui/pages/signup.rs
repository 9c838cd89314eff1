//! Student signup page

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::core::Role;
use crate::ui::layout::{AuthCard, FormField, OAuthButtons, PageLayout};

#[component]
pub fn SignupPage() -> impl IntoView {
    view! {
        <Title text="Sign up - CampusConnect" />
        <PageLayout>
            <div class="w-full max-w-md">
                <AuthCard
                    title="Create your account".to_string()
                    subtitle="You will add your roll number on the next step"
                    action=Role::Student.signup_endpoint()
                    submit_label="Continue"
                >
                    <FormField label="Full name" name="name" />
                    <FormField label="Email" name="email" input_type="email" placeholder="you@example.com" />
                    <FormField label="Password" name="password" input_type="password" />
                    <FormField label="Confirm password" name="confirm_password" input_type="password" />
                    <p class="text-xs text-theme-tertiary">
                        "At least 6 characters with an uppercase letter, a number and a special character."
                    </p>
                </AuthCard>

                <OAuthButtons />

                <p class="mt-6 text-center text-sm text-theme-secondary">
                    "Already registered? "
                    <A href="/login" attr:class="text-accent-primary hover:underline">"Log in"</A>
                </p>
            </div>
        </PageLayout>
    }
}
