//! Student login page
//!
//! The form posts to `/auth/login`; the server answers with a redirect to
//! the dashboard.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::core::Role;
use crate::ui::layout::{AuthCard, FormField, OAuthButtons, PageLayout, RoleLinks};

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <Title text="Log in - CampusConnect" />
        <PageLayout>
            <div class="w-full max-w-md">
                <AuthCard
                    title="Welcome Back".to_string()
                    subtitle="Sign in to your account to continue"
                    action=Role::Student.login_endpoint()
                    submit_label="Sign in"
                >
                    <FormField label="Email" name="email" input_type="email" placeholder="you@example.com" />
                    <FormField label="Password" name="password" input_type="password" />
                </AuthCard>

                <OAuthButtons />

                <p class="mt-6 text-center text-sm text-theme-secondary">
                    "Don't have an account? "
                    <A href="/signup" attr:class="text-accent-primary hover:underline">"Sign up"</A>
                </p>
                <RoleLinks current=Role::Student />
            </div>
        </PageLayout>
    }
}
