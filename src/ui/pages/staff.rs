//! Admin and professor pages
//!
//! Both roles share one set of pages parameterized by `Role`.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::{A, Redirect};

use crate::core::{Role, StaffProfileView};
use crate::ui::data::load_staff_profile;
use crate::ui::layout::{AuthCard, FormField, LogoutButton, PageLayout, RoleLinks};

fn signup_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/signup",
        _ => "/professor/signup",
    }
}

#[component]
pub fn StaffLoginPage(role: Role) -> impl IntoView {
    view! {
        <Title text=format!("{} login - CampusConnect", role.label()) />
        <PageLayout>
            <div class="w-full max-w-md">
                <AuthCard
                    title=format!("{} login", role.label())
                    subtitle="Sign in with your staff account"
                    action=role.login_endpoint()
                    submit_label="Sign in"
                >
                    <FormField label="Email" name="email" input_type="email" />
                    <FormField label="Password" name="password" input_type="password" />
                </AuthCard>

                <p class="mt-6 text-center text-sm text-theme-secondary">
                    "New here? "
                    <A href=signup_path(role) attr:class="text-accent-primary hover:underline">"Create an account"</A>
                </p>
                <RoleLinks current=role />
            </div>
        </PageLayout>
    }
}

#[component]
pub fn StaffSignupPage(role: Role) -> impl IntoView {
    view! {
        <Title text=format!("{} signup - CampusConnect", role.label()) />
        <PageLayout>
            <div class="w-full max-w-md">
                <AuthCard
                    title=format!("New {} account", role.label().to_lowercase())
                    subtitle="All fields are required"
                    action=role.signup_endpoint()
                    submit_label="Create account"
                >
                    <FormField label="Full name" name="name" />
                    <FormField label="Email" name="email" input_type="email" />
                    <FormField label="Phone" name="phone" input_type="tel" placeholder="10 digits" />
                    <FormField label="Password" name="password" input_type="password" />
                    <FormField label="Confirm password" name="confirm_password" input_type="password" />
                </AuthCard>

                <p class="mt-6 text-center text-sm text-theme-secondary">
                    "Already have an account? "
                    <A href=role.login_path() attr:class="text-accent-primary hover:underline">"Log in"</A>
                </p>
            </div>
        </PageLayout>
    }
}

#[component]
pub fn StaffDashboardPage(role: Role) -> impl IntoView {
    let profile = Resource::new(move || role, load_staff_profile);

    view! {
        <Title text=format!("{} dashboard - CampusConnect", role.label()) />
        <PageLayout>
            <Suspense fallback=|| view! { <p class="text-theme-secondary">"Loading..."</p> }>
                {move || Suspend::new(async move {
                    match profile.await {
                        Ok(Some(profile)) => view! { <StaffProfile profile /> }.into_any(),
                        Ok(None) => view! { <Redirect path=role.login_path() /> }.into_any(),
                        Err(e) => view! { <p class="text-red-700">{e.to_string()}</p> }.into_any(),
                    }
                })}
            </Suspense>
        </PageLayout>
    }
}

#[component]
fn StaffProfile(profile: StaffProfileView) -> impl IntoView {
    view! {
        <div class="w-full max-w-2xl card space-y-4">
            <div class="flex items-center justify-between">
                <div>
                    <p class="text-xs uppercase text-theme-tertiary">{profile.role.label()}</p>
                    <h1 class="text-3xl font-bold text-theme-primary">{profile.name}</h1>
                </div>
                <LogoutButton />
            </div>
            <dl class="grid grid-cols-2 gap-4 text-sm">
                <dt class="text-theme-tertiary">"Email"</dt>
                <dd class="text-theme-primary">{profile.email}</dd>
                <dt class="text-theme-tertiary">"Phone"</dt>
                <dd class="text-theme-primary">{profile.phone.unwrap_or_else(|| "-".to_string())}</dd>
            </dl>
        </div>
    }
}
