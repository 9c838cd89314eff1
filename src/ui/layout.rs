//! Shared page chrome and form pieces

use leptos::prelude::*;
use leptos_router::components::A;

use crate::core::Role;

/// Header, centered content and footer
#[component]
pub fn PageLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col">
            <header class="border-b border-theme">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="flex items-center justify-between h-16">
                        <A href="/" attr:class="flex items-center gap-3 hover:opacity-80 transition-opacity">
                            <div class="w-8 h-8 bg-accent-primary rounded-lg flex items-center justify-center">
                                <svg class="w-5 h-5 text-white" fill="none" viewBox="0 0 24 24" stroke="currentColor">
                                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2"
                                          d="M12 14l9-5-9-5-9 5 9 5z" />
                                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2"
                                          d="M12 14v7M5 11.5v4.5c0 1.5 3 3 7 3s7-1.5 7-3v-4.5" />
                                </svg>
                            </div>
                            <span class="text-xl font-bold text-theme-primary">"CampusConnect"</span>
                        </A>
                    </div>
                </div>
            </header>

            <main class="flex-1 flex items-center justify-center p-4">
                {children()}
            </main>

            <footer class="py-4 border-t border-theme">
                <p class="text-center text-sm text-theme-tertiary">"© 2025 CampusConnect"</p>
            </footer>
        </div>
    }
}

/// Labelled input
#[component]
pub fn FormField(
    label: &'static str,
    name: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional, into)] value: Option<String>,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <label class="block">
            <span class="block text-sm font-medium text-theme-primary mb-1">{label}</span>
            <input
                class="form-input"
                type=input_type
                name=name
                value=value
                placeholder=placeholder
                required
            />
        </label>
    }
}

/// Card wrapping a form that posts straight to an auth endpoint
#[component]
pub fn AuthCard(
    title: String,
    subtitle: &'static str,
    action: &'static str,
    submit_label: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="w-full max-w-md card">
            <div class="text-center mb-6">
                <h2 class="text-2xl font-bold text-theme-primary">{title}</h2>
                <p class="mt-2 text-sm text-theme-secondary">{subtitle}</p>
            </div>
            <form method="post" action=action class="space-y-4">
                {children()}
                <button type="submit" class="btn-primary w-full">{submit_label}</button>
            </form>
        </div>
    }
}

/// Google and GitHub sign-in links. `rel="external"` keeps the router from
/// handling them client-side.
#[component]
pub fn OAuthButtons() -> impl IntoView {
    view! {
        <div class="mt-6 space-y-2">
            <p class="text-center text-xs text-theme-tertiary">"or continue with"</p>
            <div class="flex gap-2">
                <a href="/auth/google" rel="external" class="btn-secondary flex-1 text-center">"Google"</a>
                <a href="/auth/github" rel="external" class="btn-secondary flex-1 text-center">"GitHub"</a>
            </div>
        </div>
    }
}

#[component]
pub fn LogoutButton() -> impl IntoView {
    view! {
        <form method="post" action="/auth/logout">
            <button type="submit" class="btn-secondary">"Log out"</button>
        </form>
    }
}

/// Links to the other role's pages
#[component]
pub fn RoleLinks(current: Role) -> impl IntoView {
    let others = [Role::Student, Role::Professor, Role::Admin]
        .into_iter()
        .filter(move |role| *role != current)
        .map(|role| {
            view! {
                <A href=role.login_path() attr:class="text-accent-primary hover:underline">
                    {format!("{} login", role.label())}
                </A>
            }
        })
        .collect_view();

    view! { <div class="mt-4 flex justify-center gap-4 text-sm">{others}</div> }
}
