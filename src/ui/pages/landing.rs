//! Landing page component

use leptos::prelude::*;
use leptos_meta::{Meta, Title};
use leptos_router::components::A;

use crate::ui::layout::PageLayout;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <Title text="CampusConnect" />
        <Meta name="description" content="Attendance, grades and course updates for students, professors and admins." />

        <PageLayout>
            <div class="text-center px-4 max-w-3xl mx-auto">
                <h1 class="text-5xl sm:text-6xl font-bold text-theme-primary mb-6 tracking-tight">
                    "CampusConnect"
                </h1>
                <p class="text-xl text-theme-secondary mb-10 leading-relaxed">
                    "Your attendance, grades and courses in one place."
                </p>

                <div class="flex flex-col sm:flex-row items-center justify-center gap-4">
                    <A href="/login" attr:class="btn-primary">"Student login"</A>
                    <A href="/signup" attr:class="btn-secondary">"Create an account"</A>
                </div>

                <div class="mt-8 flex justify-center gap-6 text-sm">
                    <A href="/professor/login" attr:class="text-accent-primary hover:underline">"Professors"</A>
                    <A href="/admin/login" attr:class="text-accent-primary hover:underline">"Administrators"</A>
                </div>
            </div>
        </PageLayout>
    }
}
