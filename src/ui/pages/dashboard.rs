//! Student dashboard
//!
//! Profile, per-course attendance and grades, and the contact details form.
//! Sessions without a student account are sent to the login page.

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::Redirect;

use crate::core::dashboard::format_attendance;
use crate::core::{CourseSummary, DashboardView};
use crate::ui::data::load_student_dashboard;
use crate::ui::layout::{FormField, LogoutButton, PageLayout};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let dashboard = Resource::new(|| (), |_| load_student_dashboard());

    view! {
        <Title text="Dashboard - CampusConnect" />
        <PageLayout>
            <Suspense fallback=|| view! { <p class="text-theme-secondary">"Loading..."</p> }>
                {move || Suspend::new(async move {
                    match dashboard.await {
                        Ok(Some(view)) => view! { <StudentDashboard view /> }.into_any(),
                        Ok(None) => view! { <Redirect path="/login" /> }.into_any(),
                        Err(e) => view! { <p class="text-red-700">{e.to_string()}</p> }.into_any(),
                    }
                })}
            </Suspense>
        </PageLayout>
    }
}

#[component]
fn StudentDashboard(view: DashboardView) -> impl IntoView {
    let DashboardView {
        name,
        email,
        roll,
        section,
        phone,
        branch,
        ug,
        courses,
        overall_attendance,
    } = view;

    view! {
        <div class="w-full max-w-4xl space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold text-theme-primary">{name}</h1>
                    <p class="text-theme-secondary">{email}</p>
                </div>
                <LogoutButton />
            </div>

            <div class="card grid grid-cols-2 sm:grid-cols-4 gap-4">
                <Stat label="Roll number" value=roll />
                <Stat label="Branch" value=branch />
                <Stat label="Year" value=format!("UG {}", ug) />
                <Stat label="Section" value=section.to_string() />
                <Stat label="Attendance" value=format_attendance(overall_attendance) />
            </div>

            <CourseTable courses />

            <div class="card">
                <h2 class="text-lg font-semibold text-theme-primary mb-4">"Contact details"</h2>
                <form method="post" action="/auth/profile" class="grid sm:grid-cols-3 gap-4 items-end">
                    <FormField label="Section" name="section" input_type="number" value=section.to_string() />
                    <FormField label="Phone" name="phone" input_type="tel" value=phone.unwrap_or_default() />
                    <button type="submit" class="btn-primary">"Save"</button>
                </form>
            </div>
        </div>
    }
}

#[component]
fn Stat(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div>
            <p class="text-xs uppercase text-theme-tertiary">{label}</p>
            <p class="text-lg font-semibold text-theme-primary">{value}</p>
        </div>
    }
}

#[component]
fn CourseTable(courses: Vec<CourseSummary>) -> impl IntoView {
    if courses.is_empty() {
        return view! {
            <div class="card text-center text-theme-secondary">"No courses yet"</div>
        }
        .into_any();
    }

    let rows = courses
        .into_iter()
        .map(|course| {
            view! {
                <tr class="border-t border-theme">
                    <td class="py-2 font-mono">{course.code}</td>
                    <td class="py-2">{course.name}</td>
                    <td class="py-2 text-right">
                        {format!("{}/{}", course.classes_attended, course.classes_held)}
                    </td>
                    <td class="py-2 text-right">{format_attendance(course.attendance)}</td>
                    <td class="py-2 text-right">{course.grade.unwrap_or_else(|| "-".to_string())}</td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="card overflow-x-auto">
            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-theme-tertiary">
                        <th class="py-2">"Code"</th>
                        <th class="py-2">"Course"</th>
                        <th class="py-2 text-right">"Classes"</th>
                        <th class="py-2 text-right">"Attendance"</th>
                        <th class="py-2 text-right">"Grade"</th>
                    </tr>
                </thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    }
    .into_any()
}
