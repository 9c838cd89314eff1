use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::core::Role;
use crate::ui::{
    DashboardPage, LandingPage, LoginPage, NotFoundPage, RegisterPage, SignupPage,
    StaffDashboardPage, StaffLoginPage, StaffSignupPage,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/campusconnect.css"/>

        <Title text="CampusConnect"/>

        <Router>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=path!("/") view=LandingPage/>
                <Route path=path!("/login") view=LoginPage/>
                <Route path=path!("/signup") view=SignupPage/>
                <Route path=path!("/register") view=RegisterPage/>
                <Route path=path!("/dashboard") view=DashboardPage/>

                <Route path=path!("/admin/login") view=|| view! { <StaffLoginPage role=Role::Admin/> }/>
                <Route path=path!("/admin/signup") view=|| view! { <StaffSignupPage role=Role::Admin/> }/>
                <Route path=path!("/admin/dashboard") view=|| view! { <StaffDashboardPage role=Role::Admin/> }/>

                <Route path=path!("/professor/login") view=|| view! { <StaffLoginPage role=Role::Professor/> }/>
                <Route path=path!("/professor/signup") view=|| view! { <StaffSignupPage role=Role::Professor/> }/>
                <Route path=path!("/professor/dashboard") view=|| view! { <StaffDashboardPage role=Role::Professor/> }/>
            </Routes>
        </Router>
    }
}
