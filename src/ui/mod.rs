pub mod data;
pub mod layout;
pub mod pages;

pub use pages::{
    DashboardPage, LandingPage, LoginPage, NotFoundPage, RegisterPage, SignupPage,
    StaffDashboardPage, StaffLoginPage, StaffSignupPage,
};
