//! Application pages module
//!
//! - Landing page (home)
//! - Student login, signup and registration
//! - Student dashboard
//! - Admin and professor login, signup and dashboard

mod dashboard;
mod landing;
mod login;
mod not_found;
mod register;
mod signup;
mod staff;

pub use dashboard::DashboardPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use register::RegisterPage;
pub use signup::SignupPage;
pub use staff::{StaffDashboardPage, StaffLoginPage, StaffSignupPage};
