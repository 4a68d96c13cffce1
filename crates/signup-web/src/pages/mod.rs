//! Page Components

mod dashboard;
mod home;
mod signup;

pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use signup::SignupPage;
