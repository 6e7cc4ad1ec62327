pub mod admin_dashboard;
pub mod landing;
pub mod sign_in;
pub mod user_dashboard;
pub mod warehouse_dashboard;

pub use admin_dashboard::AdminDashboardPage;
pub use landing::LandingPage;
pub use sign_in::{SignInPage, SignUpPage};
pub use user_dashboard::UserDashboardPage;
pub use warehouse_dashboard::WarehouseDashboardPage;
