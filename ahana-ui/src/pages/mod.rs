//! Pages
//!
//! One module per portal route.

pub mod assessments;
pub mod dashboard;
pub mod forgot_password;
pub mod infirmary;
pub mod inventory;
pub mod login;
pub mod profile;
pub mod reports;
pub mod settings;
pub mod students;

pub use assessments::Assessments;
pub use dashboard::Dashboard;
pub use forgot_password::ForgotPassword;
pub use infirmary::Infirmary;
pub use inventory::Inventory;
pub use login::Login;
pub use profile::Profile;
pub use reports::Reports;
pub use settings::Settings;
pub use students::Students;
