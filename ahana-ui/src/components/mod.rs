//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod confirm_dialog;
pub mod field;
pub mod loading;
pub mod nav;
pub mod search_bar;
pub mod student_picker;
pub mod toast;

pub use confirm_dialog::ConfirmDialog;
pub use field::{bind, error_for, options, Field, SelectField, TextArea};
pub use loading::{InlineLoading, ListSkeleton, Loading};
pub use nav::{Header, Sidebar};
pub use search_bar::SearchBar;
pub use student_picker::StudentPicker;
pub use toast::Toast;
