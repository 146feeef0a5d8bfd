pub mod activity;
pub mod pii;
pub mod settings;

pub use activity::{ActivityEvent, ActivityFilter, ActivityLog};
pub use pii::Masked;
pub use settings::SettingsDocument;
