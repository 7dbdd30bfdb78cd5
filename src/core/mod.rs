pub mod appointment;
pub mod assistant;
pub mod conversation;
pub mod intent;
pub mod inventory;
pub mod prompt;
pub mod session;

pub use crate::domain::model::{Appointment, ChatMessage, Role, Vehicle};
pub use crate::domain::ports::{ChatBackend, ConfigProvider, Storage};
pub use crate::utils::error::Result;
