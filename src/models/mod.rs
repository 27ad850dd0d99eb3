//! Data models for the warehouse

pub mod category;
pub mod enums;
pub mod equipment;
pub mod inventory;
pub mod location;
pub mod notification;
pub mod operation;
pub mod transition;
pub mod user;

// Re-export commonly used types
pub use category::EquipmentCategory;
pub use enums::{ActionType, Condition, EquipmentStatus, NotificationKind, Role, SessionState};
pub use equipment::Equipment;
pub use inventory::{InventorySession, Reconciliation};
pub use location::Location;
pub use notification::Notification;
pub use operation::Operation;
pub use transition::{EquipmentState, Transition};
pub use user::{Capability, User, UserClaims};
