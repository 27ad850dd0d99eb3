//! Equipment lifecycle state machine.
//!
//! Every status change goes through [`Transition::apply`], which checks the
//! from→to guard table and derives the holder and location that result from
//! the move. [`Transition::ledger_entry`] derives the matching ledger columns
//! from the state observed before the change.

use chrono::{DateTime, Utc};

use super::enums::{ActionType, Condition, EquipmentStatus, NotificationKind};
use crate::error::{AppError, AppResult};

/// A requested state change for one equipment item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Issue {
        target_user_id: i32,
        due_at: Option<DateTime<Utc>>,
    },
    Return {
        condition: Condition,
    },
    Move {
        to_location_id: i32,
    },
    /// `completed = false` sends to repair, `true` brings back to stock
    Repair {
        completed: bool,
    },
    WriteOff,
}

/// The mutable part of an equipment row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentState {
    pub status: EquipmentStatus,
    pub responsible_user_id: Option<i32>,
    pub location_id: Option<i32>,
}

/// Ledger columns derived from a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub action_type: ActionType,
    pub target_user_id: Option<i32>,
    pub location_from_id: Option<i32>,
    pub location_to_id: Option<i32>,
    pub condition: Option<Condition>,
    pub due_at: Option<DateTime<Utc>>,
}

impl Condition {
    /// Status equipment lands in when returned in this condition
    pub fn resulting_status(&self) -> EquipmentStatus {
        match self {
            Condition::Ok => EquipmentStatus::InStock,
            Condition::NeedRepair => EquipmentStatus::InRepair,
            Condition::Damaged => EquipmentStatus::WrittenOff,
        }
    }

    /// Alert raised for staff when equipment comes back in this condition
    pub fn alert(&self) -> Option<(NotificationKind, &'static str)> {
        match self {
            Condition::Ok => None,
            Condition::NeedRepair => Some((NotificationKind::Repair, "Repair required")),
            Condition::Damaged => Some((NotificationKind::Info, "Equipment damaged")),
        }
    }
}

impl Transition {
    pub fn action_type(&self) -> ActionType {
        match self {
            Transition::Issue { .. } => ActionType::Issue,
            Transition::Return { .. } => ActionType::Return,
            Transition::Move { .. } => ActionType::Move,
            Transition::Repair { .. } => ActionType::Repair,
            Transition::WriteOff => ActionType::WriteOff,
        }
    }

    /// Guard table: the status reached from `from`, or `None` if not allowed
    pub fn target_status(&self, from: EquipmentStatus) -> Option<EquipmentStatus> {
        use EquipmentStatus::*;
        match (self, from) {
            (Transition::Issue { .. }, InStock) => Some(Issued),
            (Transition::Return { condition }, Issued) => Some(condition.resulting_status()),
            (Transition::Move { .. }, InStock | Issued | InRepair) => Some(from),
            (Transition::Repair { completed: false }, InStock) => Some(InRepair),
            (Transition::Repair { completed: true }, InRepair) => Some(InStock),
            (Transition::WriteOff, InStock | InRepair) => Some(WrittenOff),
            _ => None,
        }
    }

    /// Compute the state after this transition, rejecting disallowed moves
    pub fn apply(&self, current: &EquipmentState) -> AppResult<EquipmentState> {
        let status = self.target_status(current.status).ok_or_else(|| {
            AppError::Conflict(format!(
                "Cannot apply {} to equipment with status {}",
                self.action_type(),
                current.status
            ))
        })?;

        let location_id = match self {
            Transition::Move { to_location_id } => {
                if current.location_id == Some(*to_location_id) {
                    return Err(AppError::Validation(
                        "to_location_id: equipment is already at this location".to_string(),
                    ));
                }
                Some(*to_location_id)
            }
            _ => current.location_id,
        };

        // The holder is a function of the resulting status
        let responsible_user_id = match (status, self) {
            (EquipmentStatus::Issued, Transition::Issue { target_user_id, .. }) => {
                Some(*target_user_id)
            }
            (EquipmentStatus::Issued, _) => current.responsible_user_id,
            _ => None,
        };

        Ok(EquipmentState {
            status,
            responsible_user_id,
            location_id,
        })
    }

    /// Ledger columns for this transition, given the state before it ran
    pub fn ledger_entry(&self, before: &EquipmentState) -> LedgerEntry {
        let mut entry = LedgerEntry {
            action_type: self.action_type(),
            target_user_id: None,
            location_from_id: None,
            location_to_id: None,
            condition: None,
            due_at: None,
        };

        match self {
            Transition::Issue {
                target_user_id,
                due_at,
            } => {
                entry.target_user_id = Some(*target_user_id);
                entry.location_from_id = before.location_id;
                entry.due_at = *due_at;
            }
            Transition::Return { condition } => {
                entry.target_user_id = before.responsible_user_id;
                entry.location_to_id = before.location_id;
                entry.condition = Some(*condition);
            }
            Transition::Move { to_location_id } => {
                entry.location_from_id = before.location_id;
                entry.location_to_id = Some(*to_location_id);
            }
            Transition::Repair { .. } | Transition::WriteOff => {
                entry.location_from_id = before.location_id;
            }
        }

        entry
    }
}
