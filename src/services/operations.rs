//! Issue/return workflow and operation ledger service

use chrono::Utc;
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::NotificationKind,
        operation::{
            IssueRequest, MoveRequest, Operation, OperationQuery, OperationStats, OverdueEntry,
            RepairRequest, ReportQuery, ReportRow, ReturnRequest, WriteOffRequest,
        },
        transition::{EquipmentState, Transition},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct OperationsService {
    repository: Repository,
}

impl OperationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue in-stock equipment to a user
    pub async fn issue(&self, actor_id: i32, request: &IssueRequest) -> AppResult<Operation> {
        let transition = Transition::Issue {
            target_user_id: request.target_user_id,
            due_at: request.due_at,
        };
        self.apply_transition(actor_id, request.equipment_id, transition, request.notes.as_deref())
            .await
    }

    /// Take issued equipment back; its condition decides where it goes next
    pub async fn return_equipment(&self, actor_id: i32, request: &ReturnRequest) -> AppResult<Operation> {
        let transition = Transition::Return {
            condition: request.condition,
        };
        self.apply_transition(actor_id, request.equipment_id, transition, request.notes.as_deref())
            .await
    }

    pub async fn move_equipment(&self, actor_id: i32, request: &MoveRequest) -> AppResult<Operation> {
        let transition = Transition::Move {
            to_location_id: request.to_location_id,
        };
        self.apply_transition(actor_id, request.equipment_id, transition, request.notes.as_deref())
            .await
    }

    pub async fn repair(&self, actor_id: i32, request: &RepairRequest) -> AppResult<Operation> {
        let transition = Transition::Repair {
            completed: request.completed,
        };
        self.apply_transition(actor_id, request.equipment_id, transition, request.notes.as_deref())
            .await
    }

    pub async fn write_off(&self, actor_id: i32, request: &WriteOffRequest) -> AppResult<Operation> {
        self.apply_transition(
            actor_id,
            request.equipment_id,
            Transition::WriteOff,
            request.notes.as_deref(),
        )
        .await
    }

    /// Apply a transition as one atomic unit.
    ///
    /// The equipment row stays locked until commit, so concurrent transitions
    /// on the same item serialize and the later one is checked against the
    /// state the earlier one produced. Any error drops the transaction, which
    /// rolls back both the equipment update and the ledger append.
    pub async fn apply_transition(
        &self,
        actor_id: i32,
        equipment_id: Uuid,
        transition: Transition,
        notes: Option<&str>,
    ) -> AppResult<Operation> {
        let mut tx = self.repository.begin_locking().await?;

        // Tokens outlive deactivation
        self.repository
            .users
            .find_active(&mut *tx, actor_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::Authorization(format!("User {} is not active", actor_id))
                }
                other => other,
            })?;

        let equipment = self.repository.equipment.lock(&mut *tx, equipment_id).await?;
        let before = EquipmentState {
            status: equipment.status,
            responsible_user_id: equipment.responsible_user_id,
            location_id: equipment.location_id,
        };

        match &transition {
            Transition::Issue { target_user_id, .. } => {
                self.repository.users.find_active(&mut *tx, *target_user_id).await?;
            }
            Transition::Move { to_location_id } => {
                self.repository.locations.find(&mut *tx, *to_location_id).await?;
            }
            _ => {}
        }

        let after = transition.apply(&before)?;
        let entry = transition.ledger_entry(&before);

        self.repository
            .equipment
            .write_state(&mut *tx, equipment_id, &after)
            .await?;
        let operation = self
            .repository
            .operations
            .append(&mut *tx, equipment_id, actor_id, &entry, notes.unwrap_or(""))
            .await?;

        if let Transition::Return { condition } = &transition {
            if let Some((kind, message)) = condition.alert() {
                let title = format!("Equipment problem: {}", equipment.name);
                self.alert_staff(&mut tx, kind, &title, message).await;
            }
        }

        tx.commit().await?;

        tracing::info!(
            "{} on equipment {} by user {}: {} -> {}",
            entry.action_type,
            equipment_id,
            actor_id,
            before.status,
            after.status
        );

        Ok(operation)
    }

    /// Best-effort staff alert inside a savepoint; failures are logged, never propagated
    async fn alert_staff(
        &self,
        conn: &mut PgConnection,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) {
        let result: AppResult<u64> = async {
            let mut savepoint = conn.begin().await?;
            match self
                .repository
                .notifications
                .notify_staff(&mut *savepoint, kind, title, message)
                .await
            {
                Ok(sent) => {
                    savepoint.commit().await?;
                    Ok(sent)
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    Err(e)
                }
            }
        }
        .await;

        match result {
            Ok(0) => tracing::warn!("No admin or storekeeper to notify about: {}", title),
            Ok(sent) => tracing::debug!("Sent {} {} notifications", sent, kind),
            Err(e) => tracing::warn!("Failed to send {} notifications: {}", kind, e),
        }
    }

    pub async fn list(&self, query: &OperationQuery) -> AppResult<(Vec<Operation>, i64)> {
        self.repository.operations.list(query).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Operation> {
        self.repository.operations.get_by_id(id).await
    }

    /// Issued equipment past its due date
    pub async fn overdue(&self) -> AppResult<Vec<OverdueEntry>> {
        self.repository.operations.overdue(Utc::now()).await
    }

    pub async fn stats(&self) -> AppResult<OperationStats> {
        Ok(OperationStats {
            total_operations: self.repository.operations.count().await?,
            by_action: self.repository.operations.count_by_action().await?,
        })
    }

    pub async fn report(&self, query: &ReportQuery) -> AppResult<Vec<ReportRow>> {
        self.repository.operations.report(query).await
    }
}
