//! Database-backed workflow tests.
//!
//! Each test gets a fresh database with migrations applied by `sqlx::test`.
//! Requires DATABASE_URL, so they are ignored by default.

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use sqlx::PgPool;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use smart_warehouse_server::{
    config::AuthConfig,
    error::AppError,
    models::{
        equipment::CreateEquipment,
        inventory::Reconciliation,
        location::CreateLocation,
        operation::{IssueRequest, RepairRequest, ReturnRequest},
        user::{CreateUser, UpdateUser},
        ActionType, Condition, EquipmentStatus, NotificationKind, Role, SessionState,
    },
    repository::Repository,
    services::Services,
};

fn services(pool: PgPool) -> Services {
    Services::new(Repository::new(pool, 2000), AuthConfig::default())
}

async fn user(services: &Services, username: &str, role: Role) -> i32 {
    services
        .users
        .create(&CreateUser {
            username: username.to_string(),
            password: Some("secret".to_string()),
            full_name: None,
            role: Some(role),
        })
        .await
        .expect("create user")
        .id
}

async fn location(services: &Services, name: &str, parent_id: Option<i32>) -> i32 {
    services
        .locations
        .create(&CreateLocation {
            name: name.to_string(),
            parent_id,
            description: None,
        })
        .await
        .expect("create location")
        .id
}

async fn equipment(services: &Services, name: &str, location_id: Option<i32>) -> Uuid {
    services
        .equipment
        .create(&CreateEquipment {
            name: name.to_string(),
            description: None,
            category_id: None,
            location_id,
        })
        .await
        .expect("create equipment")
        .id
}

fn issue_to(equipment_id: Uuid, target_user_id: i32) -> IssueRequest {
    IssueRequest {
        equipment_id,
        target_user_id,
        notes: None,
        due_at: None,
    }
}

fn return_as(equipment_id: Uuid, condition: Condition) -> ReturnRequest {
    ReturnRequest {
        equipment_id,
        condition,
        notes: Some("checked at the counter".to_string()),
    }
}

#[sqlx::test]
#[ignore]
async fn test_issue_then_return_restores_state(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let shelf = location(&services, "Shelf A", None).await;
    let drill = equipment(&services, "Drill", Some(shelf)).await;

    let issued = assert_ok!(services.operations.issue(keeper, &issue_to(drill, worker)).await);
    assert_eq!(issued.action_type, ActionType::Issue);

    let state = services.equipment.get_by_id(drill).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::Issued);
    assert_eq!(state.responsible_user_id, Some(worker));

    let returned = assert_ok!(
        services
            .operations
            .return_equipment(keeper, &return_as(drill, Condition::Ok))
            .await
    );
    assert_eq!(returned.target_user_id, Some(worker));
    assert_eq!(returned.location_to_id, Some(shelf));

    let state = services.equipment.get_by_id(drill).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::InStock);
    assert_eq!(state.responsible_user_id, None);

    let history = services.equipment.history(drill).await.unwrap();
    let actions: Vec<ActionType> = history.iter().map(|op| op.action_type).collect();
    assert_eq!(actions, vec![ActionType::Issue, ActionType::Return]);
}

#[sqlx::test]
#[ignore]
async fn test_need_repair_notifies_every_active_staff_member(pool: PgPool) {
    let services = services(pool);
    let admin = user(&services, "admin", Role::Admin).await;
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let retired = user(&services, "retired", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    services.users.deactivate(retired).await.unwrap();

    let saw = equipment(&services, "Saw", None).await;
    services.operations.issue(keeper, &issue_to(saw, worker)).await.unwrap();
    services
        .operations
        .return_equipment(keeper, &return_as(saw, Condition::NeedRepair))
        .await
        .unwrap();

    let state = services.equipment.get_by_id(saw).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::InRepair);
    assert_eq!(state.responsible_user_id, None);

    for staff in [admin, keeper] {
        let inbox = services.notifications.list(staff, true).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::Repair);
        assert_eq!(inbox[0].title, "Equipment problem: Saw");
        assert_eq!(inbox[0].message, "Repair required");
    }
    assert!(services.notifications.list(worker, false).await.unwrap().is_empty());
    assert!(services.notifications.list(retired, false).await.unwrap().is_empty());

    assert_eq!(services.notifications.mark_all_read(admin).await.unwrap(), 1);
    assert!(services.notifications.list(admin, true).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore]
async fn test_return_succeeds_without_staff(pool: PgPool) {
    let services = services(pool);
    let worker = user(&services, "worker", Role::Worker).await;
    let ladder = equipment(&services, "Ladder", None).await;

    services.operations.issue(worker, &issue_to(ladder, worker)).await.unwrap();
    assert_ok!(
        services
            .operations
            .return_equipment(worker, &return_as(ladder, Condition::NeedRepair))
            .await
    );

    let state = services.equipment.get_by_id(ladder).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::InRepair);
}

#[sqlx::test]
#[ignore]
async fn test_damaged_return_writes_off(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let grinder = equipment(&services, "Grinder", None).await;

    services.operations.issue(keeper, &issue_to(grinder, worker)).await.unwrap();
    services
        .operations
        .return_equipment(keeper, &return_as(grinder, Condition::Damaged))
        .await
        .unwrap();

    let state = services.equipment.get_by_id(grinder).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::WrittenOff);

    let inbox = services.notifications.list(keeper, false).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Info);

    // written off is terminal
    let again = services.operations.issue(keeper, &issue_to(grinder, worker)).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[sqlx::test]
#[ignore]
async fn test_guards_reject_without_side_effects(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let helmet = equipment(&services, "Helmet", None).await;

    let early_return = services
        .operations
        .return_equipment(keeper, &return_as(helmet, Condition::Ok))
        .await;
    assert!(matches!(early_return, Err(AppError::Conflict(_))));

    let ghost = services.operations.issue(keeper, &issue_to(helmet, 9999)).await;
    assert!(matches!(ghost, Err(AppError::NotFound(_))));

    services
        .users
        .update(
            worker,
            &UpdateUser {
                username: None,
                password: None,
                full_name: None,
                role: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_err!(services.operations.issue(keeper, &issue_to(helmet, worker)).await);

    let missing = services.operations.issue(keeper, &issue_to(Uuid::new_v4(), keeper)).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    assert!(services.equipment.history(helmet).await.unwrap().is_empty());
    let state = services.equipment.get_by_id(helmet).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::InStock);
}

#[sqlx::test]
#[ignore]
async fn test_repair_round_trip(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let pump = equipment(&services, "Pump", None).await;

    let send = RepairRequest {
        equipment_id: pump,
        completed: false,
        notes: None,
    };
    services.operations.repair(keeper, &send).await.unwrap();
    assert_eq!(
        services.equipment.get_by_id(pump).await.unwrap().status,
        EquipmentStatus::InRepair
    );

    let done = RepairRequest {
        completed: true,
        ..send
    };
    services.operations.repair(keeper, &done).await.unwrap();
    assert_eq!(
        services.equipment.get_by_id(pump).await.unwrap().status,
        EquipmentStatus::InStock
    );
}

#[sqlx::test]
#[ignore]
async fn test_concurrent_issue_has_one_winner(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let first = user(&services, "first", Role::Worker).await;
    let second = user(&services, "second", Role::Worker).await;
    let truck = equipment(&services, "Pallet truck", None).await;

    let a = issue_to(truck, first);
    let b = issue_to(truck, second);
    let (ra, rb) = tokio::join!(
        services.operations.issue(keeper, &a),
        services.operations.issue(keeper, &b)
    );

    let winners = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(loser, Err(AppError::Conflict(_))));

    let state = services.equipment.get_by_id(truck).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::Issued);
    assert_eq!(services.equipment.history(truck).await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore]
async fn test_lock_wait_times_out_as_busy(pool: PgPool) {
    let services = Services::new(Repository::new(pool.clone(), 100), AuthConfig::default());
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let crate_id = equipment(&services, "Crate", None).await;

    let mut blocker = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM equipment WHERE id = $1 FOR UPDATE")
        .bind(crate_id)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let result = services.operations.issue(keeper, &issue_to(crate_id, keeper)).await;
    assert!(matches!(result, Err(AppError::Busy(_))));

    blocker.rollback().await.unwrap();
}

#[sqlx::test]
#[ignore]
async fn test_scan_is_idempotent_and_finish_reconciles(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let room = location(&services, "Room 1", None).await;
    let a = equipment(&services, "A", Some(room)).await;
    let b = equipment(&services, "B", Some(room)).await;
    let c = equipment(&services, "C", Some(room)).await;
    let elsewhere = location(&services, "Room 2", None).await;
    let d = equipment(&services, "D", Some(elsewhere)).await;

    let session = services.inventory.start(Some(room), keeper).await.unwrap();
    assert_eq!(session.state, SessionState::Open);

    let first = services.inventory.scan(session.id, b).await.unwrap();
    let second = services.inventory.scan(session.id, b).await.unwrap();
    assert_eq!(first.scanned_count, 1);
    assert_eq!(second.scanned_count, 1);
    services.inventory.scan(session.id, c).await.unwrap();
    services.inventory.scan(session.id, d).await.unwrap();

    let result = services.inventory.finish(session.id).await.unwrap();
    let expected = Reconciliation::compute(
        &[a, b, c].into_iter().collect::<BTreeSet<_>>(),
        &[b, c, d].into_iter().collect::<BTreeSet<_>>(),
    );
    assert_eq!(result, expected);
    assert_eq!(result.missing, vec![a]);
    assert_eq!(result.extra, vec![d]);

    let stored = services.inventory.get_by_id(session.id).await.unwrap();
    assert_eq!(stored.state, SessionState::Closed);
    assert!(stored.finished_at.is_some());
    assert_eq!(Reconciliation::from(&stored), result);

    let late_scan = services.inventory.scan(session.id, a).await;
    assert!(matches!(late_scan, Err(AppError::Conflict(_))));
    let refinish = services.inventory.finish(session.id).await;
    assert!(matches!(refinish, Err(AppError::Conflict(_))));
    let unknown = services.inventory.scan(session.id + 1000, a).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));
}

#[sqlx::test]
#[ignore]
async fn test_deleting_parent_location_detaches_children(pool: PgPool) {
    let services = services(pool);
    let hall = location(&services, "Hall", None).await;
    let rack = location(&services, "Rack", Some(hall)).await;
    let on_hall = equipment(&services, "Cart", Some(hall)).await;
    let on_rack = equipment(&services, "Box", Some(rack)).await;

    services.locations.delete(hall).await.unwrap();

    let rack_now = services.locations.get_by_id(rack).await.unwrap();
    assert_eq!(rack_now.parent_id, None);
    assert_eq!(services.equipment.get_by_id(on_hall).await.unwrap().location_id, None);
    assert_eq!(
        services.equipment.get_by_id(on_rack).await.unwrap().location_id,
        Some(rack)
    );
}

#[sqlx::test]
#[ignore]
async fn test_location_tree_stays_acyclic_and_unique(pool: PgPool) {
    let services = services(pool);
    let hall = location(&services, "Hall", None).await;
    let rack = location(&services, "Rack", Some(hall)).await;

    let duplicate_root = services
        .locations
        .create(&CreateLocation {
            name: "Hall".to_string(),
            parent_id: None,
            description: None,
        })
        .await;
    assert!(matches!(duplicate_root, Err(AppError::Conflict(_))));

    let cycle: smart_warehouse_server::models::location::UpdateLocation =
        serde_json::from_value(serde_json::json!({ "parent_id": rack })).unwrap();
    let result = services.locations.update(hall, &cycle).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[sqlx::test]
#[ignore]
async fn test_concurrent_root_locations_keep_unique_names(pool: PgPool) {
    let services = services(pool.clone());
    let dock = CreateLocation {
        name: "Dock".to_string(),
        parent_id: None,
        description: None,
    };

    let (ra, rb) = tokio::join!(services.locations.create(&dock), services.locations.create(&dock));
    let winners = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = if ra.is_ok() { rb } else { ra };
    assert!(matches!(loser, Err(AppError::Conflict(_))));

    // the index holds even without the service-level check
    let repository = Repository::new(pool, 2000);
    let direct = repository.locations.create(&dock).await;
    assert!(matches!(direct, Err(AppError::Conflict(_))));
    assert_eq!(services.locations.list().await.unwrap().len(), 1);
}

#[sqlx::test]
#[ignore]
async fn test_deleting_parent_rejects_child_clashing_with_root(pool: PgPool) {
    let services = services(pool);
    let rack = location(&services, "Rack", None).await;
    let hall = location(&services, "Hall", None).await;
    let nested = location(&services, "Rack", Some(hall)).await;

    let result = services.locations.delete(hall).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    assert_ok!(services.locations.get_by_id(hall).await);
    assert_eq!(
        services.locations.get_by_id(nested).await.unwrap().parent_id,
        Some(hall)
    );
    assert_eq!(services.locations.get_by_id(rack).await.unwrap().parent_id, None);
}

#[sqlx::test]
#[ignore]
async fn test_failed_alert_does_not_abort_return(pool: PgPool) {
    sqlx::query(
        r#"
        CREATE FUNCTION reject_notification() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'notifications unavailable';
        END
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER notifications_down BEFORE INSERT ON notifications \
         FOR EACH ROW EXECUTE FUNCTION reject_notification()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let jack = equipment(&services, "Jack", None).await;

    services.operations.issue(keeper, &issue_to(jack, worker)).await.unwrap();
    assert_ok!(
        services
            .operations
            .return_equipment(keeper, &return_as(jack, Condition::NeedRepair))
            .await
    );

    let state = services.equipment.get_by_id(jack).await.unwrap();
    assert_eq!(state.status, EquipmentStatus::InRepair);
    assert_eq!(state.responsible_user_id, None);

    let history = services.equipment.history(jack).await.unwrap();
    let actions: Vec<ActionType> = history.iter().map(|op| op.action_type).collect();
    assert_eq!(actions, vec![ActionType::Issue, ActionType::Return]);
    assert!(services.notifications.list(keeper, false).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore]
async fn test_overdue_follows_latest_issue(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let drill = equipment(&services, "Drill", None).await;
    let past = Utc::now() - Duration::days(3);

    let late = IssueRequest {
        due_at: Some(past),
        ..issue_to(drill, worker)
    };
    services.operations.issue(keeper, &late).await.unwrap();
    let overdue = services.operations.overdue().await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].equipment_id, drill);
    assert_eq!(overdue[0].target_user, "worker");

    services
        .operations
        .return_equipment(keeper, &return_as(drill, Condition::Ok))
        .await
        .unwrap();
    assert!(services.operations.overdue().await.unwrap().is_empty());

    // an earlier past-due issue does not make the current one overdue
    let on_time = IssueRequest {
        due_at: Some(Utc::now() + Duration::days(7)),
        ..issue_to(drill, worker)
    };
    services.operations.issue(keeper, &on_time).await.unwrap();
    assert!(services.operations.overdue().await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore]
async fn test_deactivated_actor_cannot_transition(pool: PgPool) {
    let services = services(pool);
    let keeper = user(&services, "keeper", Role::Storekeeper).await;
    let worker = user(&services, "worker", Role::Worker).await;
    let hoist = equipment(&services, "Hoist", None).await;

    services.users.deactivate(keeper).await.unwrap();

    let result = services.operations.issue(keeper, &issue_to(hoist, worker)).await;
    assert!(matches!(result, Err(AppError::Authorization(_))));
    assert!(services.equipment.history(hoist).await.unwrap().is_empty());
    assert_eq!(
        services.equipment.get_by_id(hoist).await.unwrap().status,
        EquipmentStatus::InStock
    );
}
