//! Integration tests for role persistence and the permission matrix.

use campus_core::permissions::{self, PermissionMap};
use campus_db::models::role::CreateRole;
use campus_db::models::user::CreateUser;
use campus_db::repositories::{RoleRepo, UserRepo};
use sqlx::PgPool;

fn new_role(name: &str) -> CreateRole {
    CreateRole {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        permissions: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seeded_roles_exist(pool: PgPool) {
    let names: Vec<_> = RoleRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["admin", "teacher", "staff"]);

    let admin = RoleRepo::find_by_name(&pool, "admin").await.unwrap().unwrap();
    for key in permissions::ALL_PERMISSIONS {
        assert!(permissions::is_allowed(&admin.permissions.0, key), "admin lacks {key}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_map_round_trips_through_jsonb(pool: PgPool) {
    let mut perms = PermissionMap::new();
    perms.insert(permissions::VIEW_MARKS.to_string(), true);
    perms.insert(permissions::ENTER_MARKS.to_string(), false);

    let role = RoleRepo::create(&pool, 1, &new_role("clerk"), &perms).await.unwrap();
    let loaded = RoleRepo::find_by_id(&pool, role.id).await.unwrap().unwrap();
    assert_eq!(loaded.permissions.0, perms);
    assert!(!permissions::is_allowed(&loaded.permissions.0, permissions::ADD_ROLE));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preset_applied_and_saved(pool: PgPool) {
    let role = RoleRepo::create(&pool, 1, &new_role("examiner"), &PermissionMap::new())
        .await
        .unwrap();

    let preset = permissions::preset_by_name(permissions::PRESET_EXAM_CONTROLLER).unwrap();
    let merged = permissions::apply_preset(&role.permissions.0, &preset);
    let saved = RoleRepo::update(&pool, role.id, 1, None, Some(&merged))
        .await
        .unwrap()
        .unwrap();

    assert!(permissions::is_allowed(&saved.permissions.0, permissions::PUBLISH_MARKS));
    assert_eq!(saved.display_name, "EXAMINER");
    assert_eq!(saved.updated_by, Some(1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_role_name_violates_unique_constraint(pool: PgPool) {
    let err = RoleRepo::create(&pool, 1, &new_role("teacher"), &PermissionMap::new())
        .await
        .unwrap_err();
    let constraint = err
        .as_database_error()
        .and_then(|e| e.constraint())
        .map(str::to_string);
    assert_eq!(constraint.as_deref(), Some("uq_roles_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_with_users_cannot_be_deleted(pool: PgPool) {
    let role = RoleRepo::create(&pool, 1, &new_role("librarian"), &PermissionMap::new())
        .await
        .unwrap();
    UserRepo::create(
        &pool,
        &CreateUser {
            username: "lib1".to_string(),
            role_id: role.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(RoleRepo::count_users(&pool, role.id).await.unwrap(), 1);
    assert!(RoleRepo::delete(&pool, role.id).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unused_role_can_be_deleted(pool: PgPool) {
    let role = RoleRepo::create(&pool, 1, &new_role("temp"), &PermissionMap::new())
        .await
        .unwrap();
    assert_eq!(RoleRepo::count_users(&pool, role.id).await.unwrap(), 0);
    assert!(RoleRepo::delete(&pool, role.id).await.unwrap());
    assert!(RoleRepo::find_by_id(&pool, role.id).await.unwrap().is_none());
}
