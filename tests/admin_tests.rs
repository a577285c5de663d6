// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for the write side of the catalog
//!
//! Covers domain creation and moves, offering creation scoped by the
//! caller's authority, and the rule that an offering referenced by a VM
//! cannot be changed or removed.

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use test_case::test_case;

use cim_offering_catalog::domain::{DiskOfferingUpdate, DomainId, NewDiskOffering, OfferingId, VmId};
use cim_offering_catalog::service::{ListOptions, OfferingFilter, OfferingQueryService};
use cim_offering_catalog::CatalogError;

fn is_permission_denied(err: &CatalogError) -> bool {
    matches!(err, CatalogError::PermissionDenied(_))
}

#[tokio::test]
async fn test_created_domain_inherits_parent_offerings() {
    let services = services();
    let d = services.admin.create_domain(A, B, "D").await.unwrap();
    assert_eq!(d.parent_id, Some(B));

    let ids = services
        .query
        .list(d.id, OfferingFilter::default(), ListOptions::default())
        .await
        .unwrap()
        .ids();
    assert!(ids.contains(&A_FAST));
    assert!(ids.contains(&A_ARCHIVE));
}

#[tokio::test]
async fn test_create_domain_outside_scope_is_denied() {
    let services = services();
    let err = services.admin.create_domain(C, A, "X").await.unwrap_err();
    assert!(is_permission_denied(&err));
    assert_eq!(
        err.to_string(),
        "Permission denied: domain ROOT/C does not administer domain ROOT/A"
    );

    let err = services.admin.create_domain(A, ROOT, "X").await.unwrap_err();
    assert!(is_permission_denied(&err));
}

#[tokio::test]
async fn test_duplicate_sibling_name_conflicts() {
    let services = services();
    let err = services.admin.create_domain(ROOT, ROOT, "a").await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_move_domain_changes_visibility() {
    let services = services();
    // B moves from under A to under C
    let moved = services.admin.move_domain(ROOT, B, C).await.unwrap();
    assert_eq!(moved.parent_id, Some(C));

    let ids = services
        .query
        .list(B, OfferingFilter::default(), ListOptions::default())
        .await
        .unwrap()
        .ids();
    assert!(ids.contains(&C_PRIVATE));
    assert!(!ids.contains(&A_FAST));
}

#[tokio::test]
async fn test_move_domain_rules() {
    let services = services();

    // A still has B below it
    let err = services.admin.move_domain(ROOT, A, C).await.unwrap_err();
    assert!(err.is_conflict());

    let err = services.admin.move_domain(ROOT, ROOT, A).await.unwrap_err();
    assert!(err.is_validation());

    // A cannot pull B into C's subtree
    let err = services.admin.move_domain(A, B, C).await.unwrap_err();
    assert!(is_permission_denied(&err));

    let err = services.admin.move_domain(ROOT, DomainId(77), C).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_offering_scoping() {
    let services = services();

    let owned = NewDiskOffering::builder("b-local")
        .owner(B)
        .disk_size_gb(20)
        .build();
    let created = services.admin.create_offering(A, owned).await.unwrap();
    assert_eq!(created.id, OfferingId(7));
    assert_eq!(created.owner_domain_id, Some(B));

    let global = NewDiskOffering::builder("global-large").disk_size_gb(500).build();
    let err = services
        .admin
        .create_offering(A, global.clone())
        .await
        .unwrap_err();
    assert!(is_permission_denied(&err));
    assert!(services.admin.create_offering(ROOT, global).await.is_ok());

    let upward = NewDiskOffering::builder("up").owner(A).disk_size_gb(1).build();
    let err = services.admin.create_offering(B, upward).await.unwrap_err();
    assert!(is_permission_denied(&err));
}

#[tokio::test]
async fn test_create_offering_validates_first() {
    let services = services();
    let invalid = NewDiskOffering::builder("").owner(A).disk_size_gb(1).build();
    let err = services.admin.create_offering(A, invalid).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_update_offering() {
    let services = services();
    let update = DiskOfferingUpdate {
        display_text: Some("Faster SSD".to_string()),
        is_public: Some(true),
        ..Default::default()
    };
    let updated = services
        .admin
        .update_offering(A, A_FAST, update)
        .await
        .unwrap();
    assert_eq!(updated.display_text, "Faster SSD");
    assert!(updated.is_public);

    // now public, so visible from the sibling subtree
    assert!(services.query.get(C, A_FAST).await.is_ok());
}

#[tokio::test]
async fn test_write_failure_order() {
    let services = services();
    let update = DiskOfferingUpdate {
        name: Some("renamed".to_string()),
        ..Default::default()
    };

    // hidden from C
    let err = services
        .admin
        .update_offering(C, A_FAST, update.clone())
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    // visible to B but administered by A
    let err = services
        .admin
        .update_offering(B, A_FAST, update.clone())
        .await
        .unwrap_err();
    assert!(is_permission_denied(&err));
    assert_eq!(
        err.to_string(),
        "Permission denied: domain ROOT/A/B does not administer disk offering 2"
    );

    // global offerings belong to the root
    let err = services.admin.delete_offering(A, GLOBAL_SMALL).await.unwrap_err();
    assert!(is_permission_denied(&err));
}

#[tokio::test]
async fn test_referenced_offering_is_immutable() {
    let services = services();
    services
        .metadata
        .set(VmId(100), "diskOfferingId", &A_FAST.to_string())
        .await
        .unwrap();

    let update = DiskOfferingUpdate {
        display_text: Some("changed".to_string()),
        ..Default::default()
    };
    let err = services
        .admin
        .update_offering(A, A_FAST, update)
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    let err = services.admin.delete_offering(A, A_FAST).await.unwrap_err();
    assert!(err.is_conflict());

    // the VM goes away, the offering can go too
    services.metadata.remove_all(VmId(100)).await.unwrap();
    services.admin.delete_offering(A, A_FAST).await.unwrap();
    assert!(services.query.get(A, A_FAST).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_empty_update_returns_current_record() {
    let services = services();
    let current = services
        .admin
        .update_offering(A, A_ARCHIVE, DiskOfferingUpdate::default())
        .await
        .unwrap();
    assert_eq!(current.name, "a-archive");
    assert_eq!(current.created_at, fixed_timestamp());
}

#[tokio::test]
async fn test_ancestor_administers_hidden_descendant_offering() {
    let services = services();
    // ROOT cannot see a-fast but administers A
    assert!(services.query.get(ROOT, A_FAST).await.unwrap_err().is_not_found());

    let update = DiskOfferingUpdate {
        max_iops: Some(5000),
        min_iops: Some(100),
        ..Default::default()
    };
    let updated = services
        .admin
        .update_offering(ROOT, A_FAST, update)
        .await
        .unwrap();
    assert_eq!(updated.max_iops, Some(5000));
    assert_eq!(updated.owner_domain_id, Some(A));
}

#[test_case(" 2" ; "leading space")]
#[test_case("2\n" ; "trailing newline")]
#[test_case("+2" ; "explicit sign")]
#[test_case("002" ; "zero padded")]
#[tokio::test]
async fn test_reference_matches_offering_id_not_text(stored: &str) {
    let services = services();
    services
        .metadata
        .set(VmId(9), "diskOfferingId", stored)
        .await
        .unwrap();

    let err = services.admin.delete_offering(A, A_FAST).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(services.query.get(A, A_FAST).await.is_ok());
}

#[tokio::test]
async fn test_unparseable_reference_does_not_block() {
    let services = services();
    services
        .metadata
        .set(VmId(9), "diskOfferingId", "a-fast")
        .await
        .unwrap();
    services.metadata.set(VmId(10), "diskOfferingId", "22").await.unwrap();

    services.admin.delete_offering(A, A_FAST).await.unwrap();
}
