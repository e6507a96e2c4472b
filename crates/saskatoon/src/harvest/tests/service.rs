use super::common::*;

use crate::harvest::domain::{ActorId, AuthUserId, HarvestId, PropertyId};
use crate::harvest::locale::Locale;
use crate::harvest::projection::{HarvestProjection, ProjectionError, PropertyProjection, ViewMode};
use crate::harvest::repository::StoreError;
use crate::harvest::service::ProjectionServiceError;

#[test]
fn store_faults_propagate_unchanged() {
    let service = build_service(UnavailableStore);

    let err = service
        .property(PERSON_OWNED, ViewMode::Full, None)
        .expect_err("store offline");
    match err {
        ProjectionServiceError::Store(StoreError::Unavailable(reason)) => {
            assert_eq!(reason, "database offline")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_ids_are_not_found() {
    let service = build_service(MemoryStore::new(graph()));

    assert!(matches!(
        service.property(PropertyId(77), ViewMode::Full, None),
        Err(ProjectionServiceError::NotFound { kind: "property", id: 77 })
    ));
    assert!(matches!(
        service.harvest(HarvestId(77), ViewMode::List, None),
        Err(ProjectionServiceError::NotFound { kind: "harvest", .. })
    ));
    assert!(matches!(
        service.actor(ActorId(77), None),
        Err(ProjectionServiceError::NotFound { kind: "actor", .. })
    ));
    assert!(matches!(
        service.community_member(AuthUserId(77)),
        Err(ProjectionServiceError::NotFound { .. })
    ));
}

#[test]
fn dangling_owner_surfaces_as_projection_error() {
    let service = build_service(MemoryStore::new(dangling_owner_graph()));

    let err = service
        .properties(ViewMode::Full, None)
        .expect_err("integrity fault");
    assert!(matches!(
        err,
        ProjectionServiceError::Projection(ProjectionError::UnresolvedActor(ActorId(404)))
    ));

    let err = service
        .harvests(ViewMode::List, None)
        .expect_err("calendar titles resolve owners");
    assert!(matches!(
        err,
        ProjectionServiceError::Projection(ProjectionError::UnresolvedActor(ActorId(404)))
    ));
}

#[test]
fn collection_views_follow_requested_mode() {
    let service = build_service(MemoryStore::new(graph()));

    let rows = service.properties(ViewMode::List, None).expect("rows");
    assert!(rows
        .iter()
        .all(|row| matches!(row, PropertyProjection::List(_))));

    let calendar = service.harvests(ViewMode::Full, Some(Locale::En)).expect("harvests");
    assert_eq!(calendar.len(), 3);
    assert!(calendar
        .iter()
        .all(|row| matches!(row, HarvestProjection::Full(_))));
}

#[test]
fn owner_view_dispatches_on_actor_subtype() {
    let service = build_service(MemoryStore::new(graph()));

    let organization = service.owner(GREEN_COOP).expect("organization owner");
    assert_eq!(organization.comments, "Owner is an Organization");

    let person = service.owner(ALEX).expect("person owner");
    assert_eq!(person.comments, "Back gate code 1234");
}

#[test]
fn organization_defaults_to_service_locale() {
    let service = build_service(MemoryStore::new(graph()));
    assert_eq!(service.default_locale(), Locale::Fr);

    let french = service.organization(GREEN_COOP, None).expect("organization");
    assert_eq!(french.equipment[1].equipment_type.name, "Seau");

    let english = service
        .organization(GREEN_COOP, Some(Locale::En))
        .expect("organization");
    assert_eq!(english.equipment[1].equipment_type.name, "Bucket");
}

#[test]
fn participation_requests_filter_by_harvest() {
    let service = build_service(MemoryStore::new(graph()));

    assert_eq!(service.participation_requests(None).expect("all").len(), 3);
    let scoped = service
        .participation_requests(Some(SCHEDULED_HARVEST))
        .expect("scoped");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].person, JORDAN);
    assert_eq!(scoped[0].status_label, "Pending");
}
