use super::common::*;
use serde_json::{json, Value};

use crate::harvest::domain::{ActorId, HarvestId};
use crate::harvest::locale::Locale;
use crate::harvest::projection::derived::INVENTORY_DELIMITER;
use crate::harvest::projection::{
    ActorView, CommunityView, EquipmentView, HarvestListView, HarvestProjection, HarvestView,
    OrganizationView, PersonView, ProjectionError, PropertyListView, PropertyProjection,
    PropertyView, ViewMode,
};

fn to_json<T: serde::Serialize>(view: &T) -> Value {
    serde_json::to_value(view).expect("view serializes")
}

fn property_json(id: crate::harvest::domain::PropertyId, mode: ViewMode) -> Value {
    let graph = graph();
    let property = graph.property(id).expect("fixture property");
    let view =
        PropertyProjection::project(&graph, &context(), property, mode).expect("projection");
    to_json(&view)
}

fn harvest_view(id: HarvestId) -> HarvestView {
    let graph = graph();
    let harvest = graph.harvest(id).expect("fixture harvest");
    HarvestView::project(&graph, &context(), harvest).expect("projection")
}

#[test]
fn unowned_property_projects_null_owner_and_neutral_owner_type() {
    let body = property_json(UNOWNED, ViewMode::Full);

    assert_eq!(body["owner"], Value::Null);
    assert_eq!(
        body["owner_type"],
        json!({ "is_person": false, "is_organization": false })
    );
    assert_eq!(body["title"], "Robin Pending at 88 Avenue Papineau");
}

#[test]
fn organization_owner_hides_comments_behind_placeholder() {
    let body = property_json(COOP_OWNED, ViewMode::Full);
    let owner = &body["owner"];

    assert_eq!(owner["pk"], 20);
    assert_eq!(owner["name"], "Green Co-op");
    assert_eq!(owner["email"], Value::Null);
    assert_eq!(owner["language"], "English");
    assert_eq!(owner["comments"], "Owner is an Organization");
    assert_eq!(owner["neighborhood"], 2);
    assert_eq!(
        body["owner_type"],
        json!({ "is_person": false, "is_organization": true })
    );
    assert_eq!(body["address"], "12 Rue Rachel, back yard");
}

#[test]
fn person_owner_exposes_contact_details() {
    let body = property_json(PERSON_OWNED, ViewMode::Full);
    let owner = &body["owner"];

    assert_eq!(
        keys(owner),
        vec![
            "city",
            "comments",
            "country",
            "email",
            "language",
            "name",
            "neighborhood",
            "phone",
            "pk",
            "state"
        ]
    );
    assert_eq!(owner["name"], "Alex Tremblay");
    assert_eq!(owner["email"], "alex@example.org");
    assert_eq!(owner["language"], "Français");
    assert_eq!(owner["comments"], "Back gate code 1234");
    assert_eq!(body["title"], "Alex Tremblay at 4521 Rue Fabre");
    assert_eq!(body["neighborhood"], json!({ "id": 1, "name": "Plateau" }));
    assert_eq!(body["city"]["name"], "Montréal");
}

#[test]
fn dangling_owner_is_an_integrity_fault() {
    let graph = dangling_owner_graph();
    let property = graph.property(COOP_OWNED).expect("fixture property");

    let err = PropertyView::project(&graph, &context(), property).expect_err("owner unresolved");
    assert_eq!(err, ProjectionError::UnresolvedActor(ActorId(404)));

    let err = PropertyListView::project(&graph, &context(), property)
        .expect_err("list title needs the owner");
    assert_eq!(err, ProjectionError::UnresolvedActor(ActorId(404)));

    let harvest = graph.harvest(READY_HARVEST).expect("fixture harvest");
    let err = HarvestListView::project(&graph, &context(), harvest)
        .expect_err("calendar title needs the owner");
    assert_eq!(err, ProjectionError::UnresolvedActor(ActorId(404)));
}

#[test]
fn accepted_request_from_unknown_person_is_an_integrity_fault() {
    let mut seed = seed();
    seed.requests[0].person = ActorId(505);
    let graph = crate::harvest::graph::EntityGraph::from_seed(seed).expect("graph builds");
    let harvest = graph.harvest(SUCCEEDED_HARVEST).expect("fixture harvest");

    let err = HarvestView::project(&graph, &context(), harvest).expect_err("picker missing");
    assert_eq!(
        err,
        ProjectionError::MissingEntity {
            kind: "person",
            id: 505
        }
    );
}

#[test]
fn request_on_unknown_harvest_breaks_person_history() {
    let mut seed = seed();
    seed.requests[1].harvest = HarvestId(9999);
    let graph = crate::harvest::graph::EntityGraph::from_seed(seed).expect("graph builds");
    let jordan = graph.person(JORDAN).expect("fixture person");

    let err = PersonView::project(&graph, jordan).expect_err("harvest missing");
    assert_eq!(
        err,
        ProjectionError::MissingEntity {
            kind: "harvest",
            id: 9999
        }
    );
}

#[test]
fn full_property_embeds_only_narrowed_harvests() {
    let body = property_json(PERSON_OWNED, ViewMode::Full);
    let harvests = body["harvests"].as_array().expect("harvest array");

    assert_eq!(harvests.len(), 2);
    for entry in harvests {
        assert_eq!(keys(entry), vec!["id", "pick_leader", "start_date", "status"]);
        assert!(entry.get("property").is_none());
    }
    assert_eq!(harvests[0]["status"], "Succeeded");
    assert_eq!(harvests[0]["pick_leader"]["name"], "Sam Roy");
    assert_eq!(harvests[0]["start_date"], "2024-08-03");
    assert_eq!(harvests[1]["pick_leader"], Value::Null);
    assert_eq!(body["last_succeeded_harvest_date"], "2024-08-03");
}

#[test]
fn full_harvest_embeds_property_without_reexpanding() {
    let view = harvest_view(SUCCEEDED_HARVEST);
    let body = to_json(&view);

    assert_eq!(body["property"]["id"], 1);
    for entry in body["property"]["harvests"].as_array().expect("harvest array") {
        assert!(entry.get("property").is_none());
        assert!(entry.get("trees").is_none());
    }
}

#[test]
fn list_shapes_are_subsets_of_full_shapes() {
    for id in [PERSON_OWNED, COOP_OWNED, UNOWNED] {
        let full = keys(&property_json(id, ViewMode::Full));
        for mode in [ViewMode::List, ViewMode::OwnerRestricted] {
            for field in keys(&property_json(id, mode)) {
                assert!(full.contains(&field), "{field} missing from full property");
            }
        }
    }

    let graph = graph();
    for harvest in graph.harvests() {
        let full = keys(&to_json(
            &HarvestView::project(&graph, &context(), harvest).expect("full"),
        ));
        let list = keys(&to_json(
            &HarvestListView::project(&graph, &context(), harvest).expect("list"),
        ));
        for field in list {
            assert!(full.contains(&field), "{field} missing from full harvest");
        }
    }
}

#[test]
fn property_list_narrows_nested_entities() {
    let body = property_json(PERSON_OWNED, ViewMode::List);

    assert_eq!(body["neighborhood"], "Plateau");
    assert_eq!(
        body["trees"],
        json!([
            { "name": "Apple tree", "fruit_name": "Apple" },
            { "name": "Cherry tree", "fruit_name": "Cherry" }
        ])
    );
    assert_eq!(
        body["harvests"][0],
        json!({
            "id": 1000,
            "status": "Succeeded",
            "start_date": "2024-08-03",
            "pick_leader": "Sam Roy"
        })
    );
}

#[test]
fn harvest_times_share_the_local_start_instant() {
    let first = harvest_view(SUCCEEDED_HARVEST);
    let second = harvest_view(SUCCEEDED_HARVEST);

    assert_eq!(first.start_date, "2024-08-03");
    assert_eq!(first.start_time, "10:00");
    assert_eq!(first.end_time, "12:30");
    assert_eq!(
        (first.start_date, first.start_time, first.end_time),
        (second.start_date, second.start_time, second.end_time)
    );
}

#[test]
fn harvest_status_renders_display_label() {
    let view = harvest_view(SCHEDULED_HARVEST);
    assert_eq!(view.status, "Scheduled");
    assert_eq!(to_json(&view)["status"], "Scheduled");
}

#[test]
fn harvest_aggregates_follow_the_graph() {
    let view = harvest_view(SUCCEEDED_HARVEST);
    assert_eq!(view.pickers.len(), 1);
    assert_eq!(view.pickers[0].name, "Jordan");
    assert_eq!(view.pickers[0].number_of_pickers, 2);
    assert!((view.total_distribution - 20.0).abs() < f64::EPSILON);
    assert!(!view.is_open_to_requests);
    assert_eq!(view.neighborhood.as_deref(), Some("Plateau"));
    assert_eq!(
        view.pick_leader.as_ref().map(|leader| leader.name.as_str()),
        Some("Sam Roy")
    );

    assert!(harvest_view(SCHEDULED_HARVEST).is_open_to_requests);
    assert!(!harvest_view(READY_HARVEST).is_open_to_requests);
}

#[test]
fn harvest_list_collapses_property_to_title() {
    let graph = graph();
    let harvest = graph.harvest(READY_HARVEST).expect("fixture harvest");
    let view = HarvestProjection::project(&graph, &context(), harvest, ViewMode::List)
        .expect("projection");
    let body = to_json(&view);

    assert_eq!(body["property"], "Green Co-op at 12 Rue Rachel, back yard");
    assert_eq!(body["neighborhood"], "Rosemont");
    assert_eq!(body["trees"], json!([{ "id": 1, "name": "Apple tree", "fruit_name": "Apple" }]));
    assert_eq!(body["pick_leader"], json!({ "id": 100, "name": "Sam Roy" }));
}

#[test]
fn harvest_has_no_owner_restricted_view() {
    let graph = graph();
    let harvest = graph.harvest(READY_HARVEST).expect("fixture harvest");
    let err = HarvestProjection::project(&graph, &context(), harvest, ViewMode::OwnerRestricted)
        .expect_err("unsupported");
    assert!(matches!(err, ProjectionError::UnsupportedView { entity: "harvest", .. }));
}

#[test]
fn person_without_account_has_empty_roles() {
    let graph = graph();
    let jordan = graph.person(JORDAN).expect("fixture person");
    let body = to_json(&PersonView::project(&graph, jordan).expect("projection"));

    assert_eq!(body["roles"], json!([]));
    assert_eq!(body["neighborhood"], Value::Null);
    assert_eq!(body["harvests_as_volunteer_succeeded"], json!([1000]));
    assert_eq!(body["harvests_as_volunteer_pending"], json!([1001]));
    assert_eq!(body["harvests_as_volunteer_accepted"], json!([]));
}

#[test]
fn person_history_covers_every_role() {
    let graph = graph();
    let alex =
        PersonView::project(&graph, graph.person(ALEX).expect("alex")).expect("projection");
    assert_eq!(alex.roles, vec!["Property Owner"]);
    assert_eq!(alex.history.harvests_as_owner, vec![SUCCEEDED_HARVEST, SCHEDULED_HARVEST]);
    assert_eq!(alex.history.harvests_as_volunteer_rejected, vec![READY_HARVEST]);
    assert_eq!(alex.organizations_as_contact, vec![GREEN_COOP]);
    assert_eq!(alex.properties, vec![PERSON_OWNED]);

    let sam =
        PersonView::project(&graph, graph.person(SAM).expect("sam")).expect("projection");
    assert_eq!(sam.roles, vec!["Pick Leader", "Volunteer"]);
    assert_eq!(
        sam.history.harvests_as_pickleader,
        vec![SUCCEEDED_HARVEST, READY_HARVEST]
    );
}

#[test]
fn organization_inventory_joins_equipment_per_language() {
    let graph = graph();
    let coop = graph.organization(GREEN_COOP).expect("fixture organization");
    let view = OrganizationView::project(&graph, &context(), coop).expect("projection");

    let french = &view.inventory[&Locale::Fr];
    let english = &view.inventory[&Locale::En];
    assert_eq!(french.split(INVENTORY_DELIMITER).count(), view.equipment.len());
    assert_eq!(french, "2 Échelle&;10 Seau");
    assert_eq!(english, "2 Ladder&;10 Bucket");

    let body = to_json(&view);
    assert_eq!(body["inventory"], json!({ "fr": "2 Échelle&;10 Seau", "en": "2 Ladder&;10 Bucket" }));
    assert_eq!(body["equipment"][0]["type"]["name"], "Échelle");
    assert_eq!(body["contact_person"]["name"], "Alex Tremblay");
}

#[test]
fn organization_without_equipment_has_empty_inventory() {
    let mut seed = seed();
    seed.equipment.retain(|item| item.owner.is_none());
    let graph = crate::harvest::graph::EntityGraph::from_seed(seed).expect("graph builds");
    let coop = graph.organization(GREEN_COOP).expect("fixture organization");
    let view = OrganizationView::project(&graph, &context(), coop).expect("projection");

    assert!(view.equipment.is_empty());
    assert_eq!(view.inventory[&Locale::Fr], "");
    assert_eq!(view.inventory[&Locale::En], "");
}

#[test]
fn locale_picks_equipment_type_name() {
    let graph = graph();
    let coop = graph.organization(GREEN_COOP).expect("fixture organization");
    let ctx = context().with_locale(Locale::En);
    let view = OrganizationView::project(&graph, &ctx, coop).expect("projection");
    assert_eq!(view.equipment[0].equipment_type.name, "Ladder");
}

#[test]
fn actor_view_populates_exactly_one_subtype() {
    let graph = graph();

    let person = to_json(&ActorView::project(&graph, &context(), ALEX).expect("person actor"));
    assert_eq!(person["actor_type"], "person");
    assert_eq!(person["is_person"], true);
    assert_eq!(person["organization"], Value::Null);
    assert_eq!(person["person"]["name"], "Alex Tremblay");

    let organization =
        to_json(&ActorView::project(&graph, &context(), GREEN_COOP).expect("org actor"));
    assert_eq!(organization["actor_type"], "organization");
    assert_eq!(organization["person"], Value::Null);
    assert_eq!(organization["organization"]["civil_name"], "Green Co-op");

    let err = ActorView::project(&graph, &context(), ActorId(999)).expect_err("unresolved");
    assert_eq!(err, ProjectionError::UnresolvedActor(ActorId(999)));
}

#[test]
fn equipment_view_uses_owner_restricted_property_shape() {
    let graph = graph();
    let views: Vec<EquipmentView> = graph
        .equipment()
        .map(|item| EquipmentView::project(&graph, &context(), item).expect("projection"))
        .collect();

    let on_property = to_json(&views[2]);
    assert_eq!(
        keys(&on_property["property"]),
        vec!["id", "neighborhood", "owner", "title"]
    );
    assert_eq!(on_property["property"]["owner"]["name"], "Alex Tremblay");
    assert_eq!(on_property["owner"], Value::Null);
    assert_eq!(on_property["type"]["name_en"], "Ladder");

    let owned = to_json(&views[0]);
    assert_eq!(owned["property"], Value::Null);
    assert_eq!(owned["owner"]["is_organization"], true);
}

#[test]
fn community_view_lists_labels_and_codes() {
    let graph = graph();
    let sam = graph
        .auth_users()
        .find(|user| user.person == Some(SAM))
        .expect("sam's account");
    let view = CommunityView::project(&graph, sam).expect("projection");
    assert_eq!(view.roles, vec!["Pick Leader", "Volunteer"]);
    assert_eq!(view.role_codes, vec!["pickleader", "volunteer"]);
    assert_eq!(
        view.person.as_ref().map(|person| person.name.as_str()),
        Some("Sam Roy")
    );

    let core = graph
        .auth_users()
        .find(|user| user.person.is_none())
        .expect("core account");
    let body = to_json(&CommunityView::project(&graph, core).expect("projection"));
    assert_eq!(body["person"], Value::Null);
    assert_eq!(body["role_codes"], json!(["core"]));
    assert!(body.get("password").is_none());
}
