// Role hierarchy behavior through the public API, starting from raw strings
// the way a route guard or staff listing receives them.

use steward::assignment::AssignmentRequest;
use steward::authz::role::Role;
use steward::authz::{self, Decision, Rejection};
use steward::roster::{self, Member, RosterQuery};
use steward::session::Viewer;

const ROLES: [&str; 5] = ["ADMIN", "PRESIDENT", "LEADER", "STAFF", "MEMBER"];

fn role(raw: &str) -> Option<Role> {
    Role::normalize(Some(raw))
}

#[test]
fn level_order_matches_declared_authority() {
    for (i, a) in ROLES.iter().enumerate() {
        for (j, b) in ROLES.iter().enumerate() {
            assert_eq!(
                authz::hierarchy_level(role(a)) < authz::hierarchy_level(role(b)),
                i < j,
                "{a} vs {b}"
            );
        }
    }
}

#[test]
fn garbage_input_fails_closed() {
    assert_eq!(authz::hierarchy_level(Role::normalize(None)), 99);
    assert!(!authz::can_assign_staff(Role::normalize(None)));
    assert!(!authz::has_admin_access(role("")));
    assert!(authz::assignable_roles(role("bogus"), None).is_empty());
    assert!(!authz::can_assign_role(role("bogus"), role("MEMBER")));
}

#[test]
fn case_insensitive_input() {
    assert!(authz::has_admin_access(role("staff")));
    assert!(authz::can_assign_role(role("Admin"), role("president")));
    assert_eq!(
        authz::assignable_roles(role("admin"), role("President")),
        vec![Role::Leader, Role::Staff, Role::Member]
    );
}

#[test]
fn staff_and_member_never_assign() {
    for assigner in ["STAFF", "MEMBER"] {
        assert!(authz::assignable_roles(role(assigner), None).is_empty());
        for target in ROLES {
            assert!(!authz::can_assign_role(role(assigner), role(target)));
            assert!(!authz::should_show_assign_button(role(assigner), role(target)));
        }
    }
}

#[test]
fn offered_roles_are_always_legal() {
    for viewer in ROLES {
        for target in ROLES {
            for offered in authz::assignable_roles(role(viewer), role(target)) {
                assert!(authz::can_assign_role(role(viewer), Some(offered)));
                assert_ne!(Some(offered), role(target));
            }
        }
    }
}

#[test]
fn button_scenarios() {
    assert!(authz::should_show_assign_button(role("LEADER"), role("STAFF")));
    assert!(!authz::should_show_assign_button(role("LEADER"), role("PRESIDENT")));
    assert!(!authz::should_show_assign_button(role("STAFF"), role("MEMBER")));
    assert!(!authz::should_show_assign_button(role("PRESIDENT"), role("ADMIN")));
}

#[test]
fn listing_to_request_body() {
    let viewer = Viewer::from_json(r#"{"id": "u-1", "role": "leader"}"#).unwrap();
    let members: Vec<Member> = serde_json::from_str(
        r#"[
            {"id": "u-1", "name": "Me", "role": "LEADER"},
            {"id": "u-2", "name": "Kim", "role": "MEMBER"},
            {"id": "u-3", "name": "Lee", "role": "PRESIDENT"}
        ]"#,
    )
    .unwrap();
    let labels = Default::default();

    let page = roster::view(&viewer, &members, &RosterQuery::default(), &labels);
    let assignable: Vec<&str> = page
        .rows
        .iter()
        .filter(|r| r.show_assign_button)
        .map(|r| r.member.name.as_str())
        .collect();
    assert_eq!(assignable, vec!["Kim"]);

    let kim = &members[1];
    assert_eq!(roster::role_options(&viewer, kim), vec![Role::Staff]);

    let (request, decision) = authz::evaluate(AssignmentRequest::new(&viewer, kim, Role::Staff));
    let Decision::Allow(grant) = decision else {
        panic!("expected Allow");
    };
    let change = request.submit(grant).unwrap();
    assert_eq!(
        serde_json::to_string(&change).unwrap(),
        r#"{"userId":"u-2","role":"STAFF"}"#
    );

    let lee = &members[2];
    let (_, decision) = authz::evaluate(AssignmentRequest::new(&viewer, lee, Role::Member));
    assert!(matches!(decision, Decision::Reject(Rejection::TargetOutranks)));
}
