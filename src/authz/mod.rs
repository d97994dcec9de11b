pub mod grant;
pub mod labels;
pub mod role;

use grant::RoleGrant;
use role::{Role, UNRANKED};

use crate::assignment::{AssignmentRequest, Evaluated, Proposed};

pub use labels::{color_class, display_name};

/// May the actor see the administrative area.
pub fn has_admin_access(role: Option<Role>) -> bool {
    role.is_some_and(Role::is_admin_tier)
}

/// May the actor open the role-assignment workflow at all.
pub fn can_assign_staff(role: Option<Role>) -> bool {
    role.is_some_and(Role::can_assign_staff_tier)
}

/// Comparison primitive: 1 for the highest authority, 99 for unrecognized input.
pub fn hierarchy_level(role: Option<Role>) -> u8 {
    role.map_or(UNRANKED, Role::level)
}

/// The assignment table. Ground truth for every other assignment decision.
pub fn can_assign_role(assigner: Option<Role>, target: Option<Role>) -> bool {
    let Some(target) = target else {
        return false;
    };
    match assigner {
        Some(Role::Admin) => target != Role::Admin,
        Some(Role::President) => matches!(target, Role::Leader | Role::Staff | Role::Member),
        Some(Role::Leader) => matches!(target, Role::Staff | Role::Member),
        Some(Role::Staff) | Some(Role::Member) | None => false,
    }
}

/// Whether a row for `target` should offer the assign affordance to `current`.
///
/// Visibility only. Callers still take the choice list from [`assignable_roles`]
/// and must hide the affordance on the viewer's own row.
pub fn should_show_assign_button(current: Option<Role>, target: Option<Role>) -> bool {
    if !can_assign_staff(current) {
        return false;
    }

    let current_level = hierarchy_level(current);
    let target_level = hierarchy_level(target);

    match current {
        Some(Role::Admin) => target_level >= 2,
        // Peer president rows pass this check; kept pending product confirmation.
        Some(Role::President) => target_level > 1,
        _ => current_level < target_level,
    }
}

/// Roles `current` may hand out, highest authority first, excluding the role
/// the target already holds.
pub fn assignable_roles(current: Option<Role>, target: Option<Role>) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|&candidate| can_assign_role(current, Some(candidate)))
        .filter(|&candidate| Some(candidate) != target)
        .collect()
}

/// Result of evaluating a proposed role assignment.
#[derive(Debug)]
pub enum Decision {
    Allow(RoleGrant),
    Reject(Rejection),
}

/// Why an assignment was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    SelfAssignment,
    NoAuthority,
    TargetOutranks,
    RoleNotAssignable,
}

impl Rejection {
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::SelfAssignment => "cannot change your own role",
            Rejection::NoAuthority => "no authority to assign roles",
            Rejection::TargetOutranks => "target holds an equal or higher role",
            Rejection::RoleNotAssignable => "requested role is not assignable",
        }
    }
}

/// Evaluate a proposed assignment against the role hierarchy.
///
/// Returns the transitioned request (now `Evaluated`) and the decision. Checks
/// run in the same order the staff listing applies them: own row, authority,
/// button visibility, then the choice list.
pub fn evaluate(proposal: AssignmentRequest<Proposed>) -> (AssignmentRequest<Evaluated>, Decision) {
    let decision = match check(&proposal) {
        Ok(()) => Decision::Allow(RoleGrant::new(&proposal.target_id, proposal.requested)),
        Err(rejection) => Decision::Reject(rejection),
    };

    match &decision {
        Decision::Allow(grant) => tracing::debug!(
            actor = %proposal.actor_id,
            target = %proposal.target_id,
            role = %grant.role(),
            "role assignment allowed"
        ),
        Decision::Reject(rejection) => tracing::debug!(
            actor = %proposal.actor_id,
            target = %proposal.target_id,
            requested = %proposal.requested,
            reason = rejection.reason(),
            "role assignment rejected"
        ),
    }

    (proposal.transition(), decision)
}

fn check(proposal: &AssignmentRequest<Proposed>) -> Result<(), Rejection> {
    if proposal.actor_id == proposal.target_id {
        return Err(Rejection::SelfAssignment);
    }
    if !can_assign_staff(proposal.actor_role) {
        return Err(Rejection::NoAuthority);
    }
    if !should_show_assign_button(proposal.actor_role, proposal.target_role) {
        return Err(Rejection::TargetOutranks);
    }
    let options = assignable_roles(proposal.actor_role, proposal.target_role);
    if !options.contains(&proposal.requested) {
        return Err(Rejection::RoleNotAssignable);
    }
    Ok(())
}
