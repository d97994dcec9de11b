use std::marker::PhantomData;

use serde::Serialize;

use crate::authz::grant::RoleGrant;
use crate::authz::role::Role;
use crate::error::StewardError;
use crate::roster::Member;
use crate::session::Viewer;

/// Typestate: assignment picked in the staff listing, not yet evaluated.
pub struct Proposed;

/// Typestate: the policy has evaluated this assignment.
pub struct Evaluated;

/// A role assignment progressing through the policy.
///
/// `AssignmentRequest<Proposed>` → `authz::evaluate` → `AssignmentRequest<Evaluated>`
///
/// `submit()` only exists on `Evaluated`, so an unevaluated request can never
/// produce a backend request body.
pub struct AssignmentRequest<State> {
    pub(crate) actor_id: String,
    pub(crate) actor_role: Option<Role>,
    pub(crate) target_id: String,
    pub(crate) target_role: Option<Role>,
    pub(crate) requested: Role,
    _state: PhantomData<State>,
}

impl AssignmentRequest<Proposed> {
    pub fn new(actor: &Viewer, target: &Member, requested: Role) -> Self {
        Self {
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            target_id: target.id.clone(),
            target_role: target.role,
            requested,
            _state: PhantomData,
        }
    }

    /// Transition to Evaluated state. Only callable within the crate (by `authz`).
    pub(crate) fn transition(self) -> AssignmentRequest<Evaluated> {
        AssignmentRequest {
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            target_id: self.target_id,
            target_role: self.target_role,
            requested: self.requested,
            _state: PhantomData,
        }
    }
}

impl AssignmentRequest<Evaluated> {
    /// Build the backend request body. Requires a `RoleGrant` (consumed on use)
    /// issued for this exact target and role.
    pub fn submit(self, grant: RoleGrant) -> Result<RoleChange, StewardError> {
        if grant.user_id != self.target_id || grant.role != self.requested {
            return Err(StewardError::GrantMismatch(format!(
                "grant is for {} as {}, request is for {} as {}",
                grant.user_id, grant.role, self.target_id, self.requested
            )));
        }

        tracing::info!(
            actor = %self.actor_id,
            target = %self.target_id,
            role = %self.requested,
            "role change ready"
        );

        Ok(RoleChange {
            user_id: self.target_id,
            role: self.requested,
        })
    }
}

/// Body of the backend's role-change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub user_id: String,
    pub role: Role,
}
