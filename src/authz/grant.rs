use super::role::Role;

/// Unforgeable role grant. Proof that the policy has evaluated a proposed
/// assignment and approved giving `role` to `user_id`.
///
/// Construction is double-locked:
/// 1. `Seal` is a private type, so struct literals fail outside this file.
/// 2. `new()` is `pub(super)`, so only `authz` can call it.
///
/// No `Clone`, `Copy`, `Default`, or `From`. A grant is consumed when the
/// assignment is submitted.
///
/// ```compile_fail
/// use steward::authz::grant::RoleGrant;
/// use steward::authz::role::Role;
///
/// let _grant = RoleGrant::new("u-1", Role::Staff);
/// ```
#[derive(Debug)]
pub struct RoleGrant {
    pub(crate) user_id: String,
    pub(crate) role: Role,
    _seal: Seal,
}

#[derive(Debug)]
struct Seal;

impl RoleGrant {
    pub(super) fn new(user_id: &str, role: Role) -> Self {
        Self {
            user_id: user_id.to_owned(),
            role,
            _seal: Seal,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
