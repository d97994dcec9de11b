//! Staff listing view model.
//!
//! Filters, sorts and pages the member list returned by the backend, and
//! decides per row whether the viewer gets the assign-role affordance.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::authz;
use crate::authz::labels::RoleLabels;
use crate::authz::role::{self, Role};
use crate::session::{self, Viewer};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One row of the backend's member listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    #[serde(deserialize_with = "session::deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "role::deserialize_lenient")]
    pub role: Option<Role>,
}

impl Member {
    pub fn new(id: &str, name: &str, role: Option<Role>) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            email: None,
            role,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    /// Highest authority first, then by name.
    Rank,
}

#[derive(Debug, Clone)]
pub struct RosterQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub sort: SortKey,
    pub offset: usize,
    pub limit: usize,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self {
            search: None,
            role: None,
            sort: SortKey::default(),
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RosterQuery {
    /// Query for a 1-based page number.
    pub fn page(page: usize) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(DEFAULT_PAGE_SIZE),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMetadata {
    pub count: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug)]
pub struct RosterRow<'a> {
    pub member: &'a Member,
    pub label: &'a str,
    pub color: &'a str,
    pub show_assign_button: bool,
}

#[derive(Debug)]
pub struct RosterPage<'a> {
    pub rows: Vec<RosterRow<'a>>,
    pub pagination: PaginationMetadata,
}

/// Build one page of the staff listing as seen by `viewer`.
pub fn view<'a>(
    viewer: &Viewer,
    members: &'a [Member],
    query: &RosterQuery,
    labels: &'a RoleLabels,
) -> RosterPage<'a> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<&Member> = members
        .iter()
        .filter(|m| query.role.is_none() || m.role == query.role)
        .filter(|m| needle.as_deref().is_none_or(|n| matches_search(m, n)))
        .collect();

    match query.sort {
        SortKey::Name => matched.sort_by(|a, b| by_name(a, b)),
        SortKey::Rank => matched.sort_by(|a, b| {
            authz::hierarchy_level(a.role)
                .cmp(&authz::hierarchy_level(b.role))
                .then_with(|| by_name(a, b))
        }),
    }

    let count = matched.len();
    let rows = matched
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .map(|member| RosterRow {
            member,
            label: labels.display_name(member.role),
            color: labels.color_class(member.role),
            show_assign_button: show_assign_button(viewer, member),
        })
        .collect();

    RosterPage {
        rows,
        pagination: PaginationMetadata {
            count,
            offset: query.offset,
            limit: query.limit,
        },
    }
}

/// Assign affordance for one row. Never shown on the viewer's own row.
pub fn show_assign_button(viewer: &Viewer, member: &Member) -> bool {
    viewer.id != member.id && authz::should_show_assign_button(viewer.role, member.role)
}

/// Choices for the role selector opened from `member`'s row.
pub fn role_options(viewer: &Viewer, member: &Member) -> Vec<Role> {
    if viewer.id == member.id {
        return Vec::new();
    }
    authz::assignable_roles(viewer.role, member.role)
}

fn matches_search(member: &Member, needle: &str) -> bool {
    member.name.to_lowercase().contains(needle)
        || member
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(needle))
}

fn by_name(a: &Member, b: &Member) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}
