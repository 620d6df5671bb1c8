//! Static permission tables
//!
//! One role set per capability value. The tables are built once per process
//! and never mutated; changing policy means changing this file.

use crate::models::{Capability, EntityKind, FieldGroup, PageId, Role};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Compact set of roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    const fn bit(role: Role) -> u8 {
        1 << (role as u8)
    }

    pub const fn of(roles: &[Role]) -> RoleSet {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= Self::bit(roles[i]);
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(self, role: Role) -> bool {
        self.0 & Self::bit(role) != 0
    }

    pub fn roles(self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| self.contains(*r)).collect()
    }
}

/// How a page may be used once it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    Full,
    ViewOnly,
}

use Role::*;

const ADMIN_ONLY: RoleSet = RoleSet::of(&[Admin]);
const ALL_STAFF: RoleSet = RoleSet::of(&[Admin, Administrative, Teacher, Doctor, Nurse, Counselor]);
const EVERYONE: RoleSet =
    RoleSet::of(&[Admin, Administrative, Teacher, Doctor, Nurse, Counselor, Family]);

/// Role→capability tables for every capability kind
#[derive(Debug)]
pub struct PermissionTables {
    pages: HashMap<PageId, RoleSet>,
    search: HashMap<EntityKind, RoleSet>,
    field_edit: HashMap<FieldGroup, RoleSet>,
    print: RoleSet,
    manage_bulk_data: RoleSet,
    view_only: RoleSet,
}

static BUILTIN: Lazy<PermissionTables> = Lazy::new(PermissionTables::builtin);

impl PermissionTables {
    /// Process-wide built-in tables
    pub fn global() -> &'static PermissionTables {
        &BUILTIN
    }

    pub fn builtin() -> Self {
        let pages = HashMap::from([
            (PageId::Administration, ADMIN_ONLY),
            (PageId::SearchAndPrint, ALL_STAFF),
            (PageId::Statistics, ALL_STAFF),
            (PageId::SystemManagement, ADMIN_ONLY),
            (PageId::DataManagement, ADMIN_ONLY),
            (PageId::Healthcare, RoleSet::of(&[Admin, Doctor, Nurse, Family])),
            (PageId::Psychology, RoleSet::of(&[Admin, Counselor, Family])),
            (PageId::Classes, RoleSet::of(&[Admin, Teacher, Family])),
            (PageId::RecordsManagement, EVERYONE),
        ]);

        // Admin and administrative search everything; the rest is per kind.
        let search = EntityKind::ALL
            .into_iter()
            .map(|kind| {
                let extra = match kind {
                    EntityKind::Students => RoleSet::of(&[Doctor, Nurse, Counselor, Teacher]),
                    EntityKind::Veterans => RoleSet::of(&[Doctor, Nurse]),
                    EntityKind::MedicalRecords => RoleSet::of(&[Doctor, Nurse]),
                    EntityKind::PsychologicalEvaluations => RoleSet::of(&[Counselor, Teacher]),
                };
                (kind, RoleSet(extra.0 | blanket_search().0))
            })
            .collect();

        let field_edit = HashMap::from([
            (
                FieldGroup::StudentBasic,
                RoleSet::of(&[Admin, Administrative, Teacher, Doctor, Counselor]),
            ),
            (FieldGroup::StudentMedical, RoleSet::of(&[Admin, Doctor, Nurse])),
            (FieldGroup::StudentPsychological, RoleSet::of(&[Admin, Counselor])),
            (FieldGroup::ClassAssignment, RoleSet::of(&[Admin, Teacher])),
            (FieldGroup::Veteran, RoleSet::of(&[Admin, Administrative, Doctor])),
        ]);

        Self {
            pages,
            search,
            field_edit,
            print: ALL_STAFF,
            manage_bulk_data: RoleSet::of(&[Admin, Administrative, Doctor, Teacher]),
            view_only: RoleSet::of(&[Family]),
        }
    }

    /// Roles granted `capability`; a missing row grants nobody
    pub fn roles_for(&self, capability: Capability) -> RoleSet {
        let row = match capability {
            Capability::PageAccess(page) => self.pages.get(&page).copied(),
            Capability::Search(kind) => self.search.get(&kind).copied(),
            Capability::FieldEdit(group) => self.field_edit.get(&group).copied(),
            Capability::Print => Some(self.print),
            Capability::ManageBulkData => Some(self.manage_bulk_data),
        };
        row.unwrap_or(RoleSet::EMPTY)
    }

    pub fn allows(&self, role: Role, capability: Capability) -> bool {
        self.roles_for(capability).contains(role)
    }

    /// Like [`allows`](Self::allows) for a role read as text; unknown roles are denied
    pub fn allows_role_name(&self, role: &str, capability: Capability) -> bool {
        role.parse::<Role>()
            .map(|role| self.allows(role, capability))
            .unwrap_or(false)
    }

    pub fn page_mode(&self, role: Role, page: PageId) -> Option<AccessMode> {
        if !self.allows(role, Capability::PageAccess(page)) {
            return None;
        }
        if self.view_only.contains(role) {
            Some(AccessMode::ViewOnly)
        } else {
            Some(AccessMode::Full)
        }
    }

    /// Capability values that have no row
    pub fn missing_entries(&self) -> Vec<Capability> {
        let mut missing = Vec::new();
        missing.extend(
            PageId::ALL
                .into_iter()
                .filter(|p| !self.pages.contains_key(p))
                .map(Capability::PageAccess),
        );
        missing.extend(
            EntityKind::ALL
                .into_iter()
                .filter(|k| !self.search.contains_key(k))
                .map(Capability::Search),
        );
        missing.extend(
            FieldGroup::ALL
                .into_iter()
                .filter(|g| !self.field_edit.contains_key(g))
                .map(Capability::FieldEdit),
        );
        missing
    }

    /// Every capability with the roles it grants
    pub fn matrix(&self) -> Vec<(Capability, Vec<Role>)> {
        Capability::all()
            .into_iter()
            .map(|c| (c, self.roles_for(c).roles()))
            .collect()
    }
}

fn blanket_search() -> RoleSet {
    Role::ALL
        .into_iter()
        .filter(Role::has_blanket_search)
        .fold(RoleSet::EMPTY, |set, role| RoleSet(set.0 | RoleSet::bit(role)))
}

/// Shorthand for `PermissionTables::global().allows(..)`
pub fn allows(role: Role, capability: Capability) -> bool {
    PermissionTables::global().allows(role, capability)
}
