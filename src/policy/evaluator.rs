//! 策略评估器
//! 所有特权操作在执行前调用的唯一检查点

use super::{
    denial::Denial,
    tables::{AccessMode, PermissionTables},
};
use crate::models::{Capability, EntityKind, PageId, Principal, RecordId};
use std::collections::BTreeSet;

/// Stateless evaluator over a set of permission tables
#[derive(Debug, Clone, Copy)]
pub struct PolicyEvaluator {
    tables: &'static PermissionTables,
}

impl Default for PolicyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyEvaluator {
    pub fn new() -> Self {
        Self::with_tables(PermissionTables::global())
    }

    pub fn with_tables(tables: &'static PermissionTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'static PermissionTables {
        self.tables
    }

    /// 检查页面访问（未知页面一律拒绝）
    pub fn check_page_access(&self, principal: &Principal, page_id: &str) -> bool {
        page_id
            .parse::<PageId>()
            .map(|page| self.check_page(principal, page))
            .unwrap_or(false)
    }

    pub fn check_page(&self, principal: &Principal, page: PageId) -> bool {
        self.check_capability(principal, Capability::PageAccess(page))
    }

    pub fn check_capability(&self, principal: &Principal, capability: Capability) -> bool {
        self.tables.allows(principal.role(), capability)
    }

    /// 可见记录集合
    ///
    /// `None` means every record of the kind is visible. Family principals
    /// see only their linked student; roles that may not search a kind see
    /// nothing of it.
    pub fn accessible_record_ids(
        &self,
        principal: &Principal,
        kind: EntityKind,
    ) -> Option<BTreeSet<RecordId>> {
        if let Some(record_id) = principal.scoped_record_id() {
            let mut visible = BTreeSet::new();
            if kind.is_student_kind() {
                visible.insert(record_id);
            }
            return Some(visible);
        }

        if self.check_capability(principal, Capability::Search(kind)) {
            None
        } else {
            Some(BTreeSet::new())
        }
    }

    pub fn check_record_access(
        &self,
        principal: &Principal,
        kind: EntityKind,
        record_id: RecordId,
    ) -> bool {
        match self.accessible_record_ids(principal, kind) {
            None => true,
            Some(visible) => visible.contains(&record_id),
        }
    }

    /// 按可见范围过滤查询结果，保持原有顺序
    pub fn filter_accessible(
        &self,
        principal: &Principal,
        kind: EntityKind,
        ids: impl IntoIterator<Item = RecordId>,
    ) -> Vec<RecordId> {
        match self.accessible_record_ids(principal, kind) {
            None => ids.into_iter().collect(),
            Some(visible) => ids.into_iter().filter(|id| visible.contains(id)).collect(),
        }
    }

    /// 当前主体可打开的页面
    pub fn accessible_pages(&self, principal: &Principal) -> Vec<PageId> {
        PageId::ALL
            .into_iter()
            .filter(|page| self.check_page(principal, *page))
            .collect()
    }

    pub fn page_mode(&self, principal: &Principal, page: PageId) -> Option<AccessMode> {
        self.tables.page_mode(principal.role(), page)
    }

    /// 条件不成立时返回拒绝；调用方必须在任何副作用之前调用
    pub fn require(&self, condition: bool, denial: impl FnOnce() -> Denial) -> Result<(), Denial> {
        if condition {
            return Ok(());
        }

        let denial = denial();
        tracing::warn!(
            kind = denial.kind(),
            reason = %denial,
            "Permission denied"
        );
        metrics::counter!("policy_denials_total", "kind" => denial.kind()).increment(1);
        Err(denial)
    }

    pub fn require_page_access(&self, principal: &Principal, page_id: &str) -> Result<(), Denial> {
        self.require(self.check_page_access(principal, page_id), || Denial::PageDenied {
            role: principal.role(),
            page: page_id.to_string(),
        })
    }

    pub fn require_page(&self, principal: &Principal, page: PageId) -> Result<(), Denial> {
        self.require(self.check_page(principal, page), || {
            Denial::page(principal.role(), page)
        })
    }

    pub fn require_capability(
        &self,
        principal: &Principal,
        capability: Capability,
    ) -> Result<(), Denial> {
        self.require(self.check_capability(principal, capability), || {
            Denial::CapabilityDenied {
                role: principal.role(),
                capability,
            }
        })
    }

    pub fn require_record(
        &self,
        principal: &Principal,
        kind: EntityKind,
        record_id: RecordId,
    ) -> Result<(), Denial> {
        self.require(self.check_record_access(principal, kind, record_id), || {
            Denial::RecordDenied {
                role: principal.role(),
                kind,
                record_id,
            }
        })
    }
}
