//! Capability vocabulary: pages, entity kinds and field groups

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record identifier as stored in the local database
pub type RecordId = i64;

/// Application pages, keyed by their verbatim router ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PageId {
    Administration,
    Healthcare,
    #[serde(rename = "Records_Management")]
    RecordsManagement,
    Psychology,
    Classes,
    #[serde(rename = "Search_and_Print")]
    SearchAndPrint,
    #[serde(rename = "Data_Management")]
    DataManagement,
    #[serde(rename = "System_Management")]
    SystemManagement,
    Statistics,
}

impl PageId {
    pub const ALL: [PageId; 9] = [
        PageId::Administration,
        PageId::Healthcare,
        PageId::RecordsManagement,
        PageId::Psychology,
        PageId::Classes,
        PageId::SearchAndPrint,
        PageId::DataManagement,
        PageId::SystemManagement,
        PageId::Statistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Administration => "Administration",
            PageId::Healthcare => "Healthcare",
            PageId::RecordsManagement => "Records_Management",
            PageId::Psychology => "Psychology",
            PageId::Classes => "Classes",
            PageId::SearchAndPrint => "Search_and_Print",
            PageId::DataManagement => "Data_Management",
            PageId::SystemManagement => "System_Management",
            PageId::Statistics => "Statistics",
        }
    }
}

/// Kinds of records that can be searched or scoped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Students,
    Veterans,
    MedicalRecords,
    PsychologicalEvaluations,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Students,
        EntityKind::Veterans,
        EntityKind::MedicalRecords,
        EntityKind::PsychologicalEvaluations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Students => "students",
            EntityKind::Veterans => "veterans",
            EntityKind::MedicalRecords => "medical_records",
            EntityKind::PsychologicalEvaluations => "psychological_evaluations",
        }
    }

    /// Whether a family principal's linked record id addresses this kind
    pub fn is_student_kind(&self) -> bool {
        matches!(self, EntityKind::Students)
    }
}

/// Editable field groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    StudentBasic,
    StudentMedical,
    StudentPsychological,
    ClassAssignment,
    Veteran,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 5] = [
        FieldGroup::StudentBasic,
        FieldGroup::StudentMedical,
        FieldGroup::StudentPsychological,
        FieldGroup::ClassAssignment,
        FieldGroup::Veteran,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::StudentBasic => "student_basic",
            FieldGroup::StudentMedical => "student_medical",
            FieldGroup::StudentPsychological => "student_psychological",
            FieldGroup::ClassAssignment => "class_assignment",
            FieldGroup::Veteran => "veteran",
        }
    }
}

/// A permission request passed to the evaluator at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PageAccess(PageId),
    FieldEdit(FieldGroup),
    Search(EntityKind),
    Print,
    ManageBulkData,
}

impl Capability {
    /// Every capability value, in matrix order
    pub fn all() -> Vec<Capability> {
        let mut all = Vec::new();
        all.extend(PageId::ALL.into_iter().map(Capability::PageAccess));
        all.extend(EntityKind::ALL.into_iter().map(Capability::Search));
        all.extend(FieldGroup::ALL.into_iter().map(Capability::FieldEdit));
        all.push(Capability::Print);
        all.push(Capability::ManageBulkData);
        all
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::PageAccess(page) => write!(f, "page_access({})", page),
            Capability::FieldEdit(group) => write!(f, "field_edit({})", group),
            Capability::Search(kind) => write!(f, "search({})", kind),
            Capability::Print => f.write_str("print"),
            Capability::ManageBulkData => f.write_str("manage_bulk_data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCapabilityError {
    #[error("unknown page: {0}")]
    UnknownPage(String),
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),
    #[error("unknown field group: {0}")]
    UnknownFieldGroup(String),
    #[error("malformed capability: {0}")]
    Malformed(String),
}

impl FromStr for PageId {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::ALL
            .iter()
            .copied()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| ParseCapabilityError::UnknownPage(s.to_string()))
    }
}

impl FromStr for EntityKind {
    type Err = ParseCapabilityError;

    // Singular forms are accepted as well ("student" -> students).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" | "student" => Ok(EntityKind::Students),
            "veterans" | "veteran" => Ok(EntityKind::Veterans),
            "medical_records" | "medical_record" => Ok(EntityKind::MedicalRecords),
            "psychological_evaluations" | "psychological_evaluation" => {
                Ok(EntityKind::PsychologicalEvaluations)
            }
            _ => Err(ParseCapabilityError::UnknownEntityKind(s.to_string())),
        }
    }
}

impl FromStr for FieldGroup {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| ParseCapabilityError::UnknownFieldGroup(s.to_string()))
    }
}

impl FromStr for Capability {
    type Err = ParseCapabilityError;

    /// Parses `print`, `manage_bulk_data`, `page_access(Page)`,
    /// `search(kind)` and `field_edit(group)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "print" => return Ok(Capability::Print),
            "manage_bulk_data" => return Ok(Capability::ManageBulkData),
            _ => {}
        }

        let (name, arg) = s
            .strip_suffix(')')
            .and_then(|rest| rest.split_once('('))
            .ok_or_else(|| ParseCapabilityError::Malformed(s.to_string()))?;
        let arg = arg.trim().trim_matches('"');

        match name.trim() {
            "page_access" => Ok(Capability::PageAccess(arg.parse()?)),
            "search" => Ok(Capability::Search(arg.parse()?)),
            "field_edit" => Ok(Capability::FieldEdit(arg.parse()?)),
            _ => Err(ParseCapabilityError::Malformed(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_ids_are_verbatim() {
        assert_eq!("Search_and_Print".parse::<PageId>().unwrap(), PageId::SearchAndPrint);
        assert_eq!(PageId::RecordsManagement.to_string(), "Records_Management");
        assert!("search_and_print".parse::<PageId>().is_err());
        assert!("NonexistentPage".parse::<PageId>().is_err());
    }

    #[test]
    fn test_page_serde_matches_router_ids() {
        for page in PageId::ALL {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.as_str()));
        }
    }

    #[test]
    fn test_entity_kind_accepts_singular() {
        assert_eq!("student".parse::<EntityKind>().unwrap(), EntityKind::Students);
        assert_eq!("students".parse::<EntityKind>().unwrap(), EntityKind::Students);
        assert_eq!(
            "psychological_evaluations".parse::<EntityKind>().unwrap(),
            EntityKind::PsychologicalEvaluations
        );
        assert!("staff".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!("print".parse::<Capability>().unwrap(), Capability::Print);
        assert_eq!(
            "manage_bulk_data".parse::<Capability>().unwrap(),
            Capability::ManageBulkData
        );
        assert_eq!(
            "page_access(Healthcare)".parse::<Capability>().unwrap(),
            Capability::PageAccess(PageId::Healthcare)
        );
        assert_eq!(
            "search(\"veterans\")".parse::<Capability>().unwrap(),
            Capability::Search(EntityKind::Veterans)
        );
        assert_eq!(
            "field_edit(student_medical)".parse::<Capability>().unwrap(),
            Capability::FieldEdit(FieldGroup::StudentMedical)
        );
        assert!(matches!(
            "page_access(Nowhere)".parse::<Capability>(),
            Err(ParseCapabilityError::UnknownPage(_))
        ));
        assert!(matches!(
            "delete(students)".parse::<Capability>(),
            Err(ParseCapabilityError::Malformed(_))
        ));
        assert!(matches!(
            "search students".parse::<Capability>(),
            Err(ParseCapabilityError::Malformed(_))
        ));
    }

    #[test]
    fn test_display_parses_back() {
        for capability in Capability::all() {
            assert_eq!(capability.to_string().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn test_all_capabilities_count() {
        assert_eq!(Capability::all().len(), 9 + 4 + 5 + 2);
    }
}
