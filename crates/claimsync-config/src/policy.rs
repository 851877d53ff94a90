//! Role policy selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named predicate deciding when the elevated `Creator` role is granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatorRule {
    /// `staff` or `faculty`.
    #[default]
    StaffOrFaculty,
    /// `member` and `employee`, plus `staff` or `faculty`.
    MemberEmployeeAndStaffOrFaculty,
    /// Any of `staff`, `employee`, `member`.
    AnyAffiliation,
}

impl CreatorRule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaffOrFaculty => "staff_or_faculty",
            Self::MemberEmployeeAndStaffOrFaculty => "member_employee_and_staff_or_faculty",
            Self::AnyAffiliation => "any_affiliation",
        }
    }
}

impl fmt::Display for CreatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub creator_rule: CreatorRule,
}
