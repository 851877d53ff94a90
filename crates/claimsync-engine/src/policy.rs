//! Affiliation → role policy.
//!
//! The predicate that grants the elevated `Creator` role is looked up by name
//! in [`POLICY_TABLE`]; the reconciler never sees it. `User` is always granted
//! and always last.

use claimsync_config::CreatorRule;
use claimsync_core::{Role, RoleSet};

use crate::affiliation::AffiliationTokens;

/// A named creator predicate.
#[derive(Debug, Clone, Copy)]
pub struct PolicyRule {
    pub rule: CreatorRule,
    pub description: &'static str,
    predicate: fn(&AffiliationTokens) -> bool,
}

impl PolicyRule {
    #[must_use]
    pub fn grants_creator(&self, tokens: &AffiliationTokens) -> bool {
        (self.predicate)(tokens)
    }
}

fn has(tokens: &AffiliationTokens, token: &str) -> bool {
    tokens.contains(token)
}

fn staff_or_faculty(tokens: &AffiliationTokens) -> bool {
    has(tokens, "staff") || has(tokens, "faculty")
}

fn member_employee_and_staff_or_faculty(tokens: &AffiliationTokens) -> bool {
    has(tokens, "member") && has(tokens, "employee") && staff_or_faculty(tokens)
}

fn any_affiliation(tokens: &AffiliationTokens) -> bool {
    has(tokens, "staff") || has(tokens, "employee") || has(tokens, "member")
}

/// Every selectable creator predicate.
pub const POLICY_TABLE: &[PolicyRule] = &[
    PolicyRule {
        rule: CreatorRule::StaffOrFaculty,
        description: "affiliation includes staff or faculty",
        predicate: staff_or_faculty,
    },
    PolicyRule {
        rule: CreatorRule::MemberEmployeeAndStaffOrFaculty,
        description: "affiliation includes member and employee, plus staff or faculty",
        predicate: member_employee_and_staff_or_faculty,
    },
    PolicyRule {
        rule: CreatorRule::AnyAffiliation,
        description: "affiliation includes staff, employee, or member",
        predicate: any_affiliation,
    },
];

/// Look up the table entry for `rule`.
#[must_use]
pub fn policy_rule(rule: CreatorRule) -> &'static PolicyRule {
    POLICY_TABLE
        .iter()
        .find(|entry| entry.rule == rule)
        .unwrap_or(&POLICY_TABLE[0])
}

/// Pure role derivation under one selected rule.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy {
    rule: &'static PolicyRule,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::new(CreatorRule::default())
    }
}

impl RolePolicy {
    #[must_use]
    pub fn new(rule: CreatorRule) -> Self {
        Self {
            rule: policy_rule(rule),
        }
    }

    #[must_use]
    pub const fn rule(&self) -> &'static PolicyRule {
        self.rule
    }

    /// `{Creator, User}` when an institution is known and the rule is
    /// satisfied, `{User}` otherwise.
    #[must_use]
    pub fn derive_roles(&self, tokens: &AffiliationTokens, has_institution: bool) -> RoleSet {
        let mut roles = RoleSet::new();
        if has_institution && self.rule.grants_creator(tokens) {
            roles.insert(Role::creator());
        }
        roles.insert(Role::user());
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affiliation::parse_affiliation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn csv(rule: CreatorRule, raw: &str, has_institution: bool) -> String {
        RolePolicy::new(rule)
            .derive_roles(&parse_affiliation(Some(raw)), has_institution)
            .to_csv()
    }

    #[test]
    fn every_rule_has_a_table_entry() {
        for rule in [
            CreatorRule::StaffOrFaculty,
            CreatorRule::MemberEmployeeAndStaffOrFaculty,
            CreatorRule::AnyAffiliation,
        ] {
            assert_eq!(policy_rule(rule).rule, rule);
        }
    }

    #[rstest]
    #[case(CreatorRule::StaffOrFaculty)]
    #[case(CreatorRule::MemberEmployeeAndStaffOrFaculty)]
    #[case(CreatorRule::AnyAffiliation)]
    fn no_institution_means_user_only(#[case] rule: CreatorRule) {
        assert_eq!(csv(rule, "[member, employee, staff, faculty]", false), "User");
        assert_eq!(csv(rule, "[]", false), "User");
    }

    #[rstest]
    #[case(CreatorRule::StaffOrFaculty, "[member, employee, staff]", "Creator,User")]
    #[case(CreatorRule::StaffOrFaculty, "[faculty]", "Creator,User")]
    #[case(CreatorRule::StaffOrFaculty, "[member, employee]", "User")]
    #[case(CreatorRule::StaffOrFaculty, "[staffmember]", "User")]
    #[case(CreatorRule::MemberEmployeeAndStaffOrFaculty, "[member, employee, staff]", "Creator,User")]
    #[case(CreatorRule::MemberEmployeeAndStaffOrFaculty, "[employee, staff]", "User")]
    #[case(CreatorRule::AnyAffiliation, "[member]", "Creator,User")]
    #[case(CreatorRule::AnyAffiliation, "[student, alum]", "User")]
    fn derives_roles_with_institution(
        #[case] rule: CreatorRule,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(csv(rule, raw, true), expected);
    }

    #[test]
    fn empty_affiliation_with_institution_is_user_only() {
        assert_eq!(csv(CreatorRule::default(), "[]", true), "User");
    }
}
