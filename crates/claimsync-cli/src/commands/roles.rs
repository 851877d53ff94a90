use claimsync_config::CreatorRule;
use claimsync_engine::affiliation::parse_affiliation;
use claimsync_engine::{AffiliationTokens, RolePolicy};
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::RolesArgs;
use crate::output::output;

/// What one policy derives from one affiliation claim.
#[derive(Debug, Serialize)]
struct RolesPreview {
    rule: &'static str,
    description: &'static str,
    tokens: AffiliationTokens,
    institution: bool,
    roles: Vec<String>,
    access_rights: String,
}

/// Handle `csync roles`.
///
/// Without `--rule` the configured creator rule applies.
pub fn handle(args: &RolesArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rule = match args.rule {
        Some(rule) => rule,
        None => bootstrap::load_config()?.policy.creator_rule,
    };
    output(&preview(args, rule), flags.format)
}

fn preview(args: &RolesArgs, rule: CreatorRule) -> RolesPreview {
    let policy = RolePolicy::new(rule);
    let tokens = parse_affiliation(Some(&args.affiliation));
    let roles = policy.derive_roles(&tokens, args.institution);

    RolesPreview {
        rule: policy.rule().rule.as_str(),
        description: policy.rule().description,
        tokens,
        institution: args.institution,
        roles: roles.iter().map(|role| role.as_str().to_string()).collect(),
        access_rights: roles.to_csv(),
    }
}

#[cfg(test)]
mod tests {
    use claimsync_config::CreatorRule;
    use pretty_assertions::assert_eq;

    use super::preview;
    use crate::cli::root_commands::RolesArgs;

    fn args(affiliation: &str, institution: bool) -> RolesArgs {
        RolesArgs {
            affiliation: affiliation.to_string(),
            institution,
            rule: None,
        }
    }

    #[test]
    fn staff_at_institution_is_creator() {
        let preview = preview(&args("[Member, STAFF]", true), CreatorRule::StaffOrFaculty);
        assert_eq!(preview.rule, "staff_or_faculty");
        assert_eq!(
            preview.tokens.iter().cloned().collect::<Vec<_>>(),
            vec!["member".to_string(), "staff".to_string()]
        );
        assert!(preview.roles.contains(&"Creator".to_string()));
        assert!(preview.roles.contains(&"User".to_string()));
    }

    #[test]
    fn unknown_institution_is_user_only() {
        let preview = preview(&args("[staff]", false), CreatorRule::StaffOrFaculty);
        assert_eq!(preview.roles, vec!["User".to_string()]);
        assert_eq!(preview.access_rights, "User");
    }

    #[test]
    fn rule_changes_outcome() {
        let strict = preview(&args("[member]", true), CreatorRule::StaffOrFaculty);
        let loose = preview(&args("[member]", true), CreatorRule::AnyAffiliation);
        assert_eq!(strict.roles, vec!["User".to_string()]);
        assert!(loose.roles.contains(&"Creator".to_string()));
    }
}
