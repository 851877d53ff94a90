use clap::{Args, Subcommand};
use claimsync_config::CreatorRule;
use claimsync_engine::policy::POLICY_TABLE;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Enrich one trigger event and print the rendered event.
    Enrich(EnrichArgs),
    /// Replay a new-user notice that `enrich` could not deliver.
    Notify(NotifyArgs),
    /// Preview the roles derived from an affiliation claim.
    Roles(RolesArgs),
    /// Print the JSON schema of the inbound trigger event.
    Schema,
}

#[derive(Clone, Debug, Args)]
pub struct EnrichArgs {
    /// Event document path, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub event: String,
}

#[derive(Clone, Debug, Args)]
pub struct NotifyArgs {
    /// Notice document path, or `-` for stdin.
    #[arg(short, long, default_value = "-")]
    pub notice: String,
}

#[derive(Clone, Debug, Args)]
pub struct RolesArgs {
    /// Raw affiliation claim, e.g. "[member, employee, staff]".
    #[arg(short, long)]
    pub affiliation: String,

    /// Assume the organization resolved to a known institution.
    #[arg(long)]
    pub institution: bool,

    /// Creator rule to use instead of the configured one.
    #[arg(long, value_parser = parse_creator_rule)]
    pub rule: Option<CreatorRule>,
}

fn parse_creator_rule(raw: &str) -> Result<CreatorRule, String> {
    POLICY_TABLE
        .iter()
        .find(|entry| entry.rule.as_str() == raw)
        .map(|entry| entry.rule)
        .ok_or_else(|| {
            let known = POLICY_TABLE
                .iter()
                .map(|entry| entry.rule.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("unknown creator rule '{raw}' (expected one of: {known})")
        })
}
