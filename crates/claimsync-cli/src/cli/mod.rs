use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `csync` binary.
#[derive(Debug, Parser)]
#[command(
    name = "csync",
    version,
    about = "claimsync - federated identity claims reconciliation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use claimsync_config::CreatorRule;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["csync", "--format", "raw", "--verbose", "schema"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["csync", "enrich", "--event", "e.json", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        let Commands::Enrich(args) = cli.command else {
            panic!("expected enrich command");
        };
        assert_eq!(args.event, "e.json");
    }

    #[test]
    fn enrich_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["csync", "enrich"]).expect("cli should parse");
        let Commands::Enrich(args) = cli.command else {
            panic!("expected enrich command");
        };
        assert_eq!(args.event, "-");
    }

    #[test]
    fn notify_takes_notice_path() {
        let cli = Cli::try_parse_from(["csync", "notify", "--notice", "pending.json"])
            .expect("cli should parse");
        let Commands::Notify(args) = cli.command else {
            panic!("expected notify command");
        };
        assert_eq!(args.notice, "pending.json");
    }

    #[test]
    fn roles_accepts_known_rule() {
        let cli = Cli::try_parse_from([
            "csync",
            "roles",
            "--affiliation",
            "[member, employee]",
            "--institution",
            "--rule",
            "any_affiliation",
        ])
        .expect("cli should parse");

        let Commands::Roles(args) = cli.command else {
            panic!("expected roles command");
        };
        assert!(args.institution);
        assert_eq!(args.rule, Some(CreatorRule::AnyAffiliation));
    }

    #[test]
    fn roles_rejects_unknown_rule() {
        let parsed = Cli::try_parse_from([
            "csync",
            "roles",
            "--affiliation",
            "[staff]",
            "--rule",
            "everyone",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["csync", "--format", "table", "schema"]);
        assert!(parsed.is_err());
    }
}
