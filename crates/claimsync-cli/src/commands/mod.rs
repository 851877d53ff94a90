use std::io::Read;

use anyhow::Context;

use crate::cli::{Commands, GlobalFlags};

pub mod enrich;
pub mod notify;
pub mod roles;
pub mod schema;

/// Route a parsed command to its handler and return the process exit code.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<i32> {
    match command {
        Commands::Enrich(args) => enrich::handle(&args, flags).await,
        Commands::Notify(args) => notify::handle(&args, flags).await.map(|()| 0),
        Commands::Roles(args) => roles::handle(&args, flags).map(|()| 0),
        Commands::Schema => schema::handle(flags).map(|()| 0),
    }
}

/// Read a JSON document from `source`, or from stdin when it is `-`.
fn read_document(source: &str, what: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| format!("failed to read {what} from stdin"))?;
        return Ok(buffer);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read {what} file {source}"))
}
