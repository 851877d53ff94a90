use claimsync_engine::event_schema;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `csync schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&event_schema(), flags.format)
}
