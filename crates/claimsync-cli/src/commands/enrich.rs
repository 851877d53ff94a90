use anyhow::Context;
use claimsync_engine::TriggerEvent;
use tracing::warn;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::EnrichArgs;
use crate::commands::notify::PendingNotice;
use crate::output::output;

/// Handle `csync enrich`.
///
/// Prints the rendered event on success. A requested retry still prints it,
/// but exits with `EXIT_RETRY_REQUESTED` so the caller re-invokes once.
/// When only the new-user notice failed, the notice is printed instead so it
/// can be replayed with `csync notify`.
pub async fn handle(args: &EnrichArgs, flags: &GlobalFlags) -> anyhow::Result<i32> {
    let event = read_event(&args.event)?;
    let config = bootstrap::load_config()?;
    let orchestrator = bootstrap::build_orchestrator(&config)?;

    let outcome = match orchestrator.enrich(&event).await {
        Ok(outcome) => outcome,
        Err(error) => {
            if let Some(notice) = error.pending_notice() {
                output(&PendingNotice::from(notice), flags.format)?;
            }
            return Err(anyhow::Error::new(error).context("enrichment failed"));
        }
    };
    let rendered = outcome
        .output()
        .apply_to(&event)
        .context("failed to render enriched event")?;
    output(&rendered, flags.format)?;

    if outcome.is_retry_requested() {
        warn!(user = %event.user_name, "attributes not yet echoed, retry requested");
        return Ok(crate::EXIT_RETRY_REQUESTED);
    }
    Ok(0)
}

fn read_event(source: &str) -> anyhow::Result<TriggerEvent> {
    let json = super::read_document(source, "event")?;
    TriggerEvent::from_json(&json).context("input is not a trigger event document")
}
