use anyhow::Context;
use claimsync_core::UserCreatedNotice;
use serde::{Deserialize, Serialize};

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::NotifyArgs;
use crate::output::output;

/// A created user whose notice still has to be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingNotice {
    pub pending_notice: UserCreatedNotice,
}

impl From<&UserCreatedNotice> for PendingNotice {
    fn from(notice: &UserCreatedNotice) -> Self {
        Self {
            pending_notice: notice.clone(),
        }
    }
}

/// Accepts what `csync enrich` prints as well as a bare notice.
#[derive(Deserialize)]
#[serde(untagged)]
enum NoticeDocument {
    Pending(PendingNotice),
    Bare(UserCreatedNotice),
}

/// Handle `csync notify`.
///
/// On failure the notice is printed again so it is not lost.
pub async fn handle(args: &NotifyArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let notice = read_notice(&args.notice)?;
    let config = bootstrap::load_config()?;
    let orchestrator = bootstrap::build_orchestrator(&config)?;

    if let Err(error) = orchestrator.deliver_notice(notice).await {
        if let Some(notice) = error.pending_notice() {
            output(&PendingNotice::from(notice), flags.format)?;
        }
        return Err(anyhow::Error::new(error).context("notice replay failed"));
    }
    tracing::info!("new-user notice delivered");
    Ok(())
}

fn read_notice(source: &str) -> anyhow::Result<UserCreatedNotice> {
    let json = super::read_document(source, "notice")?;
    let document: NoticeDocument =
        serde_json::from_str(&json).context("input is not a new-user notice")?;
    Ok(match document {
        NoticeDocument::Pending(pending) => pending.pending_notice,
        NoticeDocument::Bare(notice) => notice,
    })
}
