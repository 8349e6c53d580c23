use super::Action;
use crate::probe::ProbeResult;
use std::io;

/// Execute the action's business logic by delegating to the probe
pub async fn execute(action: Action) -> ProbeResult {
    match action {
        Action::Single {
            descriptor,
            settings,
        } => settings.probe(io::stdout()).probe_single(&descriptor).await,
        Action::FirstSuccess {
            candidates,
            settings,
        } => {
            settings
                .probe(io::stdout())
                .probe_first_success(&candidates)
                .await
                .result
        }
    }
}
