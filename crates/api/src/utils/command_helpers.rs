//! Command execution helpers
//!
//! Wraps command bodies with timing and a structured outcome log line.

use std::future::Future;
use std::time::Instant;

use rostersync_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Execute a command and log how long it took and how it ended.
///
/// # Example
///
/// ```rust,ignore
/// execute_logged("roster::preview", || async {
///     ctx.service.read_roster(&image).await
/// })
/// .await
/// ```
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());

    result
}

#[cfg(test)]
mod tests {
    use rostersync_domain::RosterError;

    use super::*;

    #[tokio::test]
    async fn passes_result_through() {
        let ok = execute_logged("test::ok", || async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: DomainResult<()> =
            execute_logged("test::err", || async { Err(RosterError::Auth("expired".into())) })
                .await;
        assert_eq!(err, Err(RosterError::Auth("expired".into())));
    }
}
