// Parallel fan-out: N independent attempts, keep whatever succeeded
use crate::error::GenerationError;
use futures::future::join_all;
use std::future::Future;
use tracing::{error, info};

/// Start `attempts` futures concurrently and wait for all of them to settle.
///
/// Failed attempts are logged and dropped; the successful values come back in
/// attempt order. Never fails as a whole, an all-failed batch is an empty `Vec`.
pub async fn fan_out<T, F, Fut>(label: &str, attempts: usize, mut make_attempt: F) -> Vec<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, GenerationError>>,
{
    let pending: Vec<_> = (0..attempts).map(|i| make_attempt(i)).collect();
    let settled = join_all(pending).await;

    let mut successes = Vec::with_capacity(attempts);
    for (i, outcome) in settled.into_iter().enumerate() {
        match outcome {
            Ok(value) => successes.push(value),
            Err(e) => error!(operation = label, attempt = i + 1, "Generation failed for one variation: {}", e),
        }
    }

    info!(operation = label, succeeded = successes.len(), attempted = attempts, "Fan-out settled");
    successes
}
