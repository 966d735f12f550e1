use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::ApiError;

/// Spawns one task per future. The handles come back in input order.
pub fn spawn_all<I, F, T>(futures: I) -> Vec<JoinHandle<Result<T, ApiError>>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
{
    futures.into_iter().map(tokio::spawn).collect()
}

/// Awaits every handle in order and collects the results positionally.
///
/// The first failure wins and is returned as-is; a task that panicked or was
/// cancelled becomes [`ApiError::Aggregation`]. Tasks still running when an
/// earlier one fails are left to finish on their own.
pub async fn join_in_order<T>(handles: Vec<JoinHandle<Result<T, ApiError>>>) -> Result<Vec<T>, ApiError> {
    let total = handles.len();
    let mut results = Vec::with_capacity(total);

    for (idx, handle) in handles.into_iter().enumerate() {
        let result = handle.await.map_err(|e| {
            ApiError::Aggregation(format!("fan-out task {}/{} failed: {e}", idx + 1, total))
        })?;
        results.push(result?);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn results_keep_input_order() {
        // later tasks finish first
        let handles = spawn_all((0..5u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(50 - i * 10)).await;
            Ok::<_, ApiError>(i)
        }));

        let results = join_in_order(handles).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn any_failure_fails_the_join() {
        let handles = spawn_all((0..3u32).map(|i| async move {
            if i == 1 {
                Err(ApiError::validation("boom"))
            } else {
                Ok(i)
            }
        }));

        let err = join_in_order(handles).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "boom"));
    }

    #[tokio::test]
    async fn panicking_task_is_an_aggregation_error() {
        let handles = vec![tokio::spawn(async {
            let missing: Option<u32> = None;
            Ok::<u32, ApiError>(missing.expect("task exploded"))
        })];

        let err = join_in_order(handles).await.unwrap_err();
        assert!(matches!(err, ApiError::Aggregation(_)));
    }
}
