// ABOUTME: Collapses facade results into the legacy safe defaults
// ABOUTME: Logs the failure and yields [] / None / false for callers that cannot handle errors

use tracing::error;

use crate::error::{ServiceError, ServiceResult};

/// Log a facade failure with its context
pub fn log_failure(context: &str, err: &ServiceError) {
    error!("{}: {}", context, err.diagnostic());
}

/// Opt-in conversion of a [`ServiceResult`] into a sentinel value.
///
/// `or_sentinel` yields `Vec::new()` for lists and `None` for single
/// records; `succeeded` turns any result into a boolean (used for deletes).
pub trait OrSentinel<T> {
    fn or_sentinel(self, context: &str) -> T
    where
        T: Default;

    fn succeeded(self, context: &str) -> bool;
}

impl<T> OrSentinel<T> for ServiceResult<T> {
    fn or_sentinel(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                log_failure(context, &err);
                T::default()
            }
        }
    }

    fn succeeded(self, context: &str) -> bool {
        match self {
            Ok(_) => true,
            Err(err) => {
                log_failure(context, &err);
                false
            }
        }
    }
}

/// Collapse a create/update result (`R`) into `Option<R>`
pub fn or_none<T>(result: ServiceResult<T>, context: &str) -> Option<T> {
    result.map(Some).or_sentinel(context)
}
