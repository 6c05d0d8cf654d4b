// # Abort Trait
//
// Out-of-band delegation of unrecoverable coordination failures.
//
// When the session's watch is lost for good (session expiry beyond
// recovery, connection loss the session cannot repair), the tracker has no
// recovery policy of its own: it wakes its waiters with a cancellation and
// hands the failure to the abort handler its owner supplied at
// construction. What happens next — terminate the process, re-bootstrap,
// alert — is entirely the owner's decision.

use crate::error::Error;

/// Receiver for unrecoverable coordination-service failures
pub trait Abort: Send + Sync {
    /// Handle an unrecoverable failure
    ///
    /// Called at most once per tracker lifetime, from the tracker's pump
    /// task. Implementations must not block.
    fn abort(&self, why: &str, cause: Error);
}

/// Abort handler that only logs the failure
///
/// Suitable for demos and tests. Real cluster members should supply a
/// handler that terminates or re-bootstraps the member.
#[derive(Debug, Default, Clone)]
pub struct LogAbort;

impl Abort for LogAbort {
    fn abort(&self, why: &str, cause: Error) {
        tracing::error!(%why, %cause, "unrecoverable coordination failure");
    }
}
