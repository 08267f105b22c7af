use std::fmt;

use crate::policy::{Decision, Operation};
use crate::request::RequestMeta;

/// Request-scoped logger.
///
/// Every message carries the request id and the caller's uid so store
/// activity for one request can be correlated. Only uids and paths are
/// logged, never document fields.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLog<'a> {
    request_id: &'a str,
    principal: Option<&'a str>,
}

impl<'a> RequestLog<'a> {
    pub(crate) fn new(meta: &'a RequestMeta) -> Self {
        Self {
            request_id: &meta.request_id,
            principal: meta.authenticated_principal().map(|p| p.id.as_str()),
        }
    }

    /// Logs the outcome of a rules check.
    pub(crate) fn decision(
        &self,
        operation: Operation,
        path: &dyn fmt::Display,
        decision: Decision,
    ) {
        match decision {
            Decision::Permitted => tracing::debug!(
                request_id = %self.request_id,
                principal = ?self.principal,
                %operation,
                %path,
                "access permitted"
            ),
            Decision::Denied(reason) => tracing::info!(
                request_id = %self.request_id,
                principal = ?self.principal,
                %operation,
                %path,
                %reason,
                "access denied"
            ),
        }
    }

    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, principal = ?self.principal, "{}", args);
    }

    pub(crate) fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, principal = ?self.principal, "{}", args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DenyReason;

    #[test]
    fn request_log_carries_ids() {
        let meta = RequestMeta::authenticated("req-9", "alice");
        let log = RequestLog::new(&meta);
        assert_eq!(log.request_id, "req-9");
        assert_eq!(log.principal, Some("alice"));
    }

    #[test]
    fn request_log_without_subscriber_does_not_panic() {
        let meta = RequestMeta::unauthenticated("req-anon");
        let log = RequestLog::new(&meta);
        assert_eq!(log.principal, None);

        log.decision(
            Operation::Read,
            &"Bills/testBill",
            Decision::Denied(DenyReason::Unauthenticated),
        );
        log.debug(format_args!("lookup {}", "Bills/testBill"));
        log.warn(format_args!("rejected"));
    }
}
