use tracing::warn;

use crate::error::DispatchError;

/// Receives handler failures isolated during dispatch.
pub trait DispatchErrorSink {
    fn report(&mut self, error: &DispatchError);
}

impl<F> DispatchErrorSink for F
where
    F: FnMut(&DispatchError),
{
    fn report(&mut self, error: &DispatchError) {
        self(error);
    }
}

/// Default sink: logs each failure and carries on.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl DispatchErrorSink for TracingErrorSink {
    fn report(&mut self, error: &DispatchError) {
        warn!(
            handler = %error.handler_id,
            event = error.event,
            reason = %error.reason,
            "interaction handler failed; continuing dispatch"
        );
    }
}
