use std::future::Future;

use tokio::sync::watch;
use tracing::info;

use crate::bail;
use crate::error::{ErrorKind, ResolverResult};

/// Handle used by the host to abort in-flight resolutions.
#[derive(Debug, Clone)]
pub struct CancelTx(watch::Sender<()>);

impl CancelTx {
    pub fn wrap(tx: watch::Sender<()>) -> Self {
        Self(tx)
    }

    /// Cancels every resolution holding a receiver of this channel.
    pub fn cancel(&self) -> Result<(), watch::error::SendError<()>> {
        self.0.send(())
    }

    pub fn subscribe(&self) -> CancelRx {
        self.0.subscribe()
    }
}

/// Receiver side of the cancellation signal, passed into every resolution.
///
/// Dropping every [`CancelTx`] never cancels.
pub type CancelRx = watch::Receiver<()>;

pub fn create_cancel_channel() -> (CancelTx, CancelRx) {
    let (tx, rx) = watch::channel(());
    (CancelTx::wrap(tx), rx)
}

/// Returns a receiver which is never canceled, for callers without a cancellation source.
pub fn never_cancel() -> CancelRx {
    let (tx, rx) = watch::channel(());
    // The receiver observes the closed channel and `wait_for_cancel` then pends forever.
    drop(tx);
    rx
}

/// Drives `future` to completion unless the cancellation signal fires first.
///
/// On cancellation the future is dropped, which aborts the underlying HTTP or cluster request,
/// and an [`ErrorKind::OperationCanceled`] error naming `operation` is returned. Work the remote
/// side already committed is not undone.
pub async fn run_cancellable<F, T>(
    cancel_rx: &CancelRx,
    operation: &'static str,
    future: F,
) -> ResolverResult<T>
where
    F: Future<Output = ResolverResult<T>>,
{
    let mut cancel_rx = cancel_rx.clone();

    tokio::select! {
        biased;

        _ = wait_for_cancel(&mut cancel_rx) => {
            info!(operation, "operation canceled while in flight");

            bail!(
                ErrorKind::OperationCanceled,
                "Resolution was canceled",
                operation
            );
        }

        result = future => result,
    }
}

async fn wait_for_cancel(cancel_rx: &mut CancelRx) {
    if cancel_rx.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}
