use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::sync::oneshot;

use crate::TweenError;

/// Resolves when a tween run completes.
///
/// Resolves to [`TweenError::Cancelled`] if the run is stopped, destroyed, or replaced by another
/// start before it completes.
#[derive(Debug)]
pub struct Completion {
    receiver: oneshot::Receiver<()>,
}

impl Completion {
    /// A completion and the callback that resolves it.
    pub(crate) fn new() -> (Self, impl FnOnce() + Send + 'static) {
        let (sender, receiver) = oneshot::channel();
        let resolve = move || {
            // The receiver may already be gone, nobody is interested then.
            let _ = sender.send(());
        };
        (Self { receiver }, resolve)
    }
}

impl Future for Completion {
    type Output = Result<(), TweenError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.map_err(|_| TweenError::Cancelled))
    }
}
