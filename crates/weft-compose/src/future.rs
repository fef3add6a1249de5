//! Future handle to a component's state.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::error;

/// Handle to a component's state, resolved exactly once.
///
/// The future is pending until the component's task finishes. Awaiting it
/// is the only way to read the state, so a read before resolution
/// cooperatively suspends the reader; a partial value is unrepresentable.
///
/// The component's task always sends a state (errors are absorbed inside
/// the component closures), so under normal operation the future resolves
/// with whatever the component produced. If the producing task is lost
/// anyway, the future resolves with `T::default()` and logs an error
/// rather than failing the request.
pub struct ComponentFuture<T> {
    component: String,
    rx: oneshot::Receiver<T>,
}

impl<T> ComponentFuture<T> {
    pub(crate) fn new(component: impl Into<String>, rx: oneshot::Receiver<T>) -> Self {
        Self {
            component: component.into(),
            rx,
        }
    }

    /// Name of the component this future belongs to.
    pub fn component(&self) -> &str {
        &self.component
    }
}

impl<T: Default> Future for ComponentFuture<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(state)) => Poll::Ready(state),
            Poll::Ready(Err(_)) => {
                error!(
                    component = %this.component,
                    "component task dropped before resolving; substituting empty state"
                );
                Poll::Ready(T::default())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_with_sent_state() {
        let (tx, rx) = oneshot::channel();
        let future = ComponentFuture::new("block", rx);

        tx.send("state".to_string()).unwrap();
        assert_eq!(future.await, "state");
    }

    #[tokio::test]
    async fn test_resolves_empty_when_sender_lost() {
        let (tx, rx) = oneshot::channel::<String>();
        let future = ComponentFuture::<String>::new("block", rx);

        drop(tx);
        assert_eq!(future.await, String::new());
    }

    #[tokio::test]
    async fn test_pending_until_sent() {
        let (tx, rx) = oneshot::channel();
        let future = ComponentFuture::new("block", rx);

        let reader = tokio::spawn(future);
        tokio::task::yield_now().await;
        assert!(!reader.is_finished());

        tx.send(42u32).unwrap();
        assert_eq!(reader.await.unwrap(), 42);
    }
}
