use iced::futures::{
    Stream,
    task::{Context, Poll},
};
use pin_project_lite::pin_project;
use std::{pin::Pin, time::Duration};
use tokio::time::{self, Sleep};

pin_project! {
    /// Emits at most one item per `duration`, keeping only the most recent
    /// item produced by the inner stream while throttled.
    pub struct Throttle<S: Stream> {
        #[pin]
        inner: S,
        duration: Duration,
        sleep: Option<Pin<Box<Sleep>>>,
        pending: Option<S::Item>,
        done: bool,
    }
}

impl<S: Stream> Throttle<S> {
    pub fn new(inner: S, duration: Duration) -> Self {
        Self {
            inner,
            duration,
            sleep: None,
            pending: None,
            done: false,
        }
    }
}

impl<S> Stream for Throttle<S>
where
    S: Stream,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Drain everything that is ready, older snapshots are superseded
        while !*this.done {
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.pending = Some(item),
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => break,
            }
        }

        if let Some(sleep) = this.sleep.as_mut() {
            if sleep.as_mut().poll(cx).is_pending() {
                return Poll::Pending;
            }
            *this.sleep = None;
        }

        match this.pending.take() {
            Some(item) => {
                *this.sleep = Some(Box::pin(time::sleep(*this.duration)));
                Poll::Ready(Some(item))
            }
            None if *this.done => Poll::Ready(None),
            None => Poll::Pending,
        }
    }
}

pub trait ThrottleExt: Stream + Sized {
    fn throttle(self, duration: Duration) -> Throttle<Self> {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::futures::{StreamExt, stream};

    #[tokio::test(start_paused = true)]
    async fn keeps_only_latest_ready_item() {
        let items: Vec<u32> = stream::iter(1..=5)
            .throttle(Duration::from_millis(50))
            .collect()
            .await;

        assert_eq!(items, vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_items_all_pass() {
        let source = stream::iter([1u32, 2, 3]).then(|i| async move {
            time::sleep(Duration::from_millis(100)).await;
            i
        });

        let items: Vec<u32> = source
            .throttle(Duration::from_millis(50))
            .collect()
            .await;

        assert_eq!(items, vec![1, 2, 3]);
    }
}
