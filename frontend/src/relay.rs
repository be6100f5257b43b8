//! Event streaming from browser callbacks into async consumers.
//!
//! A [`Relay`] is the sending half of an unbounded channel. The mutation
//! observer callback holds the relay; a single task owns the
//! receiving stream and processes events in order.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sender side of an event stream.
///
/// Relays follow the `{source}_{event}_relay` naming pattern, e.g.
/// `page_mutated_relay`.
#[derive(Debug)]
pub struct Relay<T> {
    sender: UnboundedSender<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The receiving stream has been dropped.
    ChannelClosed,
}

impl<T> Relay<T> {
    /// Queue an event for the consumer. Fails once the stream is gone, which
    /// tells the producer to stop listening.
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }
}

/// Create a relay together with the stream it feeds.
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>) {
    let (sender, receiver) = unbounded();
    (Relay { sender }, receiver)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn delivers_events_in_order() {
        let (numbers_relay, stream) = relay::<u32>();
        for number in [1, 2, 3] {
            numbers_relay.try_send(number).unwrap();
        }
        drop(numbers_relay);

        let received: Vec<u32> = stream.collect().await;
        assert_eq!(received, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_reports_closed() {
        let (numbers_relay, stream) = relay::<u32>();
        drop(stream);

        assert_eq!(numbers_relay.try_send(7), Err(RelayError::ChannelClosed));
    }

    #[tokio::test]
    async fn dropping_the_relay_ends_the_stream() {
        let (numbers_relay, mut stream) = relay::<u32>();
        numbers_relay.try_send(5).unwrap();
        drop(numbers_relay);

        assert_eq!(stream.next().await, Some(5));
        assert_eq!(stream.next().await, None);
    }
}
