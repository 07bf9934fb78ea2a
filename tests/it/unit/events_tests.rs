//! Unit tests for the event channel surface.

use dragboard::{DragError, EventChannel};

use crate::helpers::record;

#[test]
fn test_recorder_sees_every_emission_in_order() {
    let mut channel: EventChannel<u32> = EventChannel::new();
    let log = record(&mut channel);

    channel.emit(&1);
    channel.emit(&2);
    channel.emit(&3);
    assert_eq!(*log.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_subscriber_count_tracks_subscribe_and_unsubscribe() {
    let mut channel: EventChannel<()> = EventChannel::new();
    assert_eq!(channel.subscriber_count(), 0);

    let a = channel.subscribe(|_| {}).unwrap();
    let b = channel.subscribe(|_| {}).unwrap();
    assert_eq!(channel.subscriber_count(), 2);

    channel.unsubscribe(a);
    assert_eq!(channel.subscriber_count(), 1);
    // Unknown handles are ignored.
    channel.unsubscribe(a);
    assert_eq!(channel.subscriber_count(), 1);
    channel.unsubscribe(b);
    assert_eq!(channel.subscriber_count(), 0);
}

#[test]
fn test_close_drops_subscribers_and_rejects_new_ones() {
    let mut channel: EventChannel<u32> = EventChannel::new();
    let log = record(&mut channel);
    channel.emit(&1);

    channel.close();
    assert!(channel.is_closed());
    assert_eq!(channel.subscriber_count(), 0);
    channel.emit(&2);
    assert_eq!(*log.borrow(), vec![1], "no delivery after close");

    assert_eq!(
        channel.subscribe(|_| {}).unwrap_err(),
        DragError::ChannelClosed
    );
}

#[test]
fn test_subscriber_added_mid_stream_misses_earlier_events() {
    let mut channel: EventChannel<u32> = EventChannel::new();
    channel.emit(&1);
    let log = record(&mut channel);
    channel.emit(&2);
    assert_eq!(*log.borrow(), vec![2]);
}
