use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rotor_core::{
    HostRequest, VIRTUAL_ITEM_COUNT, Wheel, WheelError, virtual_base,
};
use rotor_model::{DataSet, Selection, VirtualIndex, WheelConfig, WindowSize};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn minutes() -> DataSet<u32> {
    DataSet::new((0..60).collect()).expect("data")
}

#[test]
fn even_wheel_size_is_rejected_without_side_effects() {
    let letters = DataSet::new(vec!['a', 'b', 'c']).expect("data");
    let mut wheel = Wheel::new(WheelConfig::default()).with_data(letters);
    wheel.set_item_extent(30.0).expect("extent");
    wheel
        .on_scrolled(Instant::now(), 0.0, VirtualIndex(1))
        .expect("scroll");
    wheel.drain_requests();
    let config = wheel.config();
    let current = wheel.current_index();

    let err = wheel.set_wheel_size(4).expect_err("even");
    assert!(matches!(err, WheelError::InvalidConfig(_)));
    assert_eq!(wheel.config(), config);
    assert_eq!(wheel.current_index(), current);
    assert_eq!(wheel.host_item_count(), 5);
    assert!(wheel.drain_requests().is_empty());

    wheel.set_wheel_size(5).expect("odd");
    assert_eq!(wheel.config().window_size, WindowSize::new(5).expect("odd"));
    assert_eq!(wheel.host_item_count(), 7);
}

#[test]
fn rapid_scrolls_emit_one_settled_event() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut wheel = Wheel::new(WheelConfig::default().looping(true))
        .with_data(minutes());
    wheel.set_item_extent(48.0).expect("extent");
    let sink = Rc::clone(&events);
    wheel.on_selection_settled(move |s| sink.borrow_mut().push(s));

    let base = virtual_base(60).expect("base");
    let t0 = Instant::now();
    for step in 0..20i64 {
        let at = t0 + ms(step as u64 * 10);
        wheel.on_scrolled(at, -4.0, base.offset(step)).expect("scroll");
        wheel.tick(at).expect("tick");
    }
    // last observation: top row base+19, center base+20
    wheel.tick(t0 + ms(190 + 300)).expect("tick");
    wheel.tick(t0 + ms(5_000)).expect("tick");
    assert_eq!(*events.borrow(), vec![Selection::new(20, 20)]);
}

#[test]
fn looping_wheel_wraps_past_the_last_item() {
    let mut wheel = Wheel::new(WheelConfig::default().looping(true))
        .with_data(minutes());
    wheel.set_item_extent(48.0).expect("extent");
    assert_eq!(wheel.host_item_count(), VIRTUAL_ITEM_COUNT);

    let base = virtual_base(60).expect("base");
    wheel.scroll_to(59).expect("scroll");
    let jump = wheel.drain_requests().pop();
    assert_eq!(jump, Some(HostRequest::JumpTo(base.offset(58))));

    let t0 = Instant::now();
    wheel.on_scrolled(t0, 0.0, base.offset(59)).expect("scroll");
    assert_eq!(wheel.current_index(), Some(0));
    wheel.on_scrolled(t0, 0.0, base.offset(-2)).expect("scroll");
    assert_eq!(wheel.current_index(), Some(59));
}

#[test]
fn resting_offsets_snap_toward_nearest_row() {
    let mut wheel = Wheel::new(WheelConfig::default()).with_data(minutes());
    let t0 = Instant::now();
    // no extent yet: nothing to snap against
    assert_eq!(
        wheel
            .on_scroll_stopped(t0, -30.0, VirtualIndex(3))
            .expect("stop"),
        None
    );
    wheel.set_item_extent(48.0).expect("extent");
    wheel.drain_requests();

    // 8px left to the next boundary
    let snap = wheel
        .on_scroll_stopped(t0, -40.0, VirtualIndex(3))
        .expect("stop")
        .expect("snap");
    assert_eq!(snap.distance, 2.0);
    assert_eq!(wheel.current_index(), Some(4));
    let requests = wheel.drain_requests();
    assert!(matches!(
        requests.last(),
        Some(HostRequest::SmoothScrollBy(s)) if s.distance == 2.0
    ));
}
