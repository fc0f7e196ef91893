#![cfg(feature = "runtime")]

use std::time::Duration;

use rotor_core::{
    DriverOutput, HostEvent, HostRequest, JoinTable, Wheel, WheelDriver,
    WheelError, WheelId, WheelRegistry,
};
use rotor_model::{DataSet, Selection, VirtualIndex, WheelConfig};
use tokio::sync::mpsc::UnboundedReceiver;

fn strings(items: impl IntoIterator<Item = impl ToString>) -> DataSet<String> {
    DataSet::new(items.into_iter().map(|s| s.to_string()).collect())
        .expect("non-empty")
}

fn drain(rx: &mut UnboundedReceiver<DriverOutput<String>>) -> Vec<DriverOutput<String>> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}

fn settled(outputs: &[DriverOutput<String>]) -> Vec<(WheelId, Selection<String>)> {
    outputs
        .iter()
        .filter_map(|o| match o {
            DriverOutput::Settled(s) => Some((s.wheel, s.selection.clone())),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn commits_fire_on_the_debounce_deadline() {
    let mut registry = WheelRegistry::new();
    let wheel = registry.insert(
        Wheel::new(WheelConfig::default()).with_data(strings(0..60)),
    );
    let (driver, events, mut outputs) = WheelDriver::channel(registry);

    let script = async move {
        events
            .send(HostEvent::ItemExtent { wheel, px: 40.0 })
            .expect("send");
        for first in 0..4 {
            events
                .send(HostEvent::Scrolled {
                    wheel,
                    offset: 0.0,
                    first_visible: VirtualIndex(first),
                })
                .expect("send");
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
        let early = drain(&mut outputs);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let late = drain(&mut outputs);
        events.send(HostEvent::Shutdown).expect("send");
        (early, late)
    };

    let (registry, (early, late)) = tokio::join!(driver.run(), script);

    assert!(settled(&early).is_empty());
    assert!(early.iter().any(|o| matches!(
        o,
        DriverOutput::Request {
            request: HostRequest::Restyle(_),
            ..
        }
    )));
    assert_eq!(settled(&late), vec![(wheel, Selection::new(3, "3".to_string()))]);
    let wheel = registry.get(wheel).expect("wheel");
    assert_eq!(wheel.current_index(), Some(3));
    assert_eq!(wheel.next_deadline(), None);
}

#[tokio::test(start_paused = true)]
async fn cascade_reaches_dependent_and_errors_are_reported() {
    let mut registry = WheelRegistry::new();
    let period = registry
        .insert(Wheel::new(WheelConfig::default()).with_data(strings(["AM", "PM"])));
    let hour = registry.insert(Wheel::new(WheelConfig::default()).with_data(strings(["--"])));
    registry.join(period, hour).expect("join");
    let mut table = JoinTable::new();
    table.insert("AM".to_string(), strings(0..12));
    registry.set_join_data(period, table).expect("table");
    let (driver, events, mut outputs) = WheelDriver::channel(registry);

    let script = async move {
        for wheel in [period, hour] {
            events
                .send(HostEvent::ItemExtent { wheel, px: 40.0 })
                .expect("send");
        }
        events
            .send(HostEvent::Scrolled {
                wheel: period,
                offset: 0.0,
                first_visible: VirtualIndex(0),
            })
            .expect("send");
        // commit at 300ms, reset at 310ms, dependent commit at 610ms
        tokio::time::sleep(Duration::from_millis(700)).await;
        let first = drain(&mut outputs);

        events
            .send(HostEvent::ScrollTo {
                wheel: hour,
                index: 40,
            })
            .expect("send");
        events
            .send(HostEvent::Scrolled {
                wheel: period,
                offset: 0.0,
                first_visible: VirtualIndex(1),
            })
            .expect("send");
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = drain(&mut outputs);
        drop(events);
        (first, second)
    };

    let (_registry, (first, second)) = tokio::join!(driver.run(), script);

    assert_eq!(
        settled(&first),
        vec![
            (period, Selection::new(0, "AM".to_string())),
            (hour, Selection::new(0, "0".to_string())),
        ]
    );

    let failures: Vec<&WheelError> = second
        .iter()
        .filter_map(|o| match o {
            DriverOutput::Failed(err) => Some(err),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 2);
    assert!(matches!(failures[0], WheelError::InvalidArgument(_)));
    assert!(matches!(failures[1], WheelError::JoinDataMissing(_)));
    // the commit whose cascade failed is still delivered
    assert_eq!(
        settled(&second),
        vec![(period, Selection::new(1, "PM".to_string()))]
    );
}

#[tokio::test(start_paused = true)]
async fn wheels_can_be_reconfigured_while_running() {
    let mut registry = WheelRegistry::new();
    let period = registry
        .insert(Wheel::new(WheelConfig::default()).with_data(strings(["AM", "PM"])));
    let hour = registry.insert(Wheel::new(WheelConfig::default()).with_data(strings(["--"])));
    let mut table = JoinTable::new();
    table.insert("AM".to_string(), strings(0..12));
    table.insert("PM".to_string(), strings(12..24));
    let (driver, events, mut outputs) = WheelDriver::channel(registry);

    let script = async move {
        for wheel in [period, hour] {
            events
                .send(HostEvent::ItemExtent { wheel, px: 40.0 })
                .expect("send");
        }
        events
            .send(HostEvent::Join {
                primary: period,
                dependent: hour,
            })
            .expect("send");
        events
            .send(HostEvent::SetJoinData {
                primary: period,
                table,
            })
            .expect("send");
        events
            .send(HostEvent::SetWheelSize { wheel: hour, size: 4 })
            .expect("send");
        events
            .send(HostEvent::SetClickable {
                wheel: period,
                clickable: true,
            })
            .expect("send");
        events
            .send(HostEvent::Scrolled {
                wheel: period,
                offset: 0.0,
                first_visible: VirtualIndex(1),
            })
            .expect("send");
        events
            .send(HostEvent::Clicked { wheel: period })
            .expect("send");
        tokio::time::sleep(Duration::from_millis(700)).await;
        let outputs = drain(&mut outputs);

        events
            .send(HostEvent::SetLoop {
                wheel: hour,
                looping: true,
            })
            .expect("send");
        events
            .send(HostEvent::Unjoin { primary: period })
            .expect("send");
        events.send(HostEvent::Shutdown).expect("send");
        outputs
    };

    let (registry, outputs) = tokio::join!(driver.run(), script);

    assert!(outputs.iter().any(|o| matches!(
        o,
        DriverOutput::Failed(WheelError::InvalidConfig(_))
    )));
    assert!(outputs.iter().any(|o| matches!(
        o,
        DriverOutput::Activated { wheel, selection }
            if *wheel == period && selection.item == "PM"
    )));
    assert_eq!(
        settled(&outputs),
        vec![
            (period, Selection::new(1, "PM".to_string())),
            (hour, Selection::new(0, "12".to_string())),
        ]
    );

    let hour_wheel = registry.get(hour).expect("hour");
    assert!(hour_wheel.config().looping);
    assert_eq!(hour_wheel.config().window_size.get(), 3);
    assert_eq!(hour_wheel.data().expect("data").first(), "12");
    assert_eq!(registry.dependent_of(period), None);
}
