mod helpers {
    include!("../helpers/mod.rs");
}

use embassy_time::Instant;
use halmet_n2k::infra::clock::{ManualClock, MonotonicClock};
use halmet_n2k::infra::codec::traits::PgnData;
use halmet_n2k::protocol::lookups::FluidType;
use halmet_n2k::protocol::messages::{Pgn127488, Pgn127489, Pgn127505};
use halmet_n2k::telemetry::scheduler::{TelemetryScheduler, TickReport};
use halmet_n2k::telemetry::senders::{
    EngineDynamicSender, EngineRapidSender, FluidLevelSender, TankIdentity,
};
use halmet_n2k::telemetry::traits::Periodic;
use helpers::{fast_packet_messages, MockCanBus, VirtualTimer};
use static_cell::StaticCell;

const SOURCE_ADDRESS: u8 = 35;

fn fuel_tank() -> TankIdentity {
    TankIdentity {
        instance: 0,
        fluid_type: FluidType::Fuel,
        capacity: 120.0,
    }
}

#[tokio::test]
async fn test_scheduler_keeps_each_sender_cadence() {
    // Ten seconds of simulated time: every sender keeps its own cadence.
    static CLOCK: StaticCell<ManualClock> = StaticCell::new();
    let clock: &'static ManualClock = CLOCK.init(ManualClock::new());

    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, clock);
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, clock);
    let fluid = FluidLevelSender::new("/tank/fuel", fuel_tank(), clock);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic, &dynamic, &fluid],
        bus.clone(),
        VirtualTimer::new(clock),
        clock,
        SOURCE_ADDRESS,
    );

    let report = scheduler.run_until(Instant::from_millis(10_000)).await;

    let rapid_count = bus.frames_for(127488).len();
    let dynamic_count = fast_packet_messages(&bus.frames_for(127489)).len();
    let fluid_count = bus.frames_for(127505).len();

    assert_eq!(rapid_count, 101);
    assert_eq!(dynamic_count, 21);
    assert_eq!(fluid_count, 5);
    assert_eq!(
        report,
        TickReport {
            sent: 101 + 21 + 5,
            failed: 0
        }
    );
    assert!(bus
        .frames()
        .iter()
        .all(|frame| frame.id.source_address() == SOURCE_ADDRESS && frame.len == 8));
}

#[tokio::test]
async fn test_scheduler_sends_not_available_when_nothing_is_fresh() {
    // Without any sensor update every message still goes out, with all
    // measured fields "not available".
    let clock = ManualClock::new();
    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, &clock);
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);
    let fluid = FluidLevelSender::new("/tank/fuel", fuel_tank(), &clock);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic, &dynamic, &fluid],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        SOURCE_ADDRESS,
    );
    scheduler.run_until(Instant::from_millis(20_000)).await;

    let rapid_frames = bus.frames_for(127488);
    assert_eq!(rapid_frames.len(), 201);
    for frame in &rapid_frames {
        let msg = Pgn127488::from_payload(frame.payload()).unwrap();
        assert_eq!(msg.speed, None);
        assert_eq!(msg.boost_pressure, None);
        assert_eq!(msg.tilt_trim, None);
    }

    let dynamic_messages = fast_packet_messages(&bus.frames_for(127489));
    assert_eq!(dynamic_messages.len(), 41);
    for payload in &dynamic_messages {
        let msg = Pgn127489::from_payload(payload).unwrap();
        assert_eq!(msg.oil_pressure, None);
        assert_eq!(msg.total_engine_hours, None);
        assert_eq!(msg.discrete_status1, 0);
        assert_eq!(msg.discrete_status2, 0);
    }

    let fluid_frames = bus.frames_for(127505);
    assert_eq!(fluid_frames.len(), 9);
    for frame in &fluid_frames {
        let msg = Pgn127505::from_payload(frame.payload()).unwrap();
        assert_eq!(msg.level, None);
        assert_eq!(msg.capacity, Some(120.0));
    }
}

#[tokio::test]
async fn test_scheduler_reports_values_until_they_expire() {
    // A value is reported while fresh and replaced by "not available" once its
    // expiry elapsed.
    let clock = ManualClock::new();
    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, &clock);
    rapid.set_engine_speed(30.0);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        SOURCE_ADDRESS,
    );
    scheduler.run_until(Instant::from_millis(1_500)).await;

    let speeds: Vec<Option<f64>> = bus
        .frames_for(127488)
        .iter()
        .map(|frame| Pgn127488::from_payload(frame.payload()).unwrap().speed)
        .collect();
    assert_eq!(speeds.len(), 16);
    // 0 ms through 1000 ms carry the reading
    assert!(speeds[..=10].iter().all(|speed| *speed == Some(1800.0)));
    assert!(speeds[11..].iter().all(|speed| speed.is_none()));
}

#[tokio::test]
async fn test_scheduler_counts_failed_sends() {
    // A refused send is counted and dropped; the cadence is not disturbed.
    let clock = ManualClock::new();
    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, &clock);
    let fluid = FluidLevelSender::new("/tank/fuel", fuel_tank(), &clock);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic, &fluid],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        SOURCE_ADDRESS,
    );

    bus.set_refuse(true);
    let report = scheduler.run_until(Instant::from_millis(900)).await;
    assert_eq!(report, TickReport { sent: 0, failed: 11 });
    assert_eq!(bus.refused(), 11);

    bus.set_refuse(false);
    let report = scheduler.run_until(Instant::from_millis(2_500)).await;
    assert_eq!(report, TickReport { sent: 17, failed: 0 });
    assert_eq!(bus.frames_for(127505).len(), 1);
}

#[tokio::test]
async fn test_scheduler_sleeps_until_deadlines() {
    // The runner sleeps through the timer between deadlines and only pays the
    // Fast Packet inter-frame gaps on top.
    let clock = ManualClock::new();
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&dynamic as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        SOURCE_ADDRESS,
    );
    scheduler.run_until(Instant::from_millis(1_000)).await;

    // Three messages, the last one ends 3 x 2 ms after its deadline
    assert_eq!(fast_packet_messages(&bus.frames()).len(), 3);
    assert_eq!(clock.now().as_millis(), 1_006);
    let (_, timer, _) = scheduler.into_parts();
    assert_eq!(timer.slept_ms(), 1_006);
}
