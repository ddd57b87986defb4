mod helpers {
    include!("../helpers/mod.rs");
}

use embassy_time::Instant;
use halmet_n2k::infra::clock::ManualClock;
use halmet_n2k::infra::codec::traits::PgnData;
use halmet_n2k::protocol::lookups::{EngineStatus1, EngineStatus2};
use halmet_n2k::protocol::messages::{Pgn127488, Pgn127489};
use halmet_n2k::telemetry::config::{ConfigPayload, ConfigValue};
use halmet_n2k::telemetry::scheduler::TelemetryScheduler;
use halmet_n2k::telemetry::senders::{EngineDynamicSender, EngineRapidSender};
use halmet_n2k::telemetry::traits::{Configurable, Periodic};
use helpers::{fast_packet_messages, reassemble, MockCanBus, VirtualTimer};

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[tokio::test]
async fn test_rapid_update_reaches_the_bus() {
    let clock = ManualClock::new();
    let rapid = EngineRapidSender::new("/engine/1/rapid", 1, &clock);
    rapid.set_engine_speed(42.5);
    rapid.set_boost_pressure(150_000.0);
    rapid.set_tilt_trim(12);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        22,
    );
    scheduler.start();
    let report = scheduler.fire_due().await;
    assert_eq!(report.sent, 1);

    let frames = bus.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].id.pgn(), 127488);
    assert_eq!(frames[0].id.priority(), 2);
    assert_eq!(frames[0].id.source_address(), 22);

    let msg = Pgn127488::from_payload(frames[0].payload()).unwrap();
    assert_eq!(msg.instance, 1);
    assert_eq!(msg.speed, Some(2550.0));
    assert_eq!(msg.boost_pressure, Some(150_000.0));
    assert_eq!(msg.tilt_trim, Some(12));
}

#[tokio::test]
async fn test_dynamic_parameters_round_trip_through_fast_packet() {
    // Alarms and measurements survive segmentation, reassembly and decoding.
    let clock = ManualClock::new();
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);
    dynamic.set_oil_pressure(410_000.0);
    dynamic.set_temperature(358.15);
    dynamic.set_alternator_potential(14.2);
    dynamic.set_fuel_rate(12.5);
    dynamic.set_total_engine_hours(3_600 * 1_250);
    dynamic.set_engine_load(65);
    dynamic.set_over_temperature(true);
    dynamic.set_charge_indicator(true);
    dynamic.set_neutral_start_protect(true);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&dynamic as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        22,
    );
    scheduler.start();
    scheduler.fire_due().await;

    let frames = bus.frames();
    assert_eq!(frames.len(), 4);
    assert!(frames.iter().all(|frame| frame.id.priority() == 2));

    let payload = reassemble(&frames);
    assert_eq!(payload.len(), 26);
    let msg = Pgn127489::from_payload(&payload).unwrap();

    assert_eq!(msg.oil_pressure, Some(410_000.0));
    assert!(close(msg.temperature.unwrap(), 358.15, 0.005));
    assert!(close(msg.alternator_potential.unwrap(), 14.2, 0.005));
    assert!(close(msg.fuel_rate.unwrap(), 12.5, 0.05));
    assert_eq!(msg.total_engine_hours, Some(4_500_000));
    assert_eq!(msg.engine_load, Some(65));
    assert_eq!(msg.oil_temperature, None);
    assert_eq!(msg.engine_torque, None);

    assert!(msg.get_discrete_status1_bit(EngineStatus1::CheckEngine));
    assert!(msg.get_discrete_status1_bit(EngineStatus1::OverTemperature));
    assert!(msg.get_discrete_status1_bit(EngineStatus1::ChargeIndicator));
    assert!(!msg.get_discrete_status1_bit(EngineStatus1::LowOilPressure));
    assert!(msg.get_discrete_status2_bit(EngineStatus2::NeutralStartProtect));
}

#[tokio::test]
async fn test_informational_flags_do_not_raise_check_engine() {
    // Only informational flags set: no "check engine".
    let clock = ManualClock::new();
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);
    dynamic.set_preheat_indicator(true);
    dynamic.set_power_reduction(true);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&dynamic as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        22,
    );
    scheduler.start();
    scheduler.fire_due().await;

    let msg = Pgn127489::from_payload(&reassemble(&bus.frames())).unwrap();
    assert!(!msg.get_discrete_status1_bit(EngineStatus1::CheckEngine));
    assert!(msg.get_discrete_status1_bit(EngineStatus1::PreheatIndicator));
    assert!(msg.get_discrete_status2_bit(EngineStatus2::PowerReduction));
}

#[tokio::test]
async fn test_alarm_bits_expire_while_running() {
    // Alarm bits are dropped once their input went quiet for five seconds.
    let clock = ManualClock::new();
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);
    dynamic.set_low_coolant_level(true);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&dynamic as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        22,
    );
    scheduler.run_until(Instant::from_millis(6_000)).await;

    let words: Vec<(u16, u16)> = fast_packet_messages(&bus.frames())
        .iter()
        .map(|payload| {
            let msg = Pgn127489::from_payload(payload).unwrap();
            (msg.discrete_status1, msg.discrete_status2)
        })
        .collect();
    assert_eq!(words.len(), 13);
    // 0 ms through 5000 ms
    assert!(words[..=10].iter().all(|w| *w == (0x0041, 0)));
    assert!(words[11..].iter().all(|w| *w == (0, 0)));
}

#[tokio::test]
async fn test_engine_instance_reconfiguration_applies_to_next_tick() {
    // A new engine instance applies to the next emitted messages.
    let clock = ManualClock::new();
    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, &clock);
    let dynamic = EngineDynamicSender::new("/engine/1/dynamic", 0, &clock);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic, &dynamic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        22,
    );
    scheduler.run_until(Instant::from_millis(0)).await;

    let payload = ConfigPayload::new()
        .with("engine_instance", ConfigValue::Int(1))
        .unwrap();
    rapid.from_payload(&payload).unwrap();
    dynamic.from_payload(&payload).unwrap();
    bus.clear();

    scheduler.run_until(Instant::from_millis(500)).await;

    for frame in bus.frames_for(127488) {
        assert_eq!(Pgn127488::from_payload(frame.payload()).unwrap().instance, 1);
    }
    let dynamic_messages = fast_packet_messages(&bus.frames_for(127489));
    assert_eq!(dynamic_messages.len(), 1);
    assert_eq!(Pgn127489::from_payload(&dynamic_messages[0]).unwrap().instance, 1);
    assert_eq!(
        rapid.to_payload().unwrap().get("engine_instance"),
        Some(ConfigValue::Int(1))
    );
}
