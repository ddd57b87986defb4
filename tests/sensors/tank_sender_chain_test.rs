mod helpers {
    include!("../helpers/mod.rs");
}

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Instant};
use halmet_n2k::infra::clock::{ManualClock, MonotonicClock};
use halmet_n2k::infra::codec::traits::PgnData;
use halmet_n2k::protocol::lookups::FluidType;
use halmet_n2k::protocol::messages::{Pgn127488, Pgn127505};
use halmet_n2k::sensors::analog::{Linear, TankSender, VOLTAGE_DIVIDER_SCALE};
use halmet_n2k::sensors::curve::{Sample, EUROPEAN_TANK_SENDER, EUROPEAN_TANK_SENDER_SHORT};
use halmet_n2k::sensors::digital::{AlarmInput, AlarmStates, Frequency};
use halmet_n2k::telemetry::scheduler::TelemetryScheduler;
use halmet_n2k::telemetry::senders::{EngineRapidSender, FluidLevelSender, TankIdentity};
use halmet_n2k::telemetry::traits::Periodic;
use helpers::{MockCanBus, VirtualTimer};

/// ADC voltage that reads as `ohms` on the sender input.
fn adc_volts_for(ohms: f64) -> f64 {
    ohms * 0.01 / VOLTAGE_DIVIDER_SCALE
}

#[tokio::test]
async fn test_tank_sender_reading_reaches_fluid_level_pgn() {
    // ADC reading to calibrated level to PGN 127505 on the bus.
    let clock = ManualClock::new();
    let chain = TankSender::new(
        None,
        &EUROPEAN_TANK_SENDER,
        Linear::tank_volume("/tank/a/volume"),
    )
    .unwrap();
    let tank = FluidLevelSender::new(
        "/tank/a",
        TankIdentity {
            instance: 0,
            fluid_type: FluidType::Fuel,
            capacity: 120.0,
        },
        &clock,
    );

    let reading = chain.read(adc_volts_for(45.0));
    assert!((reading.level - 0.25).abs() < 1e-9);
    assert!((reading.volume - 0.030).abs() < 1e-9);
    tank.set_tank_level(reading.level);

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&tank as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        35,
    );
    scheduler.run_until(Instant::from_millis(0)).await;

    let msg = Pgn127505::from_payload(bus.frames()[0].payload()).unwrap();
    assert_eq!(msg.level, Some(25.0));
}

#[test]
fn test_tank_sender_out_of_range_readings_clamp() {
    // A broken or shorted sender clamps to the ends of the curve.
    let chain = TankSender::new(
        None,
        &EUROPEAN_TANK_SENDER_SHORT,
        Linear::tank_volume("/tank/a/volume"),
    )
    .unwrap();
    assert_eq!(chain.read(adc_volts_for(5_000.0)).level, 1.0);
    assert_eq!(chain.read(0.0).level, 0.0);
}

#[test]
fn test_tank_sender_uses_persisted_curve() {
    // A persisted curve wins over the default one.
    let persisted = [Sample::new(10.0, 0.0), Sample::new(190.0, 1.0)];
    let chain = TankSender::new(
        Some(&persisted[..]),
        &EUROPEAN_TANK_SENDER,
        Linear::tank_volume("/tank/a/volume"),
    )
    .unwrap();
    assert_eq!(chain.curve().samples(), &persisted);
    assert!((chain.read(adc_volts_for(100.0)).level - 0.5).abs() < 1e-9);
}

#[cfg(feature = "serde")]
#[test]
fn test_tank_sender_curve_from_json() {
    let json = r#"[{"input":0.0,"output":0.0},{"input":240.0,"output":1.0}]"#;
    let persisted: Vec<Sample> = serde_json::from_str(json).unwrap();
    let chain = TankSender::new(
        Some(persisted.as_slice()),
        &EUROPEAN_TANK_SENDER,
        Linear::tank_volume("/tank/a/volume"),
    )
    .unwrap();
    assert!((chain.read(adc_volts_for(120.0)).level - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_tachometer_reading_reaches_engine_rapid_pgn() {
    // Tachometer pulses to engine speed in PGN 127488.
    let clock = ManualClock::new();
    let tacho = Frequency::new("/tacho/1", 1.0 / 8.0);
    let rapid = EngineRapidSender::new("/engine/1/rapid", 0, &clock);

    // 200 pulses in 500 ms at 8 pulses per revolution: 50 Hz
    rapid.set_engine_speed(tacho.revolutions(200, Duration::from_millis(500)));

    let bus = MockCanBus::new();
    let mut scheduler = TelemetryScheduler::new(
        [&rapid as &dyn Periodic],
        bus.clone(),
        VirtualTimer::new(&clock),
        &clock,
        35,
    );
    scheduler.run_until(Instant::from_millis(0)).await;

    let msg = Pgn127488::from_payload(bus.frames()[0].payload()).unwrap();
    assert_eq!(msg.speed, Some(3000.0));
}

#[test]
fn test_alarm_inputs_feed_display_state() {
    // Alarm lines are rate limited before they update the shared display state.
    let clock = ManualClock::new();
    let states: AlarmStates<NoopRawMutex> = AlarmStates::new();
    let mut inputs = [AlarmInput::new(), AlarmInput::new(), AlarmInput::new()];

    let report = |line: usize, active: bool, inputs: &mut [AlarmInput; 3]| {
        if let Some(state) = inputs[line].on_input(active, clock.now()) {
            states.set(line + 1, state);
        }
    };

    report(0, true, &mut inputs);
    report(2, true, &mut inputs);
    assert_eq!(states.indicator_text().as_str(), "_*_*");

    // Bounce within the rate limit window is ignored
    clock.advance(Duration::from_millis(300));
    report(0, false, &mut inputs);
    assert_eq!(states.indicator_text().as_str(), "_*_*");

    clock.advance(Duration::from_millis(800));
    report(0, false, &mut inputs);
    assert_eq!(states.indicator_text().as_str(), "___*");
}
