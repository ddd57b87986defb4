//! Ensure the engine and tank PGNs survive serialization, segmentation and
//! transmission.
mod helpers {
    include!("../../../helpers/mod.rs");
}

use embedded_can::{ExtendedId, Frame, Id};
use halmet_n2k::error::{CanIdBuildError, SendPgnError};
use halmet_n2k::infra::codec::traits::PgnData;
use halmet_n2k::protocol::lookups::{EngineStatus1, FluidType};
use halmet_n2k::protocol::messages::{Pgn127488, Pgn127489, Pgn127505};
use halmet_n2k::protocol::transport::can_frame::CanFrame;
use halmet_n2k::protocol::transport::fast_packet::builder::FastPacketBuilder;
use halmet_n2k::protocol::transport::traits::pgn_sender::{PgnHeader, PgnSender};
use helpers::{reassemble, BusOff, MockCanBus, MockTimer};

#[tokio::test]
async fn test_pgn_127489_fast_packet_roundtrip() {
    // Serialize → segment → send → reassemble → deserialize and compare.
    let mut engine = Pgn127489::new(1);
    engine.oil_pressure = Some(380_000.0);
    engine.coolant_pressure = Some(120_000.0);
    engine.fuel_pressure = Some(350_000.0);
    engine.total_engine_hours = Some(987_654);
    engine.engine_torque = Some(-5);
    engine.set_discrete_status1_bit(EngineStatus1::WaterInFuel, true);
    engine.set_discrete_status1_bit(EngineStatus1::CheckEngine, true);

    let mut bus = MockCanBus::new();
    let sent = bus
        .send_pgn(&engine, 35, 5, &mut MockTimer)
        .await
        .expect("send PGN 127489");
    assert_eq!(sent, 4, "26 bytes need four Fast Packet frames");

    let frames = bus.frames();
    assert!(frames.iter().all(|frame| frame.id.pgn() == 127489));
    assert!(frames.iter().all(|frame| frame.data[0] >> 5 == 5));
    assert_eq!(frames[0].data[1], 26);

    let payload = reassemble(&frames);
    let decoded = Pgn127489::from_payload(&payload).expect("decode reassembled PGN 127489");
    assert_eq!(decoded.instance, 1);
    assert_eq!(decoded.oil_pressure, engine.oil_pressure);
    assert_eq!(decoded.coolant_pressure, engine.coolant_pressure);
    assert_eq!(decoded.fuel_pressure, engine.fuel_pressure);
    assert_eq!(decoded.total_engine_hours, engine.total_engine_hours);
    assert_eq!(decoded.engine_torque, Some(-5));
    assert_eq!(decoded.engine_load, None);
    assert_eq!(decoded.discrete_status1, 0x0101);
}

#[tokio::test]
async fn test_single_frame_pgns_are_not_segmented() {
    // Eight-byte PGNs leave as one plain frame without Fast Packet header.
    let mut rapid = Pgn127488::new(0);
    rapid.speed = Some(700.0);

    let fluid = Pgn127505 {
        level: Some(12.5),
        ..Pgn127505::new(3, FluidType::BlackWater, 80.0)
    };

    let mut bus = MockCanBus::new();
    assert_eq!(bus.send_pgn(&rapid, 35, 0, &mut MockTimer).await.unwrap(), 1);
    assert_eq!(bus.send_pgn(&fluid, 35, 0, &mut MockTimer).await.unwrap(), 1);

    let frames = bus.frames();
    assert_eq!(frames[0].id.priority(), 2);
    assert_eq!(frames[1].id.priority(), 6);

    let rapid_back = Pgn127488::from_payload(frames[0].payload()).unwrap();
    assert_eq!(rapid_back.speed, Some(700.0));
    let fluid_back = Pgn127505::from_payload(frames[1].payload()).unwrap();
    assert_eq!(fluid_back.fluid_type, FluidType::BlackWater);
    assert_eq!(fluid_back.level, Some(12.5));
}

#[tokio::test]
async fn test_refused_frame_aborts_message() {
    // The first refused frame aborts the message; nothing is retried.
    let engine = Pgn127489::new(0);
    let mut bus = MockCanBus::new();
    bus.set_refuse(true);

    let result = bus.send_pgn(&engine, 35, 0, &mut MockTimer).await;
    assert!(matches!(result, Err(SendPgnError::Send(BusOff))));
    assert_eq!(bus.refused(), 1);
    assert!(bus.frames().is_empty());
}

#[tokio::test]
async fn test_pdu1_header_is_rejected() {
    // Addressed (PDU1) PGNs cannot be broadcast.
    let header = PgnHeader {
        pgn: 59904,
        priority: 6,
        source_address: 35,
        fast_packet: false,
    };
    let mut bus = MockCanBus::new();
    let result = bus
        .send_payload(header, &[0x00, 0xEE, 0x00], 0, &mut MockTimer)
        .await;
    assert!(matches!(
        result,
        Err(SendPgnError::Build(CanIdBuildError::InvalidForBroadcast))
    ));
    assert!(bus.frames().is_empty());
}

#[tokio::test]
async fn test_forced_fast_packet_short_payload() {
    // Forcing Fast Packet framing on a short payload still yields a valid
    // single-frame sequence.
    let header = PgnHeader {
        pgn: 127489,
        priority: 2,
        source_address: 35,
        fast_packet: true,
    };
    let mut bus = MockCanBus::new();
    let sent = bus
        .send_payload(header, &[1, 2, 3], 2, &mut MockTimer)
        .await
        .unwrap();
    assert_eq!(sent, 1);
    assert_eq!(
        bus.frames()[0].data,
        [0x40, 3, 1, 2, 3, 0xFF, 0xFF, 0xFF]
    );
    assert_eq!(reassemble(&bus.frames()), vec![1, 2, 3]);
}

//==================================================================================EMBEDDED_CAN
/// Minimal HAL frame used to check the `embedded-can` bridge.
#[derive(Debug)]
struct HalFrame {
    id: Id,
    data: Vec<u8>,
}

impl Frame for HalFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        Some(Self {
            id: id.into(),
            data: data.to_vec(),
        })
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.data.len()
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn test_frames_convert_to_hal_frames() {
    let payload: [u8; 26] = core::array::from_fn(|i| i as u8);
    let frames: Vec<CanFrame> = FastPacketBuilder::new(127489, 2, 35, &payload)
        .build()
        .map(|frame| frame.expect("frame build"))
        .collect();

    for frame in &frames {
        let hal: HalFrame = frame.to_embedded().expect("HAL frame");
        assert!(hal.is_extended());
        assert_eq!(hal.id(), Id::Extended(ExtendedId::new(frame.id.0).unwrap()));
        assert_eq!(hal.data(), &frame.data[..]);
    }
}
