//! `CanBus` extension providing a high-level API to send PGNs: it serializes
//! the structure, builds Fast Packet frames when needed, and transmits them in
//! sequence with the appropriate inter-frame delays.
//!
//! # Fast Packet inter-frame delay
//!
//! When a Fast Packet message spans multiple frames, a delay is inserted
//! between consecutive frames so embedded CAN controllers do not saturate
//! their TX buffers. The delay is [`FAST_PACKET_INTER_FRAME_DELAY_MS`].
use crate::{
    error::SendPgnError,
    infra::codec::traits::PgnData,
    protocol::transport::fast_packet::{builder::FastPacketBuilder, MAX_FAST_PACKET_PAYLOAD},
    protocol::transport::traits::{can_bus::CanBus, n2k_timer::N2kTimer},
    protocol::transport::FAST_PACKET_INTER_FRAME_DELAY_MS,
};

/// Addressing information shared by every frame of a broadcast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PgnHeader {
    pub pgn: u32,
    pub priority: u8,
    pub source_address: u8,
    /// Segment with Fast Packet framing even when the payload fits one frame.
    pub fast_packet: bool,
}

/// Trait extending `CanBus` with PGN-sending helpers.
pub trait PgnSender: CanBus {
    /// Segment and send an already serialized payload.
    ///
    /// Multi-frame transmissions wait [`FAST_PACKET_INTER_FRAME_DELAY_MS`]
    /// between frames using `timer`. The first failing frame aborts the
    /// message; nothing is retried. Returns the number of frames sent.
    ///
    /// # Errors
    ///
    /// - [`SendPgnError::Build`] when the identifier or the segmentation fails
    /// - [`SendPgnError::Send`] when the bus refuses a frame
    fn send_payload<'a, T: N2kTimer>(
        &'a mut self,
        header: PgnHeader,
        payload: &'a [u8],
        sequence_id: u8,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<usize, SendPgnError<Self::Error>>> + 'a;

    /// Serialize a PGN struct and send it with the priority of its descriptor.
    ///
    /// ```rust,ignore
    /// let mut msg = Pgn127488::new(0);
    /// msg.speed = Some(1500.0);
    /// can_bus.send_pgn(&msg, my_address, 0, &mut timer).await?;
    /// ```
    fn send_pgn<'a, P: PgnData, T: N2kTimer>(
        &'a mut self,
        pgn_data: &'a P,
        source_address: u8,
        sequence_id: u8,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<usize, SendPgnError<Self::Error>>> + 'a;
}

impl<C: CanBus> PgnSender for C {
    fn send_payload<'a, T: N2kTimer>(
        &'a mut self,
        header: PgnHeader,
        payload: &'a [u8],
        sequence_id: u8,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<usize, SendPgnError<Self::Error>>> + 'a {
        async move {
            let builder = FastPacketBuilder::new(
                header.pgn,
                header.priority,
                header.source_address,
                payload,
            )
            .with_sequence_id(sequence_id)
            .fast_packet(header.fast_packet);
            let multi_frame = builder.frame_count() > 1;

            let mut sent = 0;
            for frame_result in builder.build() {
                let frame = frame_result.map_err(SendPgnError::Build)?;

                // No delay before the first frame.
                if sent > 0 && multi_frame {
                    timer.delay_ms(FAST_PACKET_INTER_FRAME_DELAY_MS).await;
                }

                self.send(&frame).await.map_err(SendPgnError::Send)?;
                sent += 1;
            }

            Ok(sent)
        }
    }

    fn send_pgn<'a, P: PgnData, T: N2kTimer>(
        &'a mut self,
        pgn_data: &'a P,
        source_address: u8,
        sequence_id: u8,
        timer: &'a mut T,
    ) -> impl core::future::Future<Output = Result<usize, SendPgnError<Self::Error>>> + 'a {
        async move {
            let mut payload_buffer = [0u8; MAX_FAST_PACKET_PAYLOAD];
            let len = pgn_data
                .to_payload(&mut payload_buffer)
                .map_err(|_| SendPgnError::Serialization)?;

            let header = PgnHeader {
                pgn: P::DESCRIPTOR.id,
                priority: P::DESCRIPTOR.priority,
                source_address,
                fast_packet: P::DESCRIPTOR.fastpacket,
            };
            self.send_payload(header, &payload_buffer[..len], sequence_id, timer)
                .await
        }
    }
}
