//! Infrastructure shared by the protocol and telemetry layers: the
//! descriptor-driven PGN codec and the monotonic clock seam.
pub mod clock;
pub mod codec;
