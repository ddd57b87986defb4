//! Conditioning of the raw board inputs before they reach the senders:
//! calibration curves, ADC voltage scaling and digital input transforms.
pub mod analog;
pub mod curve;
pub mod digital;
