//! Bit-level PGN codec: readers/writers, the descriptor-driven engine and the
//! traits message structs implement to plug into it.
pub mod bits;
pub mod engine;
pub mod traits;
