//! # kiln-core
//! Foundation types and forging math for the Kiln proof-of-stake protocol.

pub mod consensus_data;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod forging;
pub mod genesis;
pub mod retarget;
pub mod score;
pub mod traits;
pub mod types;
