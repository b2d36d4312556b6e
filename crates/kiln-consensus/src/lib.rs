//! # kiln-consensus
//! Block validation and forging.
//!
//! Wires kiln-core's forging math (generation signatures, hits, targets,
//! base-target retargeting) over the [`History`](kiln_core::traits::History),
//! [`BalanceSheet`](kiln_core::traits::BalanceSheet), and
//! [`TransactionPacker`](kiln_core::traits::TransactionPacker) collaborator
//! traits into a complete validator/generator pipeline.

pub mod engine;

pub use engine::{ForgeEngine, ForgeParams};
