//! Integration test suite for the Kiln consensus core.
//!
//! Exercises the full validator/generator pipeline over in-memory
//! collaborator implementations: forging chains block by block, replaying
//! them through validation, and comparing competing chains by score.

pub mod helpers;
