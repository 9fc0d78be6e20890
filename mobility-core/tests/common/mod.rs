//! Shared helpers for the mobility integration tests
//!
//! - `generators`: synthetic accelerometer and classification streams
//! - `collaborators`: recording sink and sensor requester, plus a tracker
//!   constructor wired to them

#![allow(dead_code)]

pub mod collaborators;
pub mod generators;
