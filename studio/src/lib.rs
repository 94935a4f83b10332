//! # Token Studio - Library Root
//!
//! Native desktop front-end for creating and managing SPL tokens and NFTs.
//! The binary (`main.rs`) wires configuration, logging and the Tokio runtime,
//! then hands an [`app::App`] to eframe.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  studio (this crate)                         │
//! │  app  - state, events, spawned flows          │
//! │  ui   - egui screens, widgets, theme          │
//! ├──────────────────────────────────────────────┤
//! │  lib-solana - discovery, actions, creation,   │
//! │               collections, swap               │
//! │  lib-core   - config, errors, notifications   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod logger;
pub mod ui;
