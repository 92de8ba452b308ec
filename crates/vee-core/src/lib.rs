//! # vee-core
//!
//! Foundation types and utilities for the Vee food chatbot backend.
//!
//! This crate provides the shared vocabulary the other vee crates depend on:
//!
//! - **Turns**: [`turns::Turn`] and [`turns::HistoricalTurn`] conversation pairs
//! - **Messages**: [`messages::ChatMessage`] with text and image content blocks
//! - **Text**: char-safe truncation and Arabic-script detection in [`text`]
//! - **Time**: naive-UTC timestamp formatting and lenient parsing in [`time`]
//! - **Logging**: [`logging::init_tracing`] bootstrap for the binary
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other vee crates.

#![deny(unsafe_code)]

pub mod logging;
pub mod messages;
pub mod text;
pub mod time;
pub mod turns;
