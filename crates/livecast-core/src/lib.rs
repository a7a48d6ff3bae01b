//! Livecast core business logic.
//!
//! Pure Rust crate with no platform dependencies.
//! Native UI shells wrap this crate, implement [`engine::RtcEngine`]
//! against the vendor RTC SDK, and render video into the rectangles
//! computed by [`layout`].

pub mod channel;
pub mod controls;
pub mod engine;
pub mod errors;
pub mod events;
pub mod layout;
pub mod role;
pub mod settings;
pub mod tiles;

pub use errors::CastError;
pub use events::CastEvent;
