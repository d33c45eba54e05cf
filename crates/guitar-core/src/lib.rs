//! Touch-to-sound engine for a 3x3 grid of playable strings.
//!
//! Data flows one way: viewport geometry → [`layout`] segments → [`hit`]
//! resolution of a touch → fan-out to [`playback`] and [`animation`].
//! [`Instrument`] wires the pieces together for a host front-end.

pub mod animation;
pub mod constants;
pub mod error;
pub mod hit;
pub mod instrument;
pub mod layout;
pub mod playback;
pub mod sound_bank;

pub use animation::*;
pub use constants::*;
pub use error::GuitarError;
pub use hit::*;
pub use instrument::*;
pub use layout::*;
pub use playback::*;
pub use sound_bank::*;
