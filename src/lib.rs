pub mod game;
pub mod logging;

#[cfg(feature = "glib")]
pub mod driver;

pub use game::*;
