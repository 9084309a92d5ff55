//! Strongly typed physical quantities for microlensing event generation.

pub mod angle;
pub mod length;
pub mod mass;
pub mod proper_motion;
pub mod time;


pub use angle::{Angle, MAS_PER_RADIAN};
pub use length::{Length, AU_PER_PARSEC, SOLAR_RADIUS_AU};
pub use mass::{Mass, EARTH_MASS_SOLAR, JUPITER_MASS_SOLAR};
pub use proper_motion::ProperMotion;
pub use time::{Time, DAYS_PER_YEAR};
