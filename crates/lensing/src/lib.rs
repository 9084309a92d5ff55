//! Closed-form point-lens and binary-lens relations.
//!
//! Everything here is a pure function of typed physical quantities; sampling
//! and configuration live in the `event-generator` crate.

pub mod blending;
pub mod einstein;
pub mod error;
pub mod motion;
pub mod parallax;
pub mod separation;


pub use einstein::{
    einstein_angle, einstein_angle_from_timescale, einstein_timescale, finite_source_parameter,
    lens_mass_from_einstein_angle, relative_parallax, KAPPA_MAS_PER_SOLAR_MASS,
    MIN_RELATIVE_PROPER_MOTION_MAS_YR,
};
pub use error::{ensure_finite, LensingError};
pub use motion::{direction_from_angle, RelativeMotion, SkyMotion};
pub use parallax::MicrolensParallax;
pub use separation::{angular_separation, einstein_radius};
