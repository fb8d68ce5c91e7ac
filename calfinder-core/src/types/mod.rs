/// Core types shared across all calfinder crates
pub mod feature;
pub mod nter;

pub use feature::FeatureClass;
pub use nter::{is_known_nter, KNOWN_NTER_TYPES};
