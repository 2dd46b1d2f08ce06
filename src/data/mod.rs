//! Data loading and splitting
//!
//! This module reads labeled CSV files into a [`FeatureMatrix`](crate::core::FeatureMatrix)
//! and splits them into training and held-out halves.

pub mod csv;
pub mod split;

pub use self::csv::*;
pub use self::split::*;
