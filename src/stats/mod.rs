//! Statistics used by feature selection
//!
//! Pearson correlation for redundancy pruning, and an ordinary least squares
//! fit with Student-t p-values for significance pruning.

pub mod correlation;
pub mod distribution;
pub mod ols;

pub use self::correlation::{pearson, CorrelationMatrix};
pub use self::distribution::{betai, ln_gamma, t_two_tailed_p};
pub use self::ols::{OlsFit, OrdinaryLeastSquares};
