//! Statistics for inspecting per-user attribute distributions.
//!
//! - [`summary`]: Count, extremes, mean, median, standard deviation and percentiles
//! - [`histogram`]: Equal-width frequency distributions for display
//!
//! # Examples
//!
//! ## Summarizing values
//!
//! ```
//! use friendgraph_stats::summary::Summary;
//!
//! let summary = Summary::new([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
//! assert_eq!(summary.mean, 3.0);
//! assert_eq!(summary.median, 3.0);
//! ```
//!
//! ## Creating a histogram
//!
//! ```
//! use friendgraph_stats::histogram::Histogram;
//!
//! let histogram = Histogram::new([0.5, 1.5, 1.7, 3.0], 3, None);
//! assert_eq!(histogram.counts(), vec![1, 2, 1]);
//! ```

pub mod histogram;
pub mod summary;
