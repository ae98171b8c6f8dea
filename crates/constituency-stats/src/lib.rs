//! Small statistical helpers used by the constituency analytics pipeline.
//!
//! - [`descriptive`]: mean, median, population variance and standard deviation
//! - [`percentiles`]: nearest-rank percentiles and quartiles
//! - [`mode`]: most frequent value with first-encountered tie-breaking
//!
//! # Examples
//!
//! ```
//! use constituency_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(stats.mean, 2.5);
//! assert_eq!(stats.median, 2.5);
//! ```
//!
//! ```
//! use constituency_stats::mode::mode;
//!
//! assert_eq!(mode(["b", "a", "a", "b"]), Some("b"));
//! ```

pub mod descriptive;
pub mod mode;
pub mod percentiles;
