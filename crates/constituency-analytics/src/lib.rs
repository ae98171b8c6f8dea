//! Segmentation and contestation analytics over constituency records
//!
//! This crate turns a read-only collection of
//! [`ConstituencyRecord`](constituency_model::ConstituencyRecord)s into the
//! tabular views a dashboard draws. It owns no I/O and no presentation.
//!
//! # Overview
//!
//! ## Segmentation Workflow
//!
//! 1. **Filter** ([`filter::RecordFilter`]): Select the cohort by country and region
//! 2. **Build Features** ([`feature_table::FeatureTable`]): Project records onto the
//!    clustering columns, keeping gaps as missing
//! 3. **Impute** ([`imputer::impute`]): Median fill numeric columns, mode fill categorical ones
//! 4. **Standardise** ([`normalization::Standardizer`]): Zero mean, unit variance per column
//! 5. **Cluster** ([`clustering::KMeans`]): Seeded k-means into five groups
//! 6. **Label** ([`segment::assign_segments`]): Map clusters onto [`segment::SegmentLabel`]s
//!
//! ## Contestation Workflow
//!
//! 1. **Build Features** with [`feature_table::ColumnManifest::contestation`]
//! 2. **Analyse** ([`contestation::analyze`]): Dominant party, runner-up and margins per seat
//!
//! ## Views
//!
//! [`view::Analytics::compute_view`] runs the workflow a given
//! [`view::AnalysisKind`] needs and returns a [`view::ResultBundle`]. Regional
//! vote totals and the demographic profile come from [`profile`].
//!
//! Every call recomputes from the records and the [`config::AnalyticsConfig`];
//! with the same inputs the output is identical.

pub use self::error::AnalyticsError;

pub mod clustering;
pub mod config;
pub mod contestation;
pub mod error;
pub mod feature_table;
pub mod filter;
pub mod imputer;
pub mod normalization;
pub mod profile;
pub mod segment;
pub mod view;
