//! District progress normalization and aggregation.
//!
//! Raw feed rows are cleaned into [`ProgressRecord`]s, each tagged with a
//! [`Category`], and then rolled up into the KPI [`ProgressSummary`] and
//! the comparison-chart groups.

pub mod category;
pub mod normalize;
pub mod summary;
pub mod types;
pub mod utility;

pub use category::{Band, Category};
pub use normalize::normalize;
pub use summary::comparison_groups;
pub use types::{ComparisonGroup, ComparisonRow, Normalized, ProgressRecord, ProgressSummary, RawRow};
