//! The record abstraction shared by every listing
//!
//! Records are immutable value objects: an update is always a full
//! replacement of the record with the same [`ListRecord::id`].

use super::sort::SortField;

/// A listable entity
///
/// The engine only ever looks at these four projections; everything else on
/// a record is opaque payload for the presentation layer.
pub trait ListRecord: Clone + Send + Sync + 'static {
    /// Unique identifier
    fn id(&self) -> &str;

    /// Name shown in the list and matched by search
    fn display_name(&self) -> &str;

    /// Numeric magnitude used for the default ordering
    fn metric(&self) -> Option<f64>;

    /// Sortable report/update date (ISO-8601 or lexically sortable)
    fn report_date(&self) -> Option<&str>;

    /// Name of `field` as understood by the remote API's sort parameter
    fn sort_key(field: SortField) -> &'static str;
}
