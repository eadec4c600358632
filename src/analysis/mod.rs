/// Analysis layer: per-panel aggregations over a [`FilteredView`].
///
/// Every function here is pure; the UI only draws what they return.
///
/// [`FilteredView`]: crate::data::filter::FilteredView

pub mod aggregate;
pub mod correlation;
pub mod panel;
pub mod summary;
