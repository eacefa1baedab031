pub mod activity_rollup;
pub mod calendar_range;
