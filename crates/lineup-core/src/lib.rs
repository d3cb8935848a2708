// Library root: the lineup assignment engine and the projection aggregator
// that feeds it. No I/O happens in this crate.

pub mod lineup;
pub mod projections;
pub mod roster;
