pub mod avalanche;
pub mod calendar;
