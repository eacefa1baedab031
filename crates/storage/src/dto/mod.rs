pub mod account;
pub mod calendar;
pub mod exercise;
pub mod workout;
