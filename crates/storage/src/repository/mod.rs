pub mod calendar;
pub mod reference;
pub mod session;
pub mod user;
pub mod workout_log;
