mod exercise;
mod logged_set;
mod option;
mod run;
mod user;

pub use exercise::Exercise;
pub use logged_set::LoggedSet;
pub use option::{RepOption, SetOption, WeightOption};
pub use run::{Run, RunDistance, RunDuration, RunValidationError};
pub use user::User;
