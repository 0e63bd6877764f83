mod structs;

pub use structs::{DEFAULT_MAX_AGE_DAYS, EventCache};
