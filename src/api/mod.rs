pub mod client;
pub mod throttle;

pub use client::HaloApiClient;
pub use throttle::RequestWindow;
