//! Business logic services

pub mod auth;
pub mod dispatch;
pub mod donors;
pub mod requests;
pub mod sms;
pub mod sweep;

pub use auth::AuthService;
pub use dispatch::DispatchService;
pub use donors::DonorService;
pub use requests::RequestService;
pub use sms::{SmsClient, SmsError};
pub use sweep::{start_sweep_scheduler, SweepSchedulerState};
