//! Reset-PIN email delivery.

mod simulated_smtp;

pub use simulated_smtp::SimulatedSmtpMailer;
