pub mod error;
pub mod id;
pub mod payment;
pub mod provider;
