//! Domain aggregates exposed by the back-office service layer.

pub mod admin;
pub mod astrologer;
pub mod consultation;
pub mod puja;
pub mod report;
pub mod route;
pub mod slot;
pub mod types;
