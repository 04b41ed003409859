//! Business operations behind the HTTP handlers. Each function takes its
//! collaborators explicitly so it can run against any [`clinic_db::Store`].

pub mod auth;
pub mod booking;
