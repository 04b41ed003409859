/// Registration and login
pub mod auth;
/// Booking creation and listings
pub mod bookings;
/// Available slot listing
pub mod slots;
