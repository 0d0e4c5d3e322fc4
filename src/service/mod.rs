//! Entity services: domain rules plus cache-aside orchestration on top of
//! the persistence traits.

pub mod comments;
pub mod companies;
pub mod error;
pub mod posts;
pub mod reservations;
pub mod trips;

pub use comments::CommentService;
pub use companies::CompanyService;
pub use error::AccessError;
pub use posts::PostService;
pub use reservations::ReservationService;
pub use trips::TripService;
