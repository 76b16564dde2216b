//! Registry domain - identities and registrations of cacheable members

mod identity;
mod registration;

pub use identity::{MemberId, OwnerType};
pub use registration::{Computation, Instance, Registration, RegistrationBuilder};
