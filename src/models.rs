pub mod appointment;
pub mod comment;
pub mod vehicle;

pub use appointment::{Appointment, AppointmentStatus, AppointmentTag, NewAppointment};
pub use comment::VehicleComment;
pub use vehicle::{NewVehicleInShop, VehicleInShop, VehicleInShopTag};
