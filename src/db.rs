pub mod store;
pub use store::{AppointmentStore, CommentStore, VehicleStore};

pub mod appointment_repo;
pub use appointment_repo::AppointmentRepository;
pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod comment_repo;
pub use comment_repo::CommentRepository;

pub mod memory;
pub use memory::MemoryStore;
