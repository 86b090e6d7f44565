pub mod appointments;
pub mod assistant;
pub mod comments;
pub mod vehicles;
