//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod instance_repo;
pub mod location_repo;
pub mod modality_repo;
pub mod race_repo;
pub mod session_repo;

pub use category_repo::CategoryRepo;
pub use instance_repo::InstanceRepo;
pub use location_repo::LocationRepo;
pub use modality_repo::ModalityRepo;
pub use race_repo::RaceRepo;
pub use session_repo::SessionRepo;
