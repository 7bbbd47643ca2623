//! Row models and read-time views.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Where list views resolve foreign keys, a flat populated list-item struct
//! - A `url()` helper giving the entity's canonical detail path

pub mod category;
pub mod instance;
pub mod location;
pub mod modality;
pub mod race;
pub mod session;
