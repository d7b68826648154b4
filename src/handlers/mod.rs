// handlers/mod.rs - one module per resource, mounted by `routes::app`

pub mod disciplines;
pub mod grades;
pub mod groups;
pub mod students;
pub mod system;
pub mod teachers;
pub mod users;
pub mod utils;
