pub mod course;
pub mod db;
pub mod enrollment;
pub mod errors;
pub mod student;
