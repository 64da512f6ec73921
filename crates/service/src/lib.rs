pub mod course_service;
pub mod errors;
pub mod student_service;

#[cfg(test)]
mod test_support;
