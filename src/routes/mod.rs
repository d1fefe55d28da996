pub mod auth;

pub mod subjects;

pub mod students;

pub mod grades;

pub mod photos;

pub mod system;

pub use auth::configure_auth_routes;
pub use grades::configure_grades_routes;
pub use photos::configure_photo_routes;
pub use students::configure_students_routes;
pub use subjects::configure_subjects_routes;
pub use system::configure_system_routes;
