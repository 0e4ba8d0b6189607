pub mod auth;

pub mod profile;

pub mod students;

pub mod trainers;

pub mod managers;

pub mod public;

pub use auth::configure_auth_routes;
pub use managers::configure_manager_routes;
pub use profile::configure_profile_routes;
pub use public::configure_public_routes;
pub use students::configure_student_routes;
pub use trainers::configure_trainer_routes;
