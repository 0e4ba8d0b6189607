pub mod enrollments;
pub mod payments;
pub mod progress;
pub mod ratings;

pub use enrollments::*;
pub use payments::*;
pub use progress::*;
pub use ratings::*;
