pub mod notice;
pub mod pagination;
pub mod response;

pub use notice::*;
pub use pagination::*;
pub use response::*;
