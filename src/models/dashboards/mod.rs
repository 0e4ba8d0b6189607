//! 各角色首页和统计页的视图模型

pub mod manager;
pub mod student;
pub mod trainer;

pub use manager::*;
pub use student::*;
pub use trainer::*;
