pub mod backend;
pub mod frame;
pub mod parallel;
pub mod roi;
pub mod sequential;
