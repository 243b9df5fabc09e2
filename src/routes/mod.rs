pub mod export;
pub mod location;
pub mod page;
pub mod visits;
