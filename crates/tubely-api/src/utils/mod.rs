pub mod extract;
pub mod upload;
