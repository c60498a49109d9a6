pub mod photos;
pub mod ttf;
