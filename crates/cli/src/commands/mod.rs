pub mod dump;
pub mod generate;
pub mod sign;
pub mod verify;
