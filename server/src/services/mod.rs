pub mod session;
pub mod verify;
