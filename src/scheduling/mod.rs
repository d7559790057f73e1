pub mod conflict;
pub mod slots;
pub mod window;
