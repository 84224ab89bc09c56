pub mod assets;
pub mod contact;
pub mod home;
pub mod json_error;
pub mod system;
