pub mod advance;
pub mod gate;
pub mod init;
pub mod iterate;
pub mod jump;
pub mod note;
pub mod scaffold;
pub mod status;
