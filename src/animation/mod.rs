pub mod ease;
pub mod layout;
pub mod timing;
