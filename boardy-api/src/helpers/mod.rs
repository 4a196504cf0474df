pub mod attempts;
pub mod cronofy;
pub mod phone;
pub mod session;
