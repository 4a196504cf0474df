pub mod contacts;
pub mod cronofy;
pub mod linkedin;
pub mod onboarding;
pub mod session;
pub mod teams;
