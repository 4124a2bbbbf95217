// Offer pipeline: salary breakdown -> HTML render -> delivery -> status update.

pub mod format;
pub mod handlers;
pub mod render;
pub mod salary;
pub mod sender;
