/// Chat session endpoints
pub mod chat;
/// Health and version endpoints
pub mod health;
/// Meeting booking endpoints
pub mod meetings;
/// Free-slot listing endpoints
pub mod slots;
