/// Chat session and message models
pub mod chat;
/// Retrieved knowledge documents
pub mod knowledge;
/// Meeting requests and booking outcomes
pub mod meeting;
/// Bookable time slots
pub mod time_slot;
