/// Chat sessions and grounded replies
pub mod chat;
/// Meeting booking
pub mod meetings;
/// Free-slot listing
pub mod slots;
