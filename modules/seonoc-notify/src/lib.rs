pub mod backend;
pub mod email;
pub mod router;
pub mod telegram;

pub use backend::{ChatSender, EmailSender, NoopChat, NoopEmail};
pub use email::EmailClient;
pub use router::NotificationRouter;
pub use telegram::TelegramClient;
