pub mod entities;
pub mod error;
pub mod i18n;
pub mod locale;
pub mod slug;
pub mod text;
