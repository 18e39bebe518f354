pub mod comments;
pub mod contact;
pub mod edge;
pub mod error;
pub mod likes;
pub mod newsletter;
pub mod repos;
pub mod stats;
pub mod validation;
pub mod views;
