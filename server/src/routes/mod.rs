pub mod admin;
pub mod blogs;
pub mod contact;
pub mod rating;
pub mod survey;
pub mod workers;
