//! Page extractors: each reads one kind of page through the DOM helpers in
//! [`dom`] or the embedded-JSON helpers in [`embedded`].

pub mod catalog;
pub mod course;
pub mod dom;
pub mod embedded;
pub mod lesson;
pub mod module;
