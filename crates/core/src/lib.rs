//! Core domain, ports and services for the orgdir directory service.
//!
//! Everything in this crate is backend-agnostic: storage and cache backends
//! live in the `orgdir` binary crate and plug in through the traits in
//! [`storage`] and [`cache`].

pub mod cache;
pub mod organisation;
pub mod service;
pub mod storage;
pub mod user;
pub mod validation;
