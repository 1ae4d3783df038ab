//! # Gallery Core
//!
//! Client-side state for a remote image list.
//!
//! ## Overview
//!
//! - [`models::ImageRecord`] - one entry of image metadata
//! - [`api::ImageApi`] - the single `GET` against the list endpoint
//! - [`store::ImageStore`] - observable holder of the records plus
//!   loading/error flags, with lookup by identifier
//!
//! The store is built on the bridge [`HttpClient`](bridge_traits::HttpClient)
//! so hosts can inject their own transport; with the `desktop-shims` feature a
//! reqwest-based client is used by default.

pub mod api;
pub mod error;
pub mod models;
pub mod store;

pub use api::ImageApi;
pub use error::{GalleryError, Result};
pub use models::ImageRecord;
pub use store::{ImageStore, ImageStoreState, FALLBACK_ERROR_MESSAGE};
