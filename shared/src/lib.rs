//! Shared types for the DineBook reservation engine
//!
//! Common types used by the booking server (and any future client crates):
//! domain models, request/response DTOs, serde helpers and time utilities.

pub mod models;
pub mod request;
pub mod response;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Booking, BookingStatus, DiningTable, Restaurant};
pub use request::{
    AvailabilityQuery, CancelBookingRequest, CreateBookingRequest, CreateRestaurantRequest,
    TablePayload, UpdateTableRequest,
};
pub use response::{AvailabilityEntry, BookingView, MessageResponse, TableAvailability, TableView};
