//! Data Transfer Objects for REST request/response serialization.
//!
//! Prices are serialized as JSON strings to keep their exact decimal
//! value.

pub mod common_dto;
pub mod round_dto;
pub mod slack_dto;
pub mod stats_dto;

pub use common_dto::*;
pub use round_dto::*;
pub use slack_dto::*;
pub use stats_dto::*;
