//! Net Module - Collaborator contracts for the backend and realtime channel
//!
//! - **Api** - `{ data, error }` envelope and endpoint traits
//! - **Socket** - Named event registry with scoped subscriptions

pub mod api;
pub mod socket;

pub use api::{ApiError, ApiResponse, RewardApi, ResendTicket, VerificationApi};
pub use socket::{decode_payload, SocketChannel, SocketMessage, Subscription};
