pub mod auth;
pub mod event;

pub use auth::{
    is_well_formed_token, AuthResponse, LoginRequest, Provenance, Session, SignupRequest, TokenResponse,
    Tokens, UserProfile, UserRole,
};
pub use event::ActivityEvent;
