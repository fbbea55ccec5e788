//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, together with the services that implement the
//! driving ports. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User (alias to `user::User`) — registered account as seen by the API.
//! - PasswordCredential — Argon2id password hash with verification.
//! - Token / TokenRecord — bearer token plaintext and its stored digest.
//! - Identity — anonymous or authenticated caller of a request.
//! - AuthorizationGuard — ownership checks for owned resources.
//! - Workout — owned workout aggregate with its ordered entries.

pub mod auth;
pub mod authorization;
pub mod error;
pub mod identity;
pub mod identity_service;
pub mod login_service;
pub mod password;
pub mod ports;
pub mod token;
pub mod trace_id;
pub mod user;
pub(crate) mod user_accounts_service;
pub mod workout;
pub mod workouts_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::authorization::{AuthorizationDecision, AuthorizationGuard, OwnershipDisclosure};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{
    BEARER_SCHEME, Identity, IdentityRejection, Unauthenticated, parse_bearer,
    require_authenticated,
};
pub use self::identity_service::TokenIdentityResolver;
pub use self::login_service::{DEFAULT_TOKEN_TTL_HOURS, TokenLoginService};
pub use self::password::{CredentialError, PasswordCredential, PasswordHashingCost};
pub use self::token::{
    IssuedToken, Token, TokenError, TokenHash, TokenRecord, TokenScope, UnknownTokenScope,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, ProfileUpdate, Registration, User, UserAccount, UserId, UserValidationError,
    Username,
};
pub use self::user_accounts_service::UserAccountsService;
pub use self::workout::{
    Workout, WorkoutDetails, WorkoutDraft, WorkoutEntry, WorkoutEntryDraft, WorkoutId,
    WorkoutPatch, WorkoutValidationError,
};
pub use self::workouts_service::WorkoutsService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use workout_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
