//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc. Ports mark the
//! hexagonal boundary; services implement the driving ports on top of the
//! driven ones.

mod access;

pub mod email;
pub mod error;
pub mod estimate;
pub mod ids;
pub mod lead;
pub mod leads_service;
pub mod mail_service;
pub mod ports;
pub mod pricing;
pub mod pricing_service;
pub mod selection;
pub mod selection_service;
pub mod team;
pub mod teams_service;
pub mod trace_id;

pub use self::email::{
    EmailAccount, EmailMessage, OutgoingMail, REFRESH_WINDOW_SECS, SendOutcome, TokenGrant,
    TokenSecret, needs_refresh, new_internet_message_id,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::estimate::{Estimate, PANEL_OUTPUT_KW};
pub use self::ids::{InstallerGroupId, InvalidId, LeadId, TeamId, UserId};
pub use self::lead::{
    ImportRow, Lead, LeadNote, LeadStatus, LeadTask, PLACEHOLDER_FIELD, PLACEHOLDER_NAME,
    UnknownStatusCode,
};
pub use self::pricing::{
    PriceBreakdown, PriceCategory, PriceItem, PriceRow, PriceTable, UnknownCategory,
    VAT_MULTIPLIER, breakdown, coerce_amount, round2,
};
pub use self::selection::WorkspaceSelection;
pub use self::team::{
    InstallerGroup, Team, TeamMember, TeamRole, TeamScope, UnknownRole,
};
pub use self::leads_service::LeadsService;
pub use self::mail_service::MailService;
pub use self::pricing_service::PricingService;
pub use self::selection_service::SelectionService;
pub use self::teams_service::TeamsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use solarcrm_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
