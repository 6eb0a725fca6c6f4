//! # Portfolio Assistant Calendar
//!
//! The external-calendar boundary and the scheduling core built on top of
//! it: a Google-Calendar-shaped REST client (free/busy query and event
//! insert), the availability oracle, the business-hour slot finder, and the
//! check-then-act scheduler.
//!
//! The calendar itself is a third-party-owned shared resource; the only
//! concurrency discipline available is re-verifying availability
//! immediately before booking.

/// Injected credential abstraction for the calendar API
pub mod auth;
/// REST client for the external calendar service
pub mod client;
/// Mock implementations of the boundary traits for tests
pub mod mock;
/// Free/busy-backed availability checks
pub mod oracle;
/// Check-then-act meeting booking
pub mod scheduler;
/// Business-hour slot enumeration
pub mod slots;

pub use auth::{Credential, CredentialProvider, RefreshingTokenProvider, StaticTokenProvider};
pub use client::{CalendarApi, EventRequest, GoogleCalendarClient};
pub use oracle::{AvailabilityOracle, FreeBusyOracle};
pub use scheduler::Scheduler;
pub use slots::SlotFinder;
