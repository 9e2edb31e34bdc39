//! Persistence and event-sink collaborators for the library lending system.
//!
//! The domain core never talks to a database directly: it depends on the
//! repository traits defined here, which hide the storage representation.
//! Two implementations are provided — in-memory (tests, local runs) and
//! PostgreSQL — plus the fire-and-forget [`EventPublisher`] sink for
//! domain events.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod publisher;
pub mod repository;

pub use error::{Result, StoreError};
pub use memory::{InMemoryBookRepository, InMemoryLoanRepository, InMemoryMemberRepository};
pub use postgres::{
    PostgresBookRepository, PostgresLoanRepository, PostgresMemberRepository, run_migrations,
};
pub use publisher::{
    EventEnvelope, EventId, EventPublisher, InMemoryEventPublisher, TracingEventPublisher,
};
pub use repository::{BookRepository, LoanRepository, MemberRepository};
