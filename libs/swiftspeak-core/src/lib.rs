//! Core practice library shared by the backend.
//!
//! Provides:
//! - Answer scoring against a reference phrase (InDel similarity ratio)
//! - SM-2 style review scheduling
//! - Due-item selection
//! - Shared record types (Phrase, ReviewState, Grade, Lang)

pub mod error;
pub mod scheduler;
pub mod scoring;
pub mod selection;
pub mod types;

pub use error::{CoreError, Result};
pub use scheduler::{advance, Sm2};
pub use scoring::{evaluate, normalize, pass_grade, score, similarity, ScoreResult};
pub use selection::{select_due, DueItem};
pub use types::{Grade, Lang, Phrase, ReviewState};
