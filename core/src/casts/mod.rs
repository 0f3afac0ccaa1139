//! Cast observation
//!
//! ```text
//!   snapshot (active casts)          previous records
//!            │                              │
//!            └──────────► CastIngestor ◄────┘
//!                              │
//!                 Started / Progressed / Ended
//!                              │
//!                              ▼
//!                  CastEventHandler (classifier)
//! ```

mod events;
mod ingestor;
mod record;


pub use events::{CastEvent, CastEventHandler, EndReason};
pub use ingestor::{CastIngestor, IngestOutcome};
pub use record::{CastCategory, CastKey, CastRecord, ObservedCast};
