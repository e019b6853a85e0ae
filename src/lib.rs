//! # Vecino (Community Portal Auth Client)
//!
//! `vecino` is the command-line client for a community portal's identity
//! API. It drives the multi-step authentication flows — registration with
//! an emailed one-time code, login, password recovery — and keeps the
//! resident session in a single-writer in-memory store.
//!
//! ## Flows
//!
//! Each flow is an explicit state machine: ordered collection steps, a
//! `Checking` sub-state while a remote gate (availability pre-check, code
//! request, account creation) is outstanding, and a terminal `Completed`
//! state. Field validation is local and synchronous; only uniqueness and
//! code verification touch the network.
//!
//! ## Identity documents
//!
//! Accounts are keyed by email plus a Chilean RUT. The RUT codec cleans
//! free-form input to `body-checkDigit`, validates the weighted modulo-11
//! check digit, and formats for display with es-CL period grouping.
//!
//! ## Session
//!
//! The transport credential is an opaque cookie owned by the HTTP client;
//! the in-memory store only ever holds non-sensitive identity metadata.

pub mod api;
pub mod cli;
pub mod vecino;
