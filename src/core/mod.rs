//! Stateless services that apply user actions to a ledger snapshot and build
//! the views handed to collaborators.

pub mod services;
