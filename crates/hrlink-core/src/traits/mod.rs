//! Collaborator traits (ports)

mod collaborators;

pub use collaborators::{CollabResult, MessageStore, SessionVerifier, UserDirectory};
