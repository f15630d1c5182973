//! Link graph and HITS authority/hub analysis.
//!
//! The [`graph::LinkGraph`] is built once per rebuild from every document's
//! outgoing links. [`hits::HubAuthorityScores`] refines authority and hub
//! scores over the links that resolve to indexed documents.

pub mod graph;
pub mod hits;
