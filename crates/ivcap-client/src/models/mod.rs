//! Data-transfer models for the IVCAP API.
//!
//! Every model carries an explicit `additional_properties` side-mapping:
//! input keys that match no known field are captured on deserialization
//! and re-emitted on serialization, so the client stays compatible with
//! server-side schema additions.

mod artifact;
mod errors;
mod service;

pub use artifact::{ArtifactList, ArtifactListItem, ArtifactStatus};
pub use errors::{
    InvalidParameterValue, InvalidScopes, NotImplemented, ResourceAlreadyCreated, ResourceNotFound,
};
pub use service::{
    BasicWorkflow, MetadataEntry, NavLinks, ParameterDef, ParameterOpt, Reference, ResourceRange,
    ServiceDescription, ServiceList, ServiceListItem, ServiceStatus, Workflow,
};
