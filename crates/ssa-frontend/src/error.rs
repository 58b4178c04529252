//! Error type for the frontend stand-in's recoverable edges. Structural
//! lowering failures stay `panic!`s in `ssa-build`; this enum only
//! covers requests against the frontend tables themselves that can
//! reasonably fail.

use alloc::string::String;

use ssa_ir::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendError {
    UnknownEntity(EntityId),
    MalformedDependencyRequest(String),
}

impl FrontendError {
    pub fn unknown_entity(id: EntityId) -> Self {
        FrontendError::UnknownEntity(id)
    }

    pub fn malformed_dependency_request(msg: impl Into<String>) -> Self {
        FrontendError::MalformedDependencyRequest(msg.into())
    }
}

impl core::fmt::Display for FrontendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrontendError::UnknownEntity(id) => write!(f, "unknown entity: {id}"),
            FrontendError::MalformedDependencyRequest(msg) => {
                write!(f, "malformed dependency request: {msg}")
            }
        }
    }
}

impl core::error::Error for FrontendError {}
