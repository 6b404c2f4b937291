//! Model artifact discovery and deserialization

mod codec;
mod resolver;

pub use codec::{decode_artifact, ModelSpec};
pub use resolver::{
    select_latest, ArtifactCandidate, ArtifactResolver, DEFAULT_ARTIFACT_EXTENSION,
    DEFAULT_ARTIFACT_PREFIX,
};
