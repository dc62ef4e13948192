use serde::Deserialize;
use uuid::Uuid;

/// A roster entry as returned by the profile service. Only the identity
/// fields matter here; the rest of the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentRecord {
    /// Direct user identity, when the profile service exposes it.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Profile reference, resolvable through a secondary lookup.
    #[serde(default)]
    pub id_profile: Option<Uuid>,
}

/// Envelope every profile-service endpoint wraps its payload in.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEnvelope<T> {
    pub data: T,
}
