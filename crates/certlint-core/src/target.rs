//! Object kinds and the boundary to the decoder that produced them.
//!
//! The engine never parses bytes. A decoder crate supplies the structured
//! certificate, CRL and OCSP response types; it implements [`LintTarget`]
//! for each and groups the three under one [`ObjectModel`].

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of object a lint is affined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Certificate,
    RevocationList,
    OcspResponse,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 3] = [
        ObjectKind::Certificate,
        ObjectKind::RevocationList,
        ObjectKind::OcspResponse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Certificate => "certificate",
            ObjectKind::RevocationList => "revocation_list",
            ObjectKind::OcspResponse => "ocsp_response",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "certificate" | "cert" => Ok(ObjectKind::Certificate),
            "crl" | "revocation_list" => Ok(ObjectKind::RevocationList),
            "ocsp" | "ocsp_response" => Ok(ObjectKind::OcspResponse),
            _ => Err(EngineError::UnknownKind {
                kind: s.to_string(),
            }),
        }
    }
}

/// A decoded object the engine can lint.
pub trait LintTarget: Sync {
    /// Kind every value of this type belongs to.
    const KIND: ObjectKind;

    /// Instant compared against a lint's effective window: notBefore for a
    /// certificate, thisUpdate for a CRL, producedAt for an OCSP response.
    ///
    /// `None` places the object inside every window.
    fn issued_at(&self) -> Option<DateTime<Utc>>;
}

/// The three decoded types a registry is built for.
pub trait ObjectModel: Send + Sync + 'static {
    type Certificate: LintTarget;
    type RevocationList: LintTarget;
    type OcspResponse: LintTarget;
}

/// A borrowed object of any of the model's kinds.
pub enum Target<'a, M: ObjectModel> {
    Certificate(&'a M::Certificate),
    RevocationList(&'a M::RevocationList),
    OcspResponse(&'a M::OcspResponse),
}

impl<'a, M: ObjectModel> Target<'a, M> {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Target::Certificate(_) => ObjectKind::Certificate,
            Target::RevocationList(_) => ObjectKind::RevocationList,
            Target::OcspResponse(_) => ObjectKind::OcspResponse,
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Target::Certificate(o) => o.issued_at(),
            Target::RevocationList(o) => o.issued_at(),
            Target::OcspResponse(o) => o.issued_at(),
        }
    }
}

// Manual impls: a derive would demand `M: Clone`.
impl<M: ObjectModel> Clone for Target<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ObjectModel> Copy for Target<'_, M> {}
