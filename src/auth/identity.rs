//! The signed-in identity: a stable uid plus the display name used for
//! audit attribution.

use sha2::{Digest, Sha512};
use uuid::Uuid;

/// The audit label recorded for anonymous guest sessions.
pub const GUEST_LABEL: &str = "Anonim";

/// The identity a session acts as.
///
/// The uid scopes the transaction collection; the label is what the
/// attribution line shows. Neither is used for access control beyond
/// collection scoping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable identifier scoping the owner's collection.
    pub uid: String,
    /// Display name recorded as the actor label on writes.
    pub label: String,
}

impl Identity {
    /// The identity for an interactive sign-in with a display name.
    ///
    /// The uid is derived from the name, so signing in with the same name
    /// resumes the same collection across sessions and devices.
    pub fn named(display_name: &str) -> Self {
        let digest = Sha512::digest(display_name.trim().as_bytes());
        let uid = digest[..16]
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect();

        Self {
            uid,
            label: display_name.trim().to_owned(),
        }
    }

    /// A fresh anonymous identity with a random uid.
    ///
    /// Guest collections are not resumable by construction; a new guest
    /// session starts from a blank slate.
    pub fn guest() -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            label: GUEST_LABEL.to_owned(),
        }
    }
}
