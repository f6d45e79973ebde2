//! Smart codes: versioned classification strings.
//!
//! A smart code has the shape `VENDOR.DOMAIN.KIND.SUBTYPE.vN`, e.g.
//! `EVB.EVENTS.EVENT.WEBINAR.v1`. Once a subtype has been assigned a code,
//! that code is immutable; a breaking change to the classified shape means
//! a new `vN`, not a mutation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A parsed, validated smart code.
///
/// Serializes as its string form. Construction goes through [`SmartCode::new`]
/// or `FromStr`, both of which enforce the five-segment shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct SmartCode {
    vendor: String,
    domain: String,
    kind: String,
    subtype: String,
    version: u32,
}

impl SmartCode {
    /// Build a smart code from its segments.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSmartCode`] if any segment is empty, a
    /// segment contains characters outside `[A-Z0-9_]`, or `version` is 0.
    pub fn new(
        vendor: &str,
        domain: &str,
        kind: &str,
        subtype: &str,
        version: u32,
    ) -> Result<Self, CoreError> {
        let code = format!("{vendor}.{domain}.{kind}.{subtype}.v{version}");
        for (label, segment) in [
            ("vendor", vendor),
            ("domain", domain),
            ("kind", kind),
            ("subtype", subtype),
        ] {
            if segment.is_empty() {
                return Err(CoreError::InvalidSmartCode {
                    code,
                    reason: format!("empty {label} segment"),
                });
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(CoreError::InvalidSmartCode {
                    code,
                    reason: format!("{label} segment '{segment}' must be [A-Z0-9_]"),
                });
            }
        }
        if version == 0 {
            return Err(CoreError::InvalidSmartCode {
                code,
                reason: "version must be >= 1".into(),
            });
        }
        Ok(Self {
            vendor: vendor.to_string(),
            domain: domain.to_string(),
            kind: kind.to_string(),
            subtype: subtype.to_string(),
            version,
        })
    }

    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }
}

impl FromStr for SmartCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('.').collect();
        let [vendor, domain, kind, subtype, version] = segments.as_slice() else {
            return Err(CoreError::InvalidSmartCode {
                code: s.to_string(),
                reason: format!("expected 5 segments, got {}", segments.len()),
            });
        };
        let version = version
            .strip_prefix('v')
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| CoreError::InvalidSmartCode {
                code: s.to_string(),
                reason: format!("version segment '{version}' must be vN"),
            })?;
        Self::new(vendor, domain, kind, subtype, version)
    }
}

impl TryFrom<String> for SmartCode {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SmartCode> for String {
    fn from(code: SmartCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for SmartCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.v{}",
            self.vendor, self.domain, self.kind, self.subtype, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn roundtrip_display_parse() {
        let code = SmartCode::new("EVB", "EVENTS", "EVENT", "WEBINAR", 1).unwrap();
        assert_eq!(code.to_string(), "EVB.EVENTS.EVENT.WEBINAR.v1");
        let parsed: SmartCode = "EVB.EVENTS.EVENT.WEBINAR.v1".parse().unwrap();
        assert_eq!(parsed, code);
    }

    #[test]
    fn serde_uses_string_form() {
        let code: SmartCode = "EVB.EVENTS.INVITE.STANDARD.v2".parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, r#""EVB.EVENTS.INVITE.STANDARD.v2""#);
        let back: SmartCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version(), 2);
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = "EVB.EVENTS.EVENT.v1".parse::<SmartCode>().unwrap_err();
        assert!(err.to_string().contains("expected 5 segments"));
    }

    #[test]
    fn rejects_lowercase_segment() {
        assert!(SmartCode::new("evb", "EVENTS", "EVENT", "WEBINAR", 1).is_err());
    }

    #[test]
    fn rejects_version_zero() {
        assert!(SmartCode::new("EVB", "EVENTS", "EVENT", "WEBINAR", 0).is_err());
    }

    #[test]
    fn rejects_malformed_version_segment() {
        assert!("EVB.EVENTS.EVENT.WEBINAR.1".parse::<SmartCode>().is_err());
        assert!(
            "EVB.EVENTS.EVENT.WEBINAR.vX"
                .parse::<SmartCode>()
                .is_err()
        );
    }
}
