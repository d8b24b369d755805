//! Deserializable codec configuration.
//!
//! These shapes are meant to be read from a config file (for example the JSON
//! settings of the service that fetches records) and converted into a
//! [crate::mii::MiiCodec].

use serde::{Deserialize, Serialize};

use crate::mii::{ChecksumPolicy, MiiCodec};

/// Checksum handling on decode.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicyDef {
    /// Do not compare the stored checksum.
    Ignore,
    /// Log a warning on mismatch.
    Warn,
    /// Fail the decode on mismatch.
    Reject,
}

/// Top-level codec settings. The policy has no default and must be spelled out.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CodecConfigDef {
    pub checksum_policy: ChecksumPolicyDef,
}

impl From<ChecksumPolicyDef> for ChecksumPolicy {
    fn from(value: ChecksumPolicyDef) -> Self {
        match value {
            ChecksumPolicyDef::Ignore => ChecksumPolicy::Ignore,
            ChecksumPolicyDef::Warn => ChecksumPolicy::Warn,
            ChecksumPolicyDef::Reject => ChecksumPolicy::Reject,
        }
    }
}

impl From<CodecConfigDef> for MiiCodec {
    fn from(value: CodecConfigDef) -> Self {
        MiiCodec::new(value.checksum_policy.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mii::{MiiRecord, tests::FIXTURE};

    #[test]
    fn test_config_from_json() {
        let def: CodecConfigDef =
            serde_json::from_str(r#"{ "checksum_policy": "reject" }"#).unwrap();
        let codec = MiiCodec::from(def);
        assert_eq!(codec.checksum_policy(), ChecksumPolicy::Reject);
    }

    #[test]
    fn test_config_requires_policy() {
        assert!(serde_json::from_str::<CodecConfigDef>("{}").is_err());
    }

    #[test]
    fn test_record_json_round_trip() {
        let mii = MiiRecord::decode(&FIXTURE, ChecksumPolicy::Reject).unwrap();
        let json = serde_json::to_string(&mii).unwrap();
        let back: MiiRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mii);
    }
}
