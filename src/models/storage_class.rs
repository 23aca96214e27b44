use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Object storage class applied to buckets and blobs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum StorageClass {
    #[default]
    Standard,
    Nearline,
    Coldline,
    Archive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_wire_names() {
        assert_eq!(StorageClass::Standard.to_string(), "STANDARD");
        assert_eq!(StorageClass::Coldline.to_string(), "COLDLINE");
        assert_eq!(StorageClass::from_str("nearline").unwrap(), StorageClass::Nearline);
        assert_eq!(
            serde_json::to_string(&StorageClass::Archive).unwrap(),
            "\"ARCHIVE\""
        );
    }

    #[test]
    fn test_unknown_class_is_a_parse_error() {
        assert_eq!(
            StorageClass::from_str("glacier"),
            Err(strum::ParseError::VariantNotFound)
        );
    }
}
