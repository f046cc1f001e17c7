use serde::{Deserialize, Serialize};

/// Asset identifier — allocated sequentially by the registry at mint time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account identity — owners, buyers, and the seizing authority.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_display() {
        assert_eq!(format!("{}", AssetId(42)), "42");
    }

    #[test]
    fn principal_display() {
        let p = Principal::new("alice");
        assert_eq!(format!("{}", p), "alice");
    }

    #[test]
    fn asset_id_ordering() {
        assert!(AssetId(1) < AssetId(2));
    }

    #[test]
    fn serialization_roundtrip() {
        let asset = AssetId(7);
        let json = serde_json::to_string(&asset).unwrap();
        let restored: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, restored);

        let p = Principal::new("authority");
        let json = serde_json::to_string(&p).unwrap();
        let restored: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}
