use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Where a piece of element-set text came from
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    #[display(fmt = "cache")]
    Cache,
    #[display(fmt = "origin")]
    Origin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_forms() {
        assert_eq!(Provenance::Cache.to_string(), "cache");
        assert_eq!(
            serde_json::to_string(&Provenance::Origin).unwrap(),
            "\"origin\""
        );
    }
}
