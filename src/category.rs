use serde::{Deserialize, Serialize};
use std::fmt;

/// Product families with distinct production lead times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Bread,
    #[default]
    Other,
}

impl ProductCategory {
    pub const BREAD_NAME: &'static str = "Pain";
    pub const OTHER_NAME: &'static str = "Autre";

    /// Map a catalog category name. Anything that is not bread gets the generic lead time.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case(Self::BREAD_NAME) {
            ProductCategory::Bread
        } else {
            ProductCategory::Other
        }
    }

    /// The most demanding category among the cart lines.
    pub fn for_cart<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = ProductCategory>,
    {
        if lines.into_iter().any(|c| c == ProductCategory::Bread) {
            ProductCategory::Bread
        } else {
            ProductCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Bread => Self::BREAD_NAME,
            ProductCategory::Other => Self::OTHER_NAME,
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ProductCategory {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl From<String> for ProductCategory {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl From<ProductCategory> for String {
    fn from(value: ProductCategory) -> Self {
        value.as_str().to_string()
    }
}
