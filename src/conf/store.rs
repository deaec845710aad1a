use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct S3StoreConfig {
    pub bucket: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "S3StoreConfig::default_region")]
    pub region: String,
}

impl S3StoreConfig {
    pub fn default_region() -> String {
        String::from("us-east-1")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocalStoreConfig {
    pub path: String,
    #[serde(default)]
    pub prefix: String,
}

/// Where the raw-data bucket lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub enum StoreConfig {
    #[serde(rename = "s3")]
    S3(S3StoreConfig),
    #[serde(rename = "local")]
    Local(LocalStoreConfig),
}

impl StoreConfig {
    pub fn prefix(&self) -> &str {
        match self {
            StoreConfig::S3(c) => &c.prefix,
            StoreConfig::Local(c) => &c.prefix,
        }
    }
}
