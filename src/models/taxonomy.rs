use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "blogCount")]
    pub usage_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, alias = "blogCount")]
    pub usage_count: u32,
}

/// Join record the backend returns for a blog's tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogTag {
    pub tag: Tag,
}
