use std::fmt;

use serde::Serialize;

/// Opt-in/opt-out flag for preview API behavior, sent via `Asana-Enable` / `Asana-Disable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature(String);

impl Feature {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn new_task_subtypes() -> Self {
        Self::new("new_task_subtypes")
    }

    pub fn new_sections() -> Self {
        Self::new("new_sections")
    }

    pub fn string_ids() -> Self {
        Self::new("string_ids")
    }

    pub fn project_privacy_setting() -> Self {
        Self::new("project_privacy_setting")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn join_features(features: &[Feature]) -> String {
    features
        .iter()
        .map(Feature::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Query-shaping options. On reads they become `opt_fields`/`limit`/`offset`/`opt_pretty`
/// query parameters; on writes they travel as the `options` member of the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Options {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pretty: bool,
    #[serde(skip)]
    pub enable: Vec<Feature>,
    #[serde(skip)]
    pub disable: Vec<Feature>,
}

impl Options {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn enable(mut self, feature: Feature) -> Self {
        self.enable.push(feature);
        self
    }

    pub fn disable(mut self, feature: Feature) -> Self {
        self.disable.push(feature);
        self
    }

    /// Fills every unset field from `defaults`; explicitly set fields win.
    pub fn merged_with(&self, defaults: &Options) -> Options {
        Options {
            fields: if self.fields.is_empty() {
                defaults.fields.clone()
            } else {
                self.fields.clone()
            },
            limit: self.limit.or(defaults.limit),
            offset: self.offset.clone().or_else(|| defaults.offset.clone()),
            pretty: self.pretty || defaults.pretty,
            enable: if self.enable.is_empty() {
                defaults.enable.clone()
            } else {
                self.enable.clone()
            },
            disable: if self.disable.is_empty() {
                defaults.disable.clone()
            } else {
                self.disable.clone()
            },
        }
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.fields.is_empty() {
            pairs.push(("opt_fields".to_string(), self.fields.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = &self.offset {
            pairs.push(("offset".to_string(), offset.clone()));
        }
        if self.pretty {
            pairs.push(("opt_pretty".to_string(), "true".to_string()));
        }
        pairs
    }
}
