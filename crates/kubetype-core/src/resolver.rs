//! `(apiVersion, kind)` to canonical type name resolution
//!
//! The registry names its types after the client naming convention, which
//! is not a pure function of the manifest header: most types are
//! `{version}{kind}`, some carry their API group (`EventsV1Event`) and some
//! carry an explicit core marker (`CoreV1Event`). Resolution renders an
//! ordered list of candidate names and picks the first one registered.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{KubetypeError, Result};
use crate::kind::KindResolver;
use crate::registry::SchemaRegistry;
use crate::version::{group_prefix, version_token};

/// One way of spelling a candidate type name
///
/// Written in configuration as `plain`, `groupPrefixed` or `prefixed: <Prefix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatternRepr", into = "PatternRepr")]
pub enum CandidatePattern {
    /// `{version}{kind}`
    Plain,
    /// `{groupPrefix}{version}{kind}`, skipped when the group has no prefix
    GroupPrefixed,
    /// `{prefix}{version}{kind}` with a fixed prefix
    Prefixed(String),
}

/// Configuration form of a pattern: a bare name or a one-key mapping
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Named(String),
    Prefixed { prefixed: String },
}

impl TryFrom<PatternRepr> for CandidatePattern {
    type Error = String;

    fn try_from(repr: PatternRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PatternRepr::Named(name) => match name.as_str() {
                "plain" => Ok(Self::Plain),
                "groupPrefixed" => Ok(Self::GroupPrefixed),
                other => Err(format!(
                    "unknown candidate pattern `{}`, expected plain, groupPrefixed or prefixed: <Prefix>",
                    other
                )),
            },
            PatternRepr::Prefixed { prefixed } => Ok(Self::Prefixed(prefixed)),
        }
    }
}

impl From<CandidatePattern> for PatternRepr {
    fn from(pattern: CandidatePattern) -> Self {
        match pattern {
            CandidatePattern::Plain => Self::Named("plain".to_string()),
            CandidatePattern::GroupPrefixed => Self::Named("groupPrefixed".to_string()),
            CandidatePattern::Prefixed(prefixed) => Self::Prefixed { prefixed },
        }
    }
}

impl CandidatePattern {
    /// Default order for the Kubernetes client naming convention
    pub fn defaults() -> Vec<Self> {
        vec![Self::Plain, Self::GroupPrefixed, Self::Prefixed("Core".to_string())]
    }

    fn render(&self, version: &str, kind: &str, group: &str) -> Option<String> {
        match self {
            Self::Plain => Some(format!("{}{}", version, kind)),
            Self::GroupPrefixed if group.is_empty() => None,
            Self::GroupPrefixed => Some(format!("{}{}{}", group, version, kind)),
            Self::Prefixed(prefix) => Some(format!("{}{}{}", prefix, version, kind)),
        }
    }
}

/// Resolves manifest headers to registered type names
pub struct TypeNameResolver {
    kinds: KindResolver,
    patterns: Vec<CandidatePattern>,
}

impl TypeNameResolver {
    /// Resolver using the default candidate order
    pub fn new(registry: Arc<dyn SchemaRegistry>) -> Self {
        Self::with_patterns(registry, CandidatePattern::defaults())
    }

    /// Resolver using a custom candidate order
    pub fn with_patterns(registry: Arc<dyn SchemaRegistry>, patterns: Vec<CandidatePattern>) -> Self {
        Self {
            kinds: KindResolver::new(registry),
            patterns,
        }
    }

    /// Ordered, de-duplicated candidate type names for a manifest header
    ///
    /// Fails with `UnknownKind` when the kind itself is not registered.
    pub fn candidates(&self, api_version: &str, kind: &str) -> Result<Vec<String>> {
        let kind = self.kinds.resolve(kind)?;
        let version = version_token(api_version);
        let group = group_prefix(api_version);

        let mut candidates: Vec<String> = Vec::with_capacity(self.patterns.len());
        for pattern in &self.patterns {
            if let Some(name) = pattern.render(&version, &kind, &group) {
                if !candidates.contains(&name) {
                    candidates.push(name);
                }
            }
        }
        Ok(candidates)
    }

    /// Resolve to the first registered candidate
    ///
    /// ```
    /// use std::sync::Arc;
    /// use kubetype_core::{Catalog, TypeNameResolver};
    ///
    /// let resolver = TypeNameResolver::new(Arc::new(Catalog::builtin().unwrap()));
    /// assert_eq!(resolver.resolve("apps/v1", "Deployment").unwrap(), "V1Deployment");
    /// assert_eq!(resolver.resolve("v1", "Event").unwrap(), "CoreV1Event");
    /// ```
    pub fn resolve(&self, api_version: &str, kind: &str) -> Result<String> {
        let candidates = self.candidates(api_version, kind)?;
        let registry = self.kinds.registry();

        for candidate in &candidates {
            if registry.has_type(candidate) {
                tracing::debug!(api_version, kind, type_name = %candidate, "resolved type name");
                return Ok(candidate.clone());
            }
            tracing::debug!(candidate = %candidate, "candidate not registered");
        }

        Err(KubetypeError::UnresolvableType {
            kind: kind.to_string(),
            api_version: api_version.to_string(),
            candidates,
        })
    }

    /// The kind resolver backing this resolver
    pub fn kind_resolver(&self) -> &KindResolver {
        &self.kinds
    }

    /// Candidate patterns in the order they are tried
    pub fn patterns(&self) -> &[CandidatePattern] {
        &self.patterns
    }
}
