//! Redirect and alias table.
//!
//! Rules come from `[[redirects]]` in `config.toml` and are consulted by the
//! routing layer before anything else runs. Evaluation is an ordered scan:
//! the first rule whose source matches wins.
//!
//! A rule's source is either an exact path or an anchored regex:
//!
//! ```toml
//! [[redirects]]
//! source = "/phq9"                  # exact string equality
//! destination = "/phq-9-depression-test"
//! permanent = true
//!
//! [[redirects]]
//! pattern = "/tests/(.+)"           # whole-path regex
//! destination = "/${1}-test"        # capture groups expand into the target
//! permanent = false
//! ```
//!
//! Permanent rules are served as 308 and temporary ones as 307, which keeps
//! the request method intact and tells crawlers whether to move link equity.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedirectError {
    #[error("Redirect to {0} sets both `source` and `pattern`")]
    AmbiguousSource(String),
    #[error("Redirect to {0} needs a `source` or a `pattern`")]
    MissingSource(String),
    #[error("Invalid redirect pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("Redirect destination must be an absolute path or URL: {0}")]
    InvalidDestination(String),
    #[error("Redirect source must start with '/': {0}")]
    InvalidSource(String),
    #[error("Redirect from {0} points at itself")]
    SelfRedirect(String),
}

/// A redirect as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedirectEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub destination: String,
    pub permanent: bool,
}

impl RedirectEntry {
    pub fn exact(source: &str, destination: &str, permanent: bool) -> Self {
        Self {
            source: Some(source.to_string()),
            pattern: None,
            destination: destination.to_string(),
            permanent,
        }
    }

    pub fn pattern(pattern: &str, destination: &str, permanent: bool) -> Self {
        Self {
            source: None,
            pattern: Some(pattern.to_string()),
            destination: destination.to_string(),
            permanent,
        }
    }
}

/// What a rule matches against.
#[derive(Debug, Clone)]
pub enum RedirectSource {
    Exact(String),
    /// Compiled with `^(?:...)$` so it must cover the whole path.
    Pattern(Regex),
}

impl RedirectSource {
    /// The source as authored, for display.
    pub fn as_str(&self) -> &str {
        match self {
            RedirectSource::Exact(path) => path,
            RedirectSource::Pattern(re) => {
                let anchored = re.as_str();
                anchored
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(anchored)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RedirectRule {
    pub source: RedirectSource,
    pub destination: String,
    pub permanent: bool,
}

impl RedirectRule {
    /// Compile a config entry into a rule.
    pub fn compile(entry: &RedirectEntry) -> Result<Self, RedirectError> {
        let destination = entry.destination.trim();
        if !(destination.starts_with('/')
            || destination.starts_with("https://")
            || destination.starts_with("http://"))
        {
            return Err(RedirectError::InvalidDestination(entry.destination.clone()));
        }

        let source = match (&entry.source, &entry.pattern) {
            (Some(_), Some(_)) => {
                return Err(RedirectError::AmbiguousSource(entry.destination.clone()));
            }
            (None, None) => return Err(RedirectError::MissingSource(entry.destination.clone())),
            (Some(path), None) => {
                if !path.starts_with('/') {
                    return Err(RedirectError::InvalidSource(path.clone()));
                }
                if path == destination {
                    return Err(RedirectError::SelfRedirect(path.clone()));
                }
                RedirectSource::Exact(path.clone())
            }
            (None, Some(pattern)) => {
                let anchored = format!("^(?:{pattern})$");
                let re = Regex::new(&anchored).map_err(|source| RedirectError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                RedirectSource::Pattern(re)
            }
        };

        Ok(Self {
            source,
            destination: destination.to_string(),
            permanent: entry.permanent,
        })
    }

    pub fn status_code(&self) -> u16 {
        status_for(self.permanent)
    }

    /// Destination for `path` if this rule matches it.
    fn apply(&self, path: &str) -> Option<String> {
        match &self.source {
            RedirectSource::Exact(source) => (source == path).then(|| self.destination.clone()),
            RedirectSource::Pattern(re) => re.captures(path).map(|caps| {
                let mut target = String::new();
                caps.expand(&self.destination, &mut target);
                target
            }),
        }
    }
}

fn status_for(permanent: bool) -> u16 {
    if permanent { 308 } else { 307 }
}

/// A resolved redirect handed to the routing layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub destination: String,
    pub permanent: bool,
}

impl Redirect {
    /// HTTP status for this redirect: 308 permanent, 307 temporary.
    pub fn status_code(&self) -> u16 {
        status_for(self.permanent)
    }
}

/// Ordered redirect rules. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
}

impl RedirectTable {
    pub fn from_config(entries: &[RedirectEntry]) -> Result<Self, RedirectError> {
        let rules = entries
            .iter()
            .map(RedirectRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rules = rules.len(), "redirect table compiled");
        Ok(Self { rules })
    }

    /// First rule matching `path`, or `None` to fall through to normal routing.
    pub fn resolve(&self, path: &str) -> Option<Redirect> {
        self.rules.iter().find_map(|rule| {
            rule.apply(path).map(|destination| Redirect {
                destination,
                permanent: rule.permanent,
            })
        })
    }

    pub fn rules(&self) -> &[RedirectRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
