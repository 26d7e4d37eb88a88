//! Request selector types.
//!
//! A selector names the policy definitions a decision request is checked
//! against. It is constructed exactly once at the boundary via
//! [`Selector::from_parts`], which encodes the precedence rule; everything
//! downstream matches exhaustively on the variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed `owner/name` composite identifier for a policy model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
}

impl ModelRef {
    /// Split an `owner/name` composite identifier.
    ///
    /// # Errors
    ///
    /// [`SelectorError::MalformedId`] if the identifier is not exactly two
    /// non-empty segments separated by `/`.
    pub fn parse(id: &str) -> Result<Self, SelectorError> {
        match id.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(SelectorError::MalformedId { id: id.to_owned() }),
        }
    }
}

impl FromStr for ModelRef {
    type Err = SelectorError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        Self::parse(id)
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Which policy definitions a request is decided against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A pre-initialized evaluator, looked up by identifier. Skips
    /// permission resolution entirely.
    Evaluator(String),
    /// A single named permission.
    Permission(String),
    /// All permissions attached to a policy model.
    Model(ModelRef),
    /// All permissions whose scope covers a resource.
    Resource(String),
}

impl Selector {
    /// Build a selector from the raw request parts, first match wins:
    /// evaluator id, then permission id, then model id, then resource id.
    /// Empty strings count as absent.
    ///
    /// # Errors
    ///
    /// - [`SelectorError::Missing`] if no part is present
    /// - [`SelectorError::MalformedId`] if the model composite cannot be split
    pub fn from_parts(
        evaluator_id: Option<&str>,
        permission_id: Option<&str>,
        model_id: Option<&str>,
        resource_id: Option<&str>,
    ) -> Result<Self, SelectorError> {
        if let Some(id) = present(evaluator_id) {
            Ok(Self::Evaluator(id.to_owned()))
        } else if let Some(id) = present(permission_id) {
            Ok(Self::Permission(id.to_owned()))
        } else if let Some(id) = present(model_id) {
            Ok(Self::Model(ModelRef::parse(id)?))
        } else if let Some(id) = present(resource_id) {
            Ok(Self::Resource(id.to_owned()))
        } else {
            Err(SelectorError::Missing)
        }
    }
}

fn present(part: Option<&str>) -> Option<&str> {
    part.filter(|id| !id.is_empty())
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluator(id) => write!(f, "evaluator:{id}"),
            Self::Permission(id) => write!(f, "permission:{id}"),
            Self::Model(model) => write!(f, "model:{model}"),
            Self::Resource(id) => write!(f, "resource:{id}"),
        }
    }
}

/// A selector that could not be constructed.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// No usable selector part was supplied.
    #[error("no usable selector supplied")]
    Missing,

    /// A composite identifier could not be split into owner and name.
    #[error("malformed composite identifier '{id}': expected owner/name")]
    MalformedId { id: String },
}
