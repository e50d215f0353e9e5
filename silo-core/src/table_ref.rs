use crate::{Error, Result};
use std::borrow::Cow;

/// The identity of the table a repository works against.
///
/// Computed once at repository construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Module-qualified entity type name, e.g. `catalog::Movie`.
    pub qualified: Cow<'static, str>,
    /// Bare entity type name, e.g. `Movie`.
    pub entity: Cow<'static, str>,
    /// Table name, e.g. `movie`.
    pub name: Cow<'static, str>,
}

const SUFFIX: &str = "Repository";

impl TableRef {
    /// Resolve table identity from a repository type name following the
    /// `<Entity>Repository` convention, e.g. `catalog::MovieRepository`.
    ///
    /// This is the legacy zero-configuration path. A name that does not end
    /// with the `Repository` suffix is a structural contract violation and
    /// fails construction outright.
    pub fn from_repository_name(repository: &str) -> Result<Self> {
        let qualified = repository
            .strip_suffix(SUFFIX)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Construction(repository.to_owned()))?;
        let entity = qualified.rsplit("::").next().unwrap_or(qualified);
        if entity.is_empty() {
            return Err(Error::Construction(repository.to_owned()));
        }
        Ok(Self {
            qualified: Cow::Owned(qualified.to_owned()),
            entity: Cow::Owned(entity.to_owned()),
            name: Cow::Owned(entity.to_lowercase()),
        })
    }
}
