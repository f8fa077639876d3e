use std::fmt;

use kube::api::DynamicObject;
use kube::core::GroupVersionKind;
use serde::Deserialize;

use crate::error::{ErrorKind, ResolverResult};
use crate::resolver_error;

/// One cluster object decoded from a manifest stream.
///
/// The group, version and kind are extracted at decode time, so every [`ManifestObject`] can be
/// mapped to a resource collection by the cluster client.
#[derive(Debug, Clone)]
pub struct ManifestObject {
    gvk: GroupVersionKind,
    object: DynamicObject,
}

impl ManifestObject {
    /// Builds an object from a decoded YAML document.
    pub fn from_value(value: serde_yaml::Value) -> ResolverResult<ManifestObject> {
        let value = serde_json::to_value(&value).map_err(|err| {
            resolver_error!(
                ErrorKind::ManifestDecodeError,
                "Manifest document is not representable as JSON",
                err
            )
        })?;
        let object: DynamicObject = serde_json::from_value(value).map_err(|err| {
            resolver_error!(
                ErrorKind::ManifestDecodeError,
                "Manifest document is not a valid object",
                err
            )
        })?;

        let Some(types) = object.types.as_ref().filter(|types| !types.kind.is_empty()) else {
            return Err(resolver_error!(
                ErrorKind::ManifestDecodeError,
                "Manifest object has no `apiVersion` or `kind`",
                object.metadata.name.as_deref().unwrap_or(UNNAMED)
            ));
        };
        let gvk = parse_gvk(&types.api_version, &types.kind)?;

        Ok(ManifestObject { gvk, object })
    }

    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    pub fn name(&self) -> Option<&str> {
        self.object.metadata.name.as_deref()
    }
}

const UNNAMED: &str = "<unnamed>";

impl fmt::Display for ManifestObject {
    /// Formats as `kind.group/name`, or `kind/name` for the core group.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name().unwrap_or(UNNAMED);
        if self.gvk.group.is_empty() {
            write!(f, "{}/{}", self.gvk.kind, name)
        } else {
            write!(f, "{}.{}/{}", self.gvk.kind, self.gvk.group, name)
        }
    }
}

fn parse_gvk(api_version: &str, kind: &str) -> ResolverResult<GroupVersionKind> {
    let (group, version) = match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    };

    if version.is_empty()
        || version.contains('/')
        || (api_version.contains('/') && group.is_empty())
    {
        return Err(resolver_error!(
            ErrorKind::ManifestDecodeError,
            "Manifest object has an invalid `apiVersion`",
            format!("`{api_version}` of kind `{kind}`")
        ));
    }

    Ok(GroupVersionKind::gvk(group, version, kind))
}

/// Lazily decodes a byte stream of YAML documents into [`ManifestObject`]s.
///
/// Empty documents, e.g. a trailing `---`, are skipped. Iteration stops after the first error,
/// so a stream yields any number of objects followed by at most one error.
pub struct ManifestStream<'de> {
    documents: serde_yaml::Deserializer<'de>,
    position: usize,
    failed: bool,
}

impl<'de> ManifestStream<'de> {
    pub fn new(bytes: &'de [u8]) -> ManifestStream<'de> {
        ManifestStream {
            documents: serde_yaml::Deserializer::from_slice(bytes),
            position: 0,
            failed: false,
        }
    }
}

impl Iterator for ManifestStream<'_> {
    type Item = ResolverResult<ManifestObject>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let document = self.documents.next()?;
            self.position += 1;

            let result = serde_yaml::Value::deserialize(document)
                .map_err(|err| {
                    resolver_error!(
                        ErrorKind::ManifestDecodeError,
                        "Failed to decode manifest document",
                        format!("document {}: {err}", self.position)
                    )
                })
                .and_then(|value| {
                    if value.is_null() {
                        return Ok(None);
                    }

                    ManifestObject::from_value(value).map(Some)
                });

            match result {
                Ok(None) => continue,
                Ok(Some(object)) => return Some(Ok(object)),
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
