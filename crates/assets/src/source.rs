use std::path::PathBuf;

use url::Url;

use crate::LoadError;

/// Where a model's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Local(PathBuf),
    Remote(Url),
}

/// Resolve a model location.
///
/// Plain paths and `file://` URLs are local; `http://` and `https://` URLs
/// are fetched remotely. Any other `scheme://` is rejected.
pub fn resolve_location(location: &str) -> Result<ModelSource, LoadError> {
    if let Some(path) = location.strip_prefix("file://") {
        return Ok(ModelSource::Local(PathBuf::from(path)));
    }
    let Some((scheme, _)) = location.split_once("://") else {
        return Ok(ModelSource::Local(PathBuf::from(location)));
    };
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        let url = Url::parse(location).map_err(|source| LoadError::InvalidUrl {
            location: location.to_string(),
            source,
        })?;
        return Ok(ModelSource::Remote(url));
    }
    Err(LoadError::UnsupportedScheme(scheme.to_string()))
}
