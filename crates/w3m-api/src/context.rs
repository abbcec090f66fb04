//! Caller identity attached to every directory request

use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN};

/// SDK type tag reported to the directory
pub const DEFAULT_SDK_TYPE: &str = "w3m";

const PROJECT_ID_HEADER: &str = "x-project-id";
const SDK_TYPE_HEADER: &str = "x-sdk-type";
const SDK_VERSION_HEADER: &str = "x-sdk-version";

/// Immutable caller context.
///
/// Built once per session; the header map is validated up front so
/// transport calls only clone it.
#[derive(Debug, Clone)]
pub struct CallerContext {
    project_id: String,
    sdk_type: String,
    sdk_version: String,
    origin: Option<String>,
    headers: HeaderMap,
}

impl CallerContext {
    /// Create a context reporting the `w3m` SDK type
    pub fn new(
        project_id: impl Into<String>,
        sdk_version: impl Into<String>,
        origin: Option<String>,
    ) -> Result<Self> {
        let project_id = project_id.into();
        let sdk_type = DEFAULT_SDK_TYPE.to_string();
        let sdk_version = sdk_version.into();

        if project_id.trim().is_empty() {
            return Err(Error::InvalidQuery("project id is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        insert_header(&mut headers, HeaderName::from_static(PROJECT_ID_HEADER), &project_id)?;
        insert_header(&mut headers, HeaderName::from_static(SDK_TYPE_HEADER), &sdk_type)?;
        insert_header(&mut headers, HeaderName::from_static(SDK_VERSION_HEADER), &sdk_version)?;
        if let Some(origin) = origin.as_deref() {
            insert_header(&mut headers, ORIGIN, origin)?;
        }

        Ok(Self {
            project_id,
            sdk_type,
            sdk_version,
            origin,
            headers,
        })
    }

    /// Project / tenant identifier
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// SDK type tag
    pub fn sdk_type(&self) -> &str {
        &self.sdk_type
    }

    /// SDK version tag
    pub fn sdk_version(&self) -> &str {
        &self.sdk_version
    }

    /// Origin of the embedding application, if known
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<()> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidQuery(format!("invalid {} header: {}", name.as_str(), e)))?;
    headers.insert(name, value);
    Ok(())
}
