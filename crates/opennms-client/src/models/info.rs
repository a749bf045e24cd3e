//! Server metadata reported by `rest/info`

use serde::Serialize;

/// Version and packaging information of an OpenNMS server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMetadata {
    pub version: String,
    pub display_version: Option<String>,
    pub package_name: Option<String>,
    pub package_description: Option<String>,
}

impl ServerMetadata {
    /// Leading numeric component of the version (`"24.1.0"` → `24`)
    pub fn major_version(&self) -> Option<u32> {
        self.version.split(['.', '-']).next()?.parse().ok()
    }
}
