use serde::{Deserialize, Serialize};

/// Package metadata shown by help and version output.
///
/// Later calls to [`merge`](PackageInfo::merge) override only the fields
/// they supply.
///
/// # Examples
///
/// ```
/// use cli_aid_core::PackageInfo;
///
/// let mut pkg = PackageInfo::new("cli-aid", "2.0.0");
/// pkg.merge(PackageInfo {
///     description: Some("A tiny CLI helper.".into()),
///     ..Default::default()
/// });
///
/// assert_eq!(pkg.name.as_deref(), Some("cli-aid"));
/// assert_eq!(pkg.default_usage(), "cli-aid [OPTIONS]");
/// assert!(pkg.version_line().starts_with("cli-aid/2.0.0 "));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Program name.
    pub name: Option<String>,
    /// Version string.
    pub version: Option<String>,
    /// Optional one-line description.
    pub description: Option<String>,
}

impl PackageInfo {
    /// Metadata with a name and version and no description.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            version: Some(version.into()),
            description: None,
        }
    }

    /// Overrides fields with the ones present in `other`.
    pub fn merge(&mut self, other: PackageInfo) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.version.is_some() {
            self.version = other.version;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
    }

    /// `"<name> [OPTIONS]"`, or empty when the package has no name.
    pub fn default_usage(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{name} [OPTIONS]"),
            _ => String::new(),
        }
    }

    /// `"<name>/<version> <os>-<arch>"`; the name part is dropped when unnamed.
    pub fn version_line(&self) -> String {
        let platform = format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH);
        match &self.name {
            Some(name) if !name.is_empty() => format!(
                "{name}/{} {platform}",
                self.version.as_deref().unwrap_or_default()
            ),
            _ => platform,
        }
    }
}
