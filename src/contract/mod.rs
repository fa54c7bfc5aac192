//! Contract kinds and templates.
//!
//! Two agreements gate installation: property access (always required) and
//! the free-install service commitment (required only on the contract
//! install path). The unsigned template text is embedded at compile time so
//! the kiosk can offer a plain-text copy without network access.

use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};

use crate::error::Result;

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/contracts");

/// The agreements a subscriber may need to sign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContractKind {
    /// Grants installers access to the service address. Always required.
    PropertyAccess,
    /// 12-month commitment that waives the installation fee. Required only
    /// when the subscriber chose the contract install path.
    FreeInstall,
}

impl ContractKind {
    /// All kinds, in signing order.
    pub fn all() -> [ContractKind; 2] {
        [ContractKind::PropertyAccess, ContractKind::FreeInstall]
    }

    /// Stable identifier used in slot names and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::PropertyAccess => "property-access",
            ContractKind::FreeInstall => "free-install",
        }
    }

    /// Human-readable agreement title.
    pub fn title(&self) -> &'static str {
        match self {
            ContractKind::PropertyAccess => "Property Access Agreement",
            ContractKind::FreeInstall => "Free Installation Service Commitment",
        }
    }

    fn template_file(&self) -> &'static str {
        match self {
            ContractKind::PropertyAccess => "property_access.txt",
            ContractKind::FreeInstall => "free_install.txt",
        }
    }
}

impl std::fmt::Display for ContractKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unsigned template text for a contract kind.
pub fn template_text(kind: ContractKind) -> &'static str {
    TEMPLATES
        .get_file(kind.template_file())
        .and_then(|f| f.contents_utf8())
        .expect("contract template is embedded")
}

/// Write the unsigned template to a plain-text file in `dir`.
///
/// Returns the path written. This is the CLI rendering of the "download
/// unsigned contract" action.
pub fn export_template(kind: ContractKind, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("fiberline-{}.txt", kind.as_str()));
    std::fs::write(&path, template_text(kind))?;
    Ok(path)
}
