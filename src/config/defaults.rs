//! Default configuration values

/// Version used when the metadata does not carry one
pub const DEFAULT_VERSION: &str = "0.1";

/// Release used when the metadata does not carry one
pub const DEFAULT_RELEASE: &str = "1";

/// Licence name used when the metadata does not carry one
pub const DEFAULT_LICENCE: &str = "proprietary";

/// Package group used when the metadata does not carry one
pub const DEFAULT_GROUP: &str = "FIXME";

/// Debian package priority used when the metadata does not carry one
pub const DEFAULT_PRIORITY: &str = "optional";

/// Architecture for Debian packages without an explicit BuildArch
pub const DEB_DEFAULT_ARCH: &str = "all";

/// Architecture for RPM packages without an explicit BuildArch
pub const RPM_DEFAULT_ARCH: &str = "noarch";

/// Mode for the Debian staging root and its DEBIAN control directory
pub const DEB_DIR_MODE: u32 = 0o755;

/// Mode rpmbuild expects on the staging root and SOURCES
pub const RPM_DIR_MODE: u32 = 0o777;

/// Recipe file looked up in the project directory
pub const RECIPE_FILE: &str = "packstage.toml";

/// Directory of licence text resources, relative to the recipe
pub const LICENCE_DIR: &str = "licences";
