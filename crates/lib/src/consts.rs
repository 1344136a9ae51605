//! Well-known names shared across the crate.

pub const APP_NAME: &str = "rtbuild";

/// Directory holding the installed dependency tree.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Marker file whose presence at a dependency's top level means it needs native compilation.
pub const NATIVE_DESCRIPTOR: &str = "binding.gyp";

/// Manifest file of the application and of each dependency.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Default directory (relative to the project root) the runtime bundle is extracted into.
pub const RUNTIME_DIR: &str = ".electron";

/// File inside the runtime directory recording the bundled runtime version.
pub const RUNTIME_VERSION_FILENAME: &str = "version";

/// File inside the runtime directory naming the platform's executable path.
pub const EXECUTABLE_MARKER_FILENAME: &str = "path.txt";

/// Persisted incremental-build record.
pub const RECORD_FILENAME: &str = ".build-config.json";

/// Advisory lock guarding a project against concurrent runs.
pub const LOCK_FILENAME: &str = ".rtbuild.lock";

pub const DEFAULT_MIRROR: &str = "https://github.com/electron/electron/releases/download/";

pub const MIRROR_ENV: &str = "ELECTRON_MIRROR";

pub const CACHE_DIR_ENV: &str = "RTBUILD_CACHE_DIR";
