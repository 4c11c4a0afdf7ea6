//! Build environment resolution.
//!
//! The environment is derived once per process invocation from CLI flags and
//! controls minification, source-map verbosity, the public asset path prefix,
//! and which destination output tree a build is promoted into.

use serde::Serialize;
use std::fmt;

/// The three-way build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// Unminified, runtime-injected styles, eval source maps, dev server.
    Development,
    /// Minified output promoted to the web destination tree.
    Production,
    /// Minified output promoted into a packaged native-app (WebView) shell.
    HybridShell,
}

impl Environment {
    /// Resolve the environment from CLI flag presence.
    ///
    /// Precedence is `--dev` > `--cordova` > production; both flags together
    /// resolve to development.
    pub fn from_flags(dev: bool, cordova: bool) -> Self {
        if dev {
            Environment::Development
        } else if cordova {
            Environment::HybridShell
        } else {
            Environment::Production
        }
    }

    /// Whether this is the development environment.
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Whether this build targets the hybrid app shell.
    pub fn is_hybrid_shell(self) -> bool {
        matches!(self, Environment::HybridShell)
    }

    /// The bundler mode string injected into the compiled output.
    pub fn mode(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production | Environment::HybridShell => "production",
        }
    }

    /// Public path prefix under which bundled assets are addressed.
    ///
    /// The hybrid shell serves from the packaged asset scheme rather than
    /// the server root.
    pub fn public_path(self) -> &'static str {
        match self {
            Environment::HybridShell => "/android_asset/www/",
            Environment::Development | Environment::Production => "/",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "dev",
            Environment::Production => "prod",
            Environment::HybridShell => "cordova",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_precedence_dev_wins() {
        assert_eq!(
            Environment::from_flags(true, true),
            Environment::Development
        );
        assert_eq!(
            Environment::from_flags(true, false),
            Environment::Development
        );
    }

    #[test]
    fn test_flag_precedence_cordova_over_default() {
        assert_eq!(
            Environment::from_flags(false, true),
            Environment::HybridShell
        );
    }

    #[test]
    fn test_no_flags_is_production() {
        assert_eq!(Environment::from_flags(false, false), Environment::Production);
    }

    #[test]
    fn test_mode_strings() {
        assert_eq!(Environment::Development.mode(), "development");
        assert_eq!(Environment::Production.mode(), "production");
        assert_eq!(Environment::HybridShell.mode(), "production");
    }

    #[test]
    fn test_public_path() {
        assert_eq!(Environment::Development.public_path(), "/");
        assert_eq!(Environment::Production.public_path(), "/");
        assert_eq!(
            Environment::HybridShell.public_path(),
            "/android_asset/www/"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Environment::Development.to_string(), "dev");
        assert_eq!(Environment::Production.to_string(), "prod");
        assert_eq!(Environment::HybridShell.to_string(), "cordova");
    }
}
