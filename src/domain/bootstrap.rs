// Copyright (c) 2025 - Cowboy AI, Inc.
//! First-Boot Bootstrap Scripts
//!
//! An ordered sequence of shell directives baked into a compute node's
//! launch configuration and executed once at first boot. Purely textual; no
//! retry or idempotence guarantee beyond what the directives themselves
//! encode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered shell directives executed at first boot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BootstrapScript {
    directives: Vec<String>,
}

impl BootstrapScript {
    /// Create an empty script for a Linux node
    pub fn for_linux() -> Self {
        Self::default()
    }

    /// Append directives in declaration order
    pub fn add_commands<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives.extend(commands.into_iter().map(Into::into));
    }

    /// Get the directives in execution order
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Check whether any directive contains the given fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.directives.iter().any(|d| d.contains(fragment))
    }

    /// Render the script as executable shell text
    pub fn render(&self) -> String {
        let mut script = String::from("#!/bin/bash\n");
        for directive in &self.directives {
            script.push_str(directive);
            script.push('\n');
        }
        script
    }
}

impl fmt::Display for BootstrapScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_keep_declaration_order() {
        let mut script = BootstrapScript::for_linux();
        script.add_commands(["first", "second"]);
        script.add_commands(vec!["third".to_string()]);

        assert_eq!(script.directives(), &["first", "second", "third"]);
    }

    #[test]
    fn test_render_has_shebang() {
        let mut script = BootstrapScript::for_linux();
        script.add_commands(["systemctl start nginx.service"]);

        assert_eq!(
            script.render(),
            "#!/bin/bash\nsystemctl start nginx.service\n"
        );
    }

    #[test]
    fn test_contains_fragment() {
        let mut script = BootstrapScript::for_linux();
        script.add_commands(["sysctl -w net.ipv4.ip_forward=1"]);

        assert!(script.contains("net.ipv4.ip_forward"));
        assert!(!script.contains("net.ipv6"));
    }
}
