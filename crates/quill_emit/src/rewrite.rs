//! Declaration-path normalization: alias references to relative paths.

use crate::compiler::DeclarationTransform;
use quill_config::ResolvedConfig;
use std::path::{Path, PathBuf};

/// Rewrites symbolic-alias module specifiers in emitted declarations to
/// plain relative paths.
///
/// Declarations are consumed by tooling that has no alias-resolution
/// machinery, so a reference like `"@app/widget"` must become a relative
/// path from the importing module's directory. Only quoted specifiers that
/// start with a configured alias are touched; the alias table comes from
/// the resolved configuration, which has already stripped targets outside
/// the project root.
pub struct AliasRewriter {
    /// Aliases sorted longest-first so `@app/ui` wins over `@app`.
    aliases: Vec<(String, PathBuf)>,
}

impl AliasRewriter {
    /// Builds a rewriter from the resolved configuration's alias table.
    pub fn new(config: &ResolvedConfig) -> Self {
        let mut aliases: Vec<(String, PathBuf)> = config
            .paths
            .iter()
            .map(|(alias, target)| (alias.clone(), target.clone()))
            .collect();
        aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { aliases }
    }

    /// Rewrites one module specifier, or returns `None` if no alias matches.
    fn rewrite_specifier(&self, source_dir: &Path, specifier: &str) -> Option<String> {
        for (alias, target) in &self.aliases {
            let rest = if specifier == alias {
                ""
            } else if let Some(rest) = specifier
                .strip_prefix(alias.as_str())
                .and_then(|r| r.strip_prefix('/'))
            {
                rest
            } else {
                continue;
            };
            let absolute = if rest.is_empty() {
                target.clone()
            } else {
                target.join(rest)
            };
            let relative = pathdiff::diff_paths(&absolute, source_dir)?;
            let mut display = relative.to_string_lossy().replace('\\', "/");
            if !display.starts_with("..") {
                display = format!("./{display}");
            }
            return Some(display);
        }
        None
    }
}

impl DeclarationTransform for AliasRewriter {
    fn apply(&self, source: &Path, text: String) -> String {
        if self.aliases.is_empty() {
            return text;
        }
        let source_dir = source.parent().unwrap_or_else(|| Path::new(""));

        let mut out = String::with_capacity(text.len());
        let mut rest = text.as_str();
        while let Some(start) = rest.find(['"', '\'']) {
            let quote = rest.as_bytes()[start] as char;
            out.push_str(&rest[..=start]);
            rest = &rest[start + 1..];
            let Some(end) = rest.find(quote) else {
                // Unterminated quote; pass the tail through untouched.
                break;
            };
            let specifier = &rest[..end];
            match self.rewrite_specifier(source_dir, specifier) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(specifier),
            }
            out.push(quote);
            rest = &rest[end + 1..];
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_config::{load_config_from_str, resolve_config, ResolveContext};

    fn rewriter(paths: &str) -> AliasRewriter {
        let toml = format!("[paths]\n{paths}");
        let raw = load_config_from_str(&toml).unwrap();
        let config = resolve_config(raw, Path::new("/proj"), &ResolveContext::default());
        AliasRewriter::new(&config)
    }

    #[test]
    fn rewrites_alias_to_relative_path() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let text = "import { Widget } from \"@app/widget\";\n".to_string();
        let out = r.apply(Path::new("/proj/src/main.qm"), text);
        assert_eq!(out, "import { Widget } from \"./app/widget\";\n");
    }

    #[test]
    fn rewrites_bare_alias() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let out = r.apply(
            Path::new("/proj/src/main.qm"),
            "import \"@app\";".to_string(),
        );
        assert_eq!(out, "import \"./app\";");
    }

    #[test]
    fn rewrites_to_parent_relative_path() {
        let r = rewriter("\"@lib\" = \"lib\"\n");
        let out = r.apply(
            Path::new("/proj/src/deep/mod.qm"),
            "import \"@lib/util\";".to_string(),
        );
        assert_eq!(out, "import \"../../lib/util\";");
    }

    #[test]
    fn longest_alias_wins() {
        let r = rewriter("\"@app\" = \"src/app\"\n\"@app/ui\" = \"src/widgets\"\n");
        let out = r.apply(
            Path::new("/proj/src/main.qm"),
            "import \"@app/ui/button\";".to_string(),
        );
        assert_eq!(out, "import \"./widgets/button\";");
    }

    #[test]
    fn non_alias_specifiers_untouched() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let text = "import \"./local\";\nimport \"some-package\";\n".to_string();
        assert_eq!(r.apply(Path::new("/proj/src/main.qm"), text.clone()), text);
    }

    #[test]
    fn partial_prefix_is_not_a_match() {
        // "@application/x" must not match the "@app" alias.
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let text = "import \"@application/x\";".to_string();
        assert_eq!(r.apply(Path::new("/proj/src/main.qm"), text.clone()), text);
    }

    #[test]
    fn single_quotes_handled() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let out = r.apply(
            Path::new("/proj/src/main.qm"),
            "import '@app/widget';".to_string(),
        );
        assert_eq!(out, "import './app/widget';");
    }

    #[test]
    fn multiple_specifiers_in_one_text() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let text = "import \"@app/a\";\nimport \"@app/b\";\n".to_string();
        let out = r.apply(Path::new("/proj/src/main.qm"), text);
        assert_eq!(out, "import \"./app/a\";\nimport \"./app/b\";\n");
    }

    #[test]
    fn no_aliases_is_identity() {
        let raw = load_config_from_str("").unwrap();
        let config = resolve_config(raw, Path::new("/proj"), &ResolveContext::default());
        let r = AliasRewriter::new(&config);
        let text = "import \"@anything/x\";".to_string();
        assert_eq!(r.apply(Path::new("/proj/src/main.qm"), text.clone()), text);
    }

    #[test]
    fn unterminated_quote_passes_through() {
        let r = rewriter("\"@app\" = \"src/app\"\n");
        let text = "const s = \"unterminated".to_string();
        assert_eq!(r.apply(Path::new("/proj/src/main.qm"), text.clone()), text);
    }
}
