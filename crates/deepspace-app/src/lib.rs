//! Deep space backdrop host.
//!
//! Opens a window, mounts the [`engine::BackdropEngine`] into it and drives
//! one simulation step plus one render per redraw.

pub mod engine;
pub mod frame_clock;
pub mod platform;
pub mod window;

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    const MAX_WIDTH: usize = 100;

    fn rust_sources(dir: &Path, files: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if path.file_name().is_some_and(|n| n == "target") {
                    continue;
                }
                rust_sources(&path, files);
            } else if path.extension().is_some_and(|e| e == "rs") {
                files.push(path);
            }
        }
    }

    /// Crate names under `[dependencies]` of a manifest, as they appear in paths.
    fn dependency_names(manifest: &str) -> Vec<String> {
        let mut in_dependencies = false;
        let mut names = Vec::new();
        for line in manifest.lines().map(str::trim) {
            if line.starts_with('[') {
                in_dependencies = line == "[dependencies]";
                continue;
            }
            if !in_dependencies {
                continue;
            }
            if let Some((name, _)) = line.split_once('=') {
                names.push(name.trim().replace('-', "_"));
            }
        }
        names
    }

    #[test]
    fn test_dependency_names_parse_manifest_table() {
        let manifest = "[package]\nname = \"x\"\n\n[dependencies]\nfoo-bar = \"1\"\n\
                        baz = { workspace = true }\n\n[dev-dependencies]\nqux = \"1\"\n";
        assert_eq!(dependency_names(manifest), ["foo_bar", "baz"]);
    }

    #[test]
    fn test_every_dependency_is_referenced() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let manifest = std::fs::read_to_string(root.join("Cargo.toml")).unwrap();

        let mut files = Vec::new();
        rust_sources(&root.join("src"), &mut files);
        let source: String = files
            .iter()
            .filter_map(|path| std::fs::read_to_string(path).ok())
            .collect();

        let unused: Vec<String> = dependency_names(&manifest)
            .into_iter()
            .filter(|name| !source.contains(&format!("{name}::")))
            .collect();
        assert!(unused.is_empty(), "unused dependencies: {unused:?}");
    }

    #[test]
    fn test_source_lines_fit_width() {
        let crates_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .expect("could not find crates directory");

        let mut files = Vec::new();
        rust_sources(crates_dir, &mut files);
        assert!(!files.is_empty());

        let mut violations = Vec::new();
        for path in &files {
            let Ok(content) = std::fs::read_to_string(path) else {
                continue;
            };
            for (line_num, line) in content.lines().enumerate() {
                let width = line.chars().count();
                if width > MAX_WIDTH {
                    violations.push(format!("{}:{} ({width})", path.display(), line_num + 1));
                }
            }
        }
        assert!(
            violations.is_empty(),
            "lines wider than {MAX_WIDTH} columns:\n{}",
            violations.join("\n")
        );
    }
}
