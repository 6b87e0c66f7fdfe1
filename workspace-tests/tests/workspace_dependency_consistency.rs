use proptest::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Property test for workspace dependency consistency
///
/// For any member crate that uses a dependency declared in the root
/// `[workspace.dependencies]` table, the crate should inherit it with
/// `workspace = true` instead of pinning its own version.
#[cfg(test)]
mod workspace_dependency_tests {
    use super::*;

    const MEMBERS: &[&str] = &["adshield-core", "adshield-host", "workspace-tests"];

    fn workspace_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .map(PathBuf::from)
            .unwrap()
    }

    fn read_manifest(relative: &str) -> toml::Table {
        let path = workspace_root().join(relative);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        content
            .parse::<toml::Table>()
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
    }

    // Names declared in the root [workspace.dependencies] table
    fn get_workspace_dependencies() -> Vec<String> {
        let root = read_manifest("Cargo.toml");
        root["workspace"]["dependencies"]
            .as_table()
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }

    // Dependency name -> whether it inherits from the workspace, across all dependency tables
    fn parse_crate_dependencies(manifest: &toml::Table) -> HashMap<String, bool> {
        let mut dependencies = HashMap::new();
        for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
            let Some(table) = manifest.get(section).and_then(|v| v.as_table()) else {
                continue;
            };
            for (name, entry) in table {
                let uses_workspace = entry
                    .get("workspace")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                dependencies.insert(name.clone(), uses_workspace);
            }
        }
        dependencies
    }

    // Concatenated Rust sources under a member's src/ and tests/
    fn crate_sources(crate_name: &str) -> String {
        let root = workspace_root().join(crate_name);
        let mut pending = vec![root.join("src"), root.join("tests")];
        let mut text = String::new();
        while let Some(dir) = pending.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs") {
                    text.push_str(&fs::read_to_string(&path).unwrap_or_default());
                }
            }
        }
        text
    }

    proptest! {
        #[test]
        fn test_declared_dependencies_are_used(
            crate_name in prop::sample::select(MEMBERS.to_vec())
        ) {
            let manifest = read_manifest(&format!("{}/Cargo.toml", crate_name));
            let sources = crate_sources(crate_name);

            for dep_name in parse_crate_dependencies(&manifest).keys() {
                let path_prefix = format!("{}::", dep_name.replace('-', "_"));
                prop_assert!(
                    sources.contains(&path_prefix),
                    "Crate '{}' declares dependency '{}' but never refers to it",
                    crate_name,
                    dep_name
                );
            }
        }

        #[test]
        fn test_workspace_dependency_consistency(
            crate_name in prop::sample::select(MEMBERS.to_vec())
        ) {
            let manifest = read_manifest(&format!("{}/Cargo.toml", crate_name));
            let crate_deps = parse_crate_dependencies(&manifest);

            for dep_name in get_workspace_dependencies() {
                if let Some(&uses_workspace) = crate_deps.get(&dep_name) {
                    prop_assert!(
                        uses_workspace,
                        "Crate '{}' uses dependency '{}' but does not inherit from workspace (missing 'workspace = true')",
                        crate_name,
                        dep_name
                    );
                }
            }
        }
    }

    #[test]
    fn test_members_match_directories() {
        let root = read_manifest("Cargo.toml");
        let members: Vec<&str> = root["workspace"]["members"]
            .as_array()
            .map(|members| members.iter().filter_map(|m| m.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(members, MEMBERS);
        for member in MEMBERS {
            assert!(
                workspace_root().join(member).join("Cargo.toml").exists(),
                "member '{}' has no Cargo.toml",
                member
            );
        }
    }

    #[test]
    fn test_library_crates_have_entry_points() {
        for member in ["adshield-core", "adshield-host"] {
            let src = workspace_root().join(member).join("src");
            assert!(src.join("lib.rs").exists(), "{} should have lib.rs", member);
            assert!(
                !src.join("main.rs").exists(),
                "{} is a library and should not ship a binary",
                member
            );
        }
    }

    #[test]
    fn test_workspace_dependency_consistency_unit() {
        let good_cargo_toml: toml::Table = r#"
[package]
name = "test-crate"
version.workspace = true
edition.workspace = true

[dependencies]
serde = { workspace = true }
tracing = { workspace = true }
"#
        .parse()
        .unwrap();

        let parsed_deps = parse_crate_dependencies(&good_cargo_toml);
        assert_eq!(parsed_deps.get("serde"), Some(&true));
        assert_eq!(parsed_deps.get("tracing"), Some(&true));

        let bad_cargo_toml: toml::Table = r#"
[package]
name = "test-crate"

[dependencies]
serde = "1.0"

[dev-dependencies]
proptest = { workspace = true }
"#
        .parse()
        .unwrap();

        let parsed_deps_bad = parse_crate_dependencies(&bad_cargo_toml);
        assert_eq!(parsed_deps_bad.get("serde"), Some(&false));
        assert_eq!(parsed_deps_bad.get("proptest"), Some(&true));
    }
}
