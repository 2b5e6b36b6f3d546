use anyhow::Result;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::config::Config;
use crate::core::model::{File, Project};
use crate::core::scanner::{self, ScanOptions};

/// Knobs for one `load_project` run.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Treat every directory holding code as a component root instead of
    /// requiring a build file.
    pub infer_components: bool,
    /// Keep per-file line counts (needed by the LOC-based reports).
    pub with_loc: bool,
    pub scan: ScanOptions,
    /// Targets to drop after analysis, in `ROOT` / `a.b` form.
    pub drops: Vec<String>,
}

/// Walks the source tree: defines components from build files (or from every
/// directory when inferring), reads and scans every code file. Hidden
/// directories and blacklisted names are skipped. Scanning is parallel; the
/// registry is filled from the collecting thread, so every file record is
/// written exactly once.
pub fn load_file_list(
    project: &mut Project,
    root: &Path,
    config: &Config,
    options: &LoadOptions,
) -> Result<()> {
    project.add_component_definition(".");

    let mut code_files: Vec<(String, std::path::PathBuf)> = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!("Warning: skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = relative_path(root, entry.path()) else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy();
        if config.blacklist.contains(file_name.as_ref()) {
            continue;
        }

        let parent = parent_dir(&rel);
        if file_name == "CMakeLists.txt" {
            read_cmake_lists(project, config, entry.path(), &parent)?;
        } else if file_name == "CMakeAddon.txt" {
            let id = project.add_component_definition(&parent);
            project.component_mut(id).has_addon = true;
        } else if is_code(&rel) {
            if options.infer_components {
                project.add_component_definition(&parent);
            }
            code_files.push((rel, entry.path().to_path_buf()));
        }
    }

    let scan = options.scan.clone();
    let scanned: Vec<(String, scanner::ScanResult)> = code_files
        .into_par_iter()
        .filter_map(|(rel, abs)| match scanner::scan_file(&abs, &scan) {
            Ok(result) => Some((rel, result)),
            Err(err) => {
                eprintln!("Warning: {err}");
                None
            }
        })
        .collect();

    for (rel, result) in scanned {
        let mut file = File::new(rel);
        if options.with_loc {
            file.loc = result.loc;
        }
        for include in result.includes {
            file.add_include_stmt(include.angle, include.text);
        }
        project.add_file(file);
    }
    Ok(())
}

/// Reads a CMakeLists.txt, defining the component at its directory: project
/// name, target kind via the configured aliases, the regen tag, and generated
/// outputs of custom commands.
fn read_cmake_lists(
    project: &mut Project,
    config: &Config,
    path: &Path,
    component_root: &str,
) -> Result<()> {
    let id = project.add_component_definition(component_root);
    let content = fs::read_to_string(path)?;
    let mut in_custom_command = false;
    for line in content.lines() {
        if !config.regen_tag.is_empty() && line.contains(&config.regen_tag) {
            project.component_mut(id).recreate = true;
        }
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("project(") {
            if let Some(end) = rest.find(')') {
                project.component_mut(id).name = rest[..end].trim().to_string();
            }
        } else if config.library_aliases.iter().any(|a| trimmed.contains(a.as_str())) {
            project.component_mut(id).kind = crate::core::model::ComponentKind::Library;
        } else if config
            .executable_aliases
            .iter()
            .any(|a| trimmed.contains(a.as_str()))
        {
            project.component_mut(id).kind = crate::core::model::ComponentKind::Executable;
        }
        // OUTPUT may sit on a later line than add_custom_command itself
        if trimmed.contains("add_custom_command") {
            in_custom_command = true;
        }
        if in_custom_command {
            if let Some(output) = custom_command_output(trimmed) {
                let declared = if output.contains('/') || component_root == "." {
                    output
                } else {
                    format!("{component_root}/{output}")
                };
                project
                    .generated
                    .insert(declared, component_root.to_string());
                in_custom_command = false;
            } else if trimmed.ends_with(')') {
                in_custom_command = false;
            }
        }
    }
    Ok(())
}

/// The first path after an `OUTPUT` token. Parentheses count as separators,
/// so `add_custom_command(OUTPUT foo.h ...)` works on one line.
fn custom_command_output(line: &str) -> Option<String> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty());
    while let Some(token) = tokens.next() {
        if token == "OUTPUT" {
            let cleaned = tokens.next()?.trim_matches('"');
            if cleaned.is_empty() {
                return None;
            }
            return Some(cleaned.replace('\\', "/"));
        }
    }
    None
}

/// Assigns each file to the component with the longest root prefix of its
/// path. The root component always exists, so every file finds an owner.
pub fn map_files_to_components(project: &mut Project) {
    for id in project.file_ids() {
        let mut dir = parent_dir(&project.file(id).path);
        loop {
            if let Some(cid) = project.component_id(&dir) {
                project.file_mut(id).component = Some(cid);
                project.component_mut(cid).files.insert(id);
                break;
            }
            if dir == "." {
                break;
            }
            dir = parent_dir(&dir);
        }
    }
}

fn is_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

/// Slash-normalized path relative to the walk root.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Directory part of a relative path, `"."` for root-level entries.
fn parent_dir(rel: &str) -> String {
    match rel.rfind('/') {
        Some(pos) => rel[..pos].to_string(),
        None => ".".to_string(),
    }
}

fn is_code(rel: &str) -> bool {
    rel.rsplit('.')
        .next()
        .map(scanner::is_code_ext)
        .unwrap_or(false)
        && rel.contains('.')
}
