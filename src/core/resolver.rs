use crate::core::model::{FileId, LookupEntry, Project};

/// Outcome of resolving one raw include against the project.
///
/// All of these are ordinary results; nothing in resolution is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Quote-form include found next to the including file. Always wins,
    /// never ambiguous, needs no include-search-path.
    LocalMatch(FileId),
    /// More than one file carries this suffix; needs human resolution.
    Ambiguous,
    /// Target is a declared build output; payload is the producer root.
    Generated(String),
    /// Found via the lookup table.
    Resolved(FileId),
    /// Out-of-tree or system header; silently ignored.
    Unresolved,
}

/// Classifies one raw include without mutating anything.
pub fn resolve_include(project: &Project, includer: FileId, text: &str, angle: bool) -> Resolution {
    if !angle {
        let dir = project.file(includer).dir();
        if let Some(joined) = join_relative(dir, text) {
            if let Some(id) = project.file_id(&joined) {
                return Resolution::LocalMatch(id);
            }
        }
    }
    match project.include_lookup.get(&text.to_lowercase()) {
        Some(LookupEntry::Ambiguous) => Resolution::Ambiguous,
        Some(LookupEntry::Generated(producer)) => Resolution::Generated(producer.clone()),
        Some(LookupEntry::Unique(id)) => Resolution::Resolved(*id),
        None => Resolution::Unresolved,
    }
}

/// Resolves every raw include of every file, populating file dependency sets,
/// include-path fragments, component-level private edges, the ambiguous
/// record, and `build_afters` obligations.
pub fn map_includes_to_dependencies(project: &mut Project) {
    for id in project.file_ids() {
        let raw: Vec<(String, bool)> = project
            .file(id)
            .raw_includes
            .iter()
            .map(|(text, &angle)| (text.clone(), angle))
            .collect();
        for (text, angle) in raw {
            match resolve_include(project, id, &text, angle) {
                Resolution::LocalMatch(dep) => {
                    project.file_mut(id).dependencies.insert(dep);
                }
                Resolution::Ambiguous => {
                    let path = project.file(id).path.clone();
                    project
                        .ambiguous
                        .entry(text.to_lowercase())
                        .or_default()
                        .push(path);
                }
                Resolution::Generated(producer) => {
                    apply_generated(project, id, &producer);
                }
                Resolution::Resolved(dep) => {
                    apply_resolved(project, id, dep, &text);
                }
                Resolution::Unresolved => {}
            }
        }
    }
}

fn apply_generated(project: &mut Project, includer: FileId, producer: &str) {
    let Some(comp) = project.file(includer).component else {
        return;
    };
    project
        .component_mut(comp)
        .build_afters
        .insert(producer.to_string());
    if let Some(target) = project.component_id(producer) {
        if target != comp {
            project.component_mut(comp).priv_deps.insert(target);
            project.component_mut(target).priv_links.insert(comp);
        }
    }
}

fn apply_resolved(project: &mut Project, includer: FileId, dep: FileId, text: &str) {
    project.file_mut(includer).dependencies.insert(dep);

    let includer_comp = project.file(includer).component;
    let dep_comp = project.file(dep).component;
    if let (Some(from), Some(to)) = (includer_comp, dep_comp) {
        let fragment = include_path_fragment(project, includer, dep, to, text);
        if !fragment.is_empty() {
            project.file_mut(dep).include_paths.insert(fragment);
        }
        if from != to {
            project.component_mut(from).priv_deps.insert(to);
            project.component_mut(to).priv_links.insert(from);
            project.file_mut(dep).has_external_include = true;
        }
    }
    project.file_mut(dep).has_include = true;
}

/// The include-search-path a dependent would need to find `dep` via `text`:
/// the resolved path minus the raw include text minus the target component
/// root. Empty for same-directory includes (under-declares for angle includes
/// in your own folder, but never over-declares), `"."` when the remainder is
/// exactly the component root.
fn include_path_fragment(
    project: &Project,
    includer: FileId,
    dep: FileId,
    dep_comp: crate::core::model::ComponentId,
    text: &str,
) -> String {
    let includer_file = project.file(includer);
    let dep_file = project.file(dep);
    if includer_file.dir() == dep_file.dir() {
        return String::new();
    }

    let full = &dep_file.path;
    let prefix = if full.len() > text.len() {
        &full[..full.len() - text.len() - 1]
    } else {
        ""
    };

    let root = &project.component(dep_comp).root;
    if root == "." {
        if prefix.is_empty() {
            ".".to_string()
        } else {
            prefix.to_string()
        }
    } else if prefix == root {
        ".".to_string()
    } else if let Some(rest) = prefix
        .strip_prefix(root.as_str())
        .and_then(|r| r.strip_prefix('/'))
    {
        rest.to_string()
    } else {
        String::new()
    }
}

/// Conservatively marks every collision candidate of every ambiguous include
/// actually seen as included: at least one include might end up there.
pub fn mark_ambiguous_candidates(project: &mut Project) {
    let candidates: Vec<FileId> = project
        .ambiguous
        .keys()
        .filter_map(|text| project.collisions.get(text))
        .flatten()
        .filter_map(|path| project.file_id(path))
        .collect();
    for id in candidates {
        project.file_mut(id).has_include = true;
    }
}

/// Lexically joins a quote-form include against the including file's
/// directory, handling `.` and `..` segments. `None` when the path escapes
/// the project root.
fn join_relative(dir: &str, raw: &str) -> Option<String> {
    let mut segments: Vec<&str> = if dir.is_empty() {
        Vec::new()
    } else {
        dir.split('/').collect()
    };
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}
