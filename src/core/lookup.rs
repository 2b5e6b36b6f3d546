use crate::core::model::{FileId, LookupEntry, Project};

/// Builds the include lookup table from the full file registry.
///
/// Every `/`-delimited suffix of every file's lowercased path (including the
/// full path) maps to that file. First insertion wins; a second distinct file
/// for the same suffix turns the entry permanently ambiguous and records all
/// contributors in the collision map. Shorter suffixes collide far more often
/// than long ones, which mirrors how short angle-bracket includes genuinely
/// are more ambiguous in a large tree.
///
/// Declared generated outputs are registered first; a real file with the same
/// suffix silently wins over a generated entry, since a committed copy of a
/// generated header is the authoritative target.
pub fn build_include_lookup(project: &mut Project) {
    let generated: Vec<(String, String)> = project
        .generated
        .iter()
        .map(|(path, producer)| (path.clone(), producer.clone()))
        .collect();
    for (path, producer) in generated {
        let lower = path.to_lowercase();
        for_each_suffix(&lower, |suffix| {
            project
                .include_lookup
                .entry(suffix.to_string())
                .or_insert_with(|| LookupEntry::Generated(producer.clone()));
        });
    }

    for id in project.file_ids() {
        let path = project.file(id).path.clone();
        let lower = path.to_lowercase();
        for_each_suffix(&lower, |suffix| {
            register_file_suffix(project, suffix, &path, id);
        });
    }
}

fn register_file_suffix(project: &mut Project, suffix: &str, path: &str, id: FileId) {
    match project.include_lookup.get(suffix) {
        None | Some(LookupEntry::Generated(_)) => {
            project
                .include_lookup
                .insert(suffix.to_string(), LookupEntry::Unique(id));
        }
        Some(LookupEntry::Unique(existing)) if *existing == id => {}
        Some(LookupEntry::Unique(existing)) => {
            let existing_path = project.file(*existing).path.clone();
            let record = project.collisions.entry(suffix.to_string()).or_default();
            record.insert(existing_path);
            record.insert(path.to_string());
            project
                .include_lookup
                .insert(suffix.to_string(), LookupEntry::Ambiguous);
        }
        Some(LookupEntry::Ambiguous) => {
            project
                .collisions
                .entry(suffix.to_string())
                .or_default()
                .insert(path.to_string());
        }
    }
}

fn for_each_suffix(lower: &str, mut f: impl FnMut(&str)) {
    f(lower);
    for (pos, _) in lower.match_indices('/') {
        f(&lower[pos + 1..]);
    }
}
