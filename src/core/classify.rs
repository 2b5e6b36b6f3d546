use std::collections::BTreeSet;

use crate::core::model::{ComponentId, Project};

/// Spreads the externally-included flag to every same-component dependency of
/// an externally-included file: if a public header pulls in a private header
/// of its own component, that private header is part of the public surface
/// too.
///
/// Fixed-point iteration; each pass only flips unmarked files, so the loop
/// terminates on cyclic file graphs in at most edge-count passes.
pub fn propagate_external_includes(project: &mut Project) {
    loop {
        let mut found_change = false;
        for id in project.file_ids() {
            let file = project.file(id);
            if !file.has_external_include || file.component.is_none() {
                continue;
            }
            let component = file.component;
            let deps: Vec<_> = file.dependencies.iter().copied().collect();
            for dep in deps {
                let dep_file = project.file_mut(dep);
                if !dep_file.has_external_include && dep_file.component == component {
                    dep_file.has_external_include = true;
                    found_change = true;
                }
            }
        }
        if !found_change {
            break;
        }
    }
}

/// Promotes component edges reachable through externally-included files from
/// private to public, mirroring the change in the target's link sets, then
/// discards self-edges. Idempotent: re-running on a settled graph changes
/// nothing.
pub fn extract_public_dependencies(project: &mut Project) {
    let mut promotions: Vec<(ComponentId, BTreeSet<ComponentId>)> = Vec::new();
    for (id, comp) in project.components() {
        let mut targets = BTreeSet::new();
        for &fid in &comp.files {
            let file = project.file(fid);
            if !file.has_external_include {
                continue;
            }
            for &dep in &file.dependencies {
                if let Some(dep_comp) = project.file(dep).component {
                    targets.insert(dep_comp);
                }
            }
        }
        if !targets.is_empty() {
            promotions.push((id, targets));
        }
    }

    for (from, targets) in promotions {
        for to in targets {
            if to == from {
                continue;
            }
            let comp = project.component_mut(from);
            comp.priv_deps.remove(&to);
            comp.pub_deps.insert(to);
            let target = project.component_mut(to);
            target.priv_links.remove(&from);
            target.pub_links.insert(from);
        }
    }

    // a component never depends on itself; scrub rather than flag
    for id in project.component_ids() {
        let comp = project.component_mut(id);
        comp.pub_deps.remove(&id);
        comp.priv_deps.remove(&id);
        comp.pub_links.remove(&id);
        comp.priv_links.remove(&id);
    }
}
