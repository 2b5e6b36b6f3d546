use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::core::input::{self, LoadOptions};
use crate::core::model::{target_from, Project};
use crate::core::{classify, cycles, lookup, resolver};

/// Runs the full analysis pipeline over a source tree and returns the settled
/// project: scan, lookup-table build, component mapping, include resolution,
/// public/private classification, cycle detection, then any requested drops.
///
/// Each phase consumes the previous phase's fully settled output, so the
/// pipeline is deliberately sequential after the parallel scan.
pub fn load_project(root: &Path, config: &Config, options: &LoadOptions) -> Result<Project> {
    let mut project = Project::new();
    input::load_file_list(&mut project, root, config, options)?;

    lookup::build_include_lookup(&mut project);
    input::map_files_to_components(&mut project);
    project.forget_empty_components();
    if project.component_count() < 3 {
        eprintln!(
            "Warning: analysis found only {} component(s). Either the project is small, or its \
             build files were not recognized; --infer treats every folder of code as a component.",
            project.component_count()
        );
    }

    resolver::map_includes_to_dependencies(&mut project);
    resolver::mark_ambiguous_candidates(&mut project);
    classify::propagate_external_includes(&mut project);
    classify::extract_public_dependencies(&mut project);
    cycles::find_circular_dependencies(&mut project);

    if !options.drops.is_empty() {
        for target in &options.drops {
            if !cycles::kill_component(&mut project, &target_from(target)) {
                eprintln!("Warning: no such component {target}");
            }
        }
        cycles::find_circular_dependencies(&mut project);
    }
    Ok(project)
}
