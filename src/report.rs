//! Plain-text reports over a settled [`Project`]. These consume the core's
//! registries read-only (except the include-size report, which accumulates
//! per-file include counts).

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::json;
use std::collections::HashMap;

use crate::config::Config;
use crate::core::model::{ComponentId, FileId, Project};
use crate::core::scanner::is_compileable_ext;

pub fn print_stats(project: &Project) {
    let mut total_public = 0usize;
    let mut total_private = 0usize;
    for (_, comp) in project.components() {
        total_public += comp.pub_deps.len();
        total_private += comp.priv_deps.len();
    }
    println!(
        "{} components with {} public dependencies, {} private dependencies",
        project.component_count(),
        total_public,
        total_private
    );
    println!("Detected {} nodes in cycles", project.nodes_with_cycles());
}

pub fn stats_json(project: &Project) -> serde_json::Value {
    let mut total_public = 0usize;
    let mut total_private = 0usize;
    for (_, comp) in project.components() {
        total_public += comp.pub_deps.len();
        total_private += comp.priv_deps.len();
    }
    json!({
        "components": project.component_count(),
        "files": project.file_count(),
        "public_dependencies": total_public,
        "private_dependencies": total_private,
        "nodes_in_cycles": project.nodes_with_cycles(),
        "ambiguous_includes": project.ambiguous.len(),
    })
}

pub fn print_cycles_for_target(project: &Project, id: ComponentId) {
    let comp = project.component(id);
    if comp.circulars.is_empty() {
        println!("{} is not part of any cycle", comp.nice_name());
        return;
    }
    println!("Cycles on {}:", comp.nice_name());
    for name in project.sorted_nice_names(&comp.circulars) {
        println!("  {name}");
    }
}

pub fn print_links_for_target(project: &Project, id: ComponentId) {
    let comp = project.component(id);
    println!("Dependencies of {}:", comp.nice_name());
    print_name_list(project, "  public ->", &comp.pub_deps);
    print_name_list(project, "  private ->", &comp.priv_deps);
    println!("Links into {}:", comp.nice_name());
    print_name_list(project, "  public <-", &comp.pub_links);
    print_name_list(project, "  private <-", &comp.priv_links);
}

pub fn print_info_on_target(project: &Project, id: ComponentId) {
    let comp = project.component(id);
    println!("Component {}", comp.nice_name());
    println!("  root: {}", comp.root);
    println!("  type: {}", comp.kind.as_str());
    println!("  build name: {}", comp.cmake_name());
    println!(
        "  {} files, {} lines of code",
        comp.files.len(),
        project.component_loc(id)
    );
    print_name_list(project, "  public dependencies:", &comp.pub_deps);
    print_name_list(project, "  private dependencies:", &comp.priv_deps);
    print_name_list(project, "  circular dependencies:", &comp.circulars);
    if !comp.build_afters.is_empty() {
        println!("  build after:");
        for name in &comp.build_afters {
            println!("    {name}");
        }
    }
}

pub fn print_ambiguous(project: &Project) {
    println!("Found {} ambiguous includes\n", project.ambiguous.len());
    for (text, includers) in &project.ambiguous {
        println!("Include for {text}\nFound in:");
        for path in includers {
            println!("  included from {path}");
        }
        println!("Options for file:");
        if let Some(candidates) = project.collisions.get(text) {
            for candidate in candidates {
                println!("  {candidate}");
            }
        }
        println!();
    }
}

pub fn print_outliers(config: &Config, project: &Project) {
    use crate::core::model::ComponentKind;

    print_matching_components(project, "Libraries with no links in:", |_, comp| {
        comp.kind == ComponentKind::Library
            && !comp.files.is_empty()
            && comp.pub_links.is_empty()
            && comp.priv_links.is_empty()
    });
    print_matching_components(project, "Components with too many outward links:", |_, comp| {
        comp.pub_deps.len() + comp.priv_deps.len() > config.component_link_limit
    });
    print_matching_components(project, "Components with too few lines of code:", |id, comp| {
        !comp.files.is_empty() && project.component_loc(id) < config.component_loc_lower_limit
    });
    print_matching_components(project, "Components with too many lines of code:", |id, _| {
        project.component_loc(id) > config.component_loc_upper_limit
    });
    print_matching_components(project, "Components that are part of a cycle:", |_, comp| {
        !comp.circulars.is_empty()
    });

    println!("Files that are never used:");
    for (_, file) in project.files() {
        let compiled = extension_of(&file.path)
            .map(is_compileable_ext)
            .unwrap_or(false);
        if !compiled && !file.has_include {
            println!("  {}", file.path);
        }
    }
    println!("Files with too many lines of code:");
    for (_, file) in project.files() {
        if file.loc > config.file_loc_upper_limit {
            println!("  {} ({} lines)", file.path, file.loc);
        }
    }
}

pub fn print_used_by(project: &Project, path: &str) {
    let Some(target) = project.file_id(path) else {
        println!("No such file {path}");
        return;
    };
    println!("File {path} is used by:");
    for (_, file) in project.files() {
        if file.dependencies.contains(&target) {
            println!("  {}", file.path);
        }
    }
}

/// Shortest chain of dependency edges between two components, over the
/// combined public+private graph. `None` when no chain exists.
pub fn shortest_path(
    project: &Project,
    from: ComponentId,
    to: ComponentId,
) -> Option<Vec<ComponentId>> {
    let mut graph: DiGraph<ComponentId, ()> = DiGraph::new();
    let mut nodes: HashMap<ComponentId, NodeIndex> = HashMap::new();
    for (id, _) in project.components() {
        nodes.insert(id, graph.add_node(id));
    }
    for (id, comp) in project.components() {
        for dep in comp.all_deps() {
            if let (Some(&a), Some(&b)) = (nodes.get(&id), nodes.get(&dep)) {
                graph.add_edge(a, b, ());
            }
        }
    }

    let goal = nodes[&to];
    astar(&graph, nodes[&from], |n| n == goal, |_| 1, |_| 0)
        .map(|(_, path)| path.into_iter().map(|n| graph[n]).collect())
}

pub fn print_shortest(project: &Project, from: ComponentId, to: ComponentId) {
    match shortest_path(project, from, to) {
        Some(path) => {
            let names: Vec<String> = path
                .iter()
                .map(|&id| project.component(id).nice_name())
                .collect();
            println!("{}", names.join(" -> "));
        }
        None => println!(
            "No path from {} to {}",
            project.component(from).nice_name(),
            project.component(to).nice_name()
        ),
    }
}

/// Fills every file's `include_count` with the number of never-included
/// roots whose transitive dependency closure reaches it.
pub fn tally_include_use(project: &mut Project) {
    let roots: Vec<FileId> = project
        .files()
        .filter(|(_, f)| !f.has_include)
        .map(|(id, _)| id)
        .collect();
    for root in roots {
        for dep in transitive_dependencies(project, root) {
            project.file_mut(dep).include_count += 1;
        }
    }
}

/// Total lines pulled in through `#include`, and how often, per header.
pub fn print_include_size(project: &mut Project) {
    tally_include_use(project);

    for id in project.file_ids() {
        let file = project.file(id);
        if !file.has_include || file.include_count == 0 {
            continue;
        }
        let total: usize = transitive_dependencies(project, id)
            .iter()
            .map(|&d| project.file(d).loc)
            .sum();
        if total > 0 {
            let file = project.file(id);
            println!("{} LOC used {} times from {}", total, file.include_count, file.path);
            println!("impact {} for {}", file.include_count * total, file.path);
        }
    }
}

fn transitive_dependencies(project: &Project, from: FileId) -> Vec<FileId> {
    let mut seen: Vec<FileId> = Vec::new();
    let mut todo: Vec<FileId> = project.file(from).dependencies.iter().copied().collect();
    while let Some(next) = todo.pop() {
        if seen.contains(&next) {
            continue;
        }
        seen.push(next);
        todo.extend(project.file(next).dependencies.iter().copied());
    }
    seen
}

fn print_matching_components(
    project: &Project,
    label: &str,
    pred: impl Fn(ComponentId, &crate::core::model::Component) -> bool,
) {
    println!("{label}");
    let mut names: Vec<String> = project
        .components()
        .filter(|&(id, comp)| pred(id, comp))
        .map(|(_, comp)| comp.nice_name())
        .collect();
    names.sort();
    for name in names {
        println!("  {name}");
    }
}

fn print_name_list(
    project: &Project,
    label: &str,
    set: &std::collections::BTreeSet<ComponentId>,
) {
    println!("{label}");
    for name in project.sorted_nice_names(set) {
        println!("  {name}");
    }
}

fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let pos = name.rfind('.')?;
    Some(&name[pos + 1..])
}
