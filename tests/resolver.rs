use incdeps::core::lookup::build_include_lookup;
use incdeps::core::model::{File, FileId, Project};
use incdeps::core::resolver::{
    map_includes_to_dependencies, mark_ambiguous_candidates, resolve_include, Resolution,
};

fn add_file(project: &mut Project, path: &str, includes: &[(&str, bool)]) -> FileId {
    let mut file = File::new(path);
    for &(text, angle) in includes {
        file.add_include_stmt(angle, text);
    }
    project.add_file(file)
}

/// Defines a component and hands it every file under its root.
fn own(project: &mut Project, root: &str, files: &[FileId]) -> incdeps::core::ComponentId {
    let id = project.add_component_definition(root);
    for &fid in files {
        project.file_mut(fid).component = Some(id);
        project.component_mut(id).files.insert(fid);
    }
    id
}

#[test]
fn quoted_sibling_beats_an_ambiguous_lookup() {
    let mut project = Project::new();
    let a = add_file(&mut project, "comp/src/a.cpp", &[("b.h", false)]);
    let sibling = add_file(&mut project, "comp/src/b.h", &[]);
    let other = add_file(&mut project, "comp/other/b.h", &[]);
    own(&mut project, "comp", &[a, sibling, other]);
    build_include_lookup(&mut project);

    assert_eq!(
        resolve_include(&project, a, "b.h", false),
        Resolution::LocalMatch(sibling)
    );

    map_includes_to_dependencies(&mut project);
    assert!(project.file(a).dependencies.contains(&sibling));
    assert!(project.ambiguous.is_empty());
    // local matches never count as "included" for the unused-file report
    assert!(!project.file(sibling).has_include);
}

#[test]
fn quoted_parent_traversal_resolves_locally() {
    let mut project = Project::new();
    let a = add_file(&mut project, "comp/src/a.cpp", &[("../inc/b.h", false)]);
    let b = add_file(&mut project, "comp/inc/b.h", &[]);
    own(&mut project, "comp", &[a, b]);
    build_include_lookup(&mut project);

    assert_eq!(
        resolve_include(&project, a, "../inc/b.h", false),
        Resolution::LocalMatch(b)
    );
}

#[test]
fn cross_component_include_creates_private_edge_and_flags() {
    let mut project = Project::new();
    let main = add_file(&mut project, "app/main.cpp", &[("util/str.h", true)]);
    let header = add_file(&mut project, "lib/util/str.h", &[]);
    let app = own(&mut project, "app", &[main]);
    let lib = own(&mut project, "lib", &[header]);
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.file(main).dependencies.contains(&header));
    assert!(project.component(app).priv_deps.contains(&lib));
    assert!(project.component(lib).priv_links.contains(&app));
    assert!(project.file(header).has_external_include);
    assert!(project.file(header).has_include);
    // path fragment: "lib/util/str.h" minus "util/str.h" minus root "lib"
    assert!(project.file(header).include_paths.contains("."));
}

#[test]
fn include_path_fragment_strips_the_component_root() {
    let mut project = Project::new();
    let main = add_file(&mut project, "app/main.cpp", &[("foo/bar.h", true)]);
    let header = add_file(&mut project, "lib/include/foo/bar.h", &[]);
    own(&mut project, "app", &[main]);
    own(&mut project, "lib", &[header]);
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.file(header).include_paths.contains("include"));
}

#[test]
fn same_directory_include_needs_no_fragment() {
    let mut project = Project::new();
    let a = add_file(&mut project, "comp/a.cpp", &[("b.h", true)]);
    let b = add_file(&mut project, "comp/b.h", &[]);
    own(&mut project, "comp", &[a, b]);
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.file(a).dependencies.contains(&b));
    assert!(project.file(b).include_paths.is_empty());
    // same component, no external include
    assert!(!project.file(b).has_external_include);
}

#[test]
fn ambiguous_include_is_recorded_not_resolved() {
    let mut project = Project::new();
    let user = add_file(&mut project, "app/use.cpp", &[("foo.h", true)]);
    let x = add_file(&mut project, "x/foo.h", &[]);
    let y = add_file(&mut project, "y/foo.h", &[]);
    own(&mut project, "app", &[user]);
    own(&mut project, "x", &[x]);
    own(&mut project, "y", &[y]);
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.file(user).dependencies.is_empty());
    assert_eq!(
        project.ambiguous.get("foo.h"),
        Some(&vec!["app/use.cpp".to_string()])
    );

    // conservative policy: every candidate might be the real target
    mark_ambiguous_candidates(&mut project);
    assert!(project.file(x).has_include);
    assert!(project.file(y).has_include);
}

#[test]
fn generated_target_becomes_a_build_order_obligation() {
    let mut project = Project::new();
    let main = add_file(&mut project, "app/main.cpp", &[("proto.h", true)]);
    let gen_src = add_file(&mut project, "gen/gen.cpp", &[]);
    let app = own(&mut project, "app", &[main]);
    let gen = own(&mut project, "gen", &[gen_src]);
    project
        .generated
        .insert("gen/proto.h".to_string(), "gen".to_string());
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.component(app).build_afters.contains("gen"));
    assert!(project.component(app).priv_deps.contains(&gen));
    assert!(project.component(gen).priv_links.contains(&app));
    assert!(project.file(main).dependencies.is_empty());
}

#[test]
fn out_of_tree_include_is_silently_ignored() {
    let mut project = Project::new();
    let main = add_file(&mut project, "app/main.cpp", &[("vector", true), ("cstdio", true)]);
    own(&mut project, "app", &[main]);
    build_include_lookup(&mut project);
    map_includes_to_dependencies(&mut project);

    assert!(project.file(main).dependencies.is_empty());
    assert!(project.ambiguous.is_empty());
}
