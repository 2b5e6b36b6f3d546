use crate::core::model::{ComponentId, Project};

/// Annotates every component's `circulars` set with the direct dependencies
/// that close a cycle back to it: both endpoints of such an edge sit in the
/// same non-trivial strongly connected component.
///
/// Tarjan's algorithm over the union of public and private dependency edges
/// (self-edges are already scrubbed by classification). When a root finishes
/// its strongly connected component, every member popped with it is stamped
/// with the root's index; distinct SCCs carry distinct stamps, so an edge
/// closes a cycle exactly when both endpoints share a stamp. Raw lowlinks are
/// not comparable for this: a member that took its back-edge early can hold a
/// lowlink the rest of the SCC never converged to.
///
/// The traversal uses an explicit stack; recursion depth would otherwise be
/// bounded by the longest dependency chain, which pathological graphs can
/// make arbitrarily deep.
///
/// Results are additive. Fresh runs over a changed graph need `circulars`
/// cleared first, which `load_project` (fresh arenas) and `kill_component`
/// take care of.
pub fn find_circular_dependencies(project: &mut Project) {
    let ids = project.component_ids();
    for &id in &ids {
        let comp = project.component_mut(id);
        comp.index = 0;
        comp.lowlink = 0;
        comp.on_stack = false;
    }

    let mut next_index = 1usize;
    let mut scc_stack: Vec<ComponentId> = Vec::new();
    for &id in &ids {
        if project.component(id).index == 0 {
            strong_connect(project, id, &mut next_index, &mut scc_stack);
        }
    }
}

struct Frame {
    id: ComponentId,
    successors: Vec<ComponentId>,
    next: usize,
}

fn strong_connect(
    project: &mut Project,
    root: ComponentId,
    next_index: &mut usize,
    scc_stack: &mut Vec<ComponentId>,
) {
    let mut call_stack = vec![visit(project, root, next_index, scc_stack)];

    loop {
        let (v, pending) = match call_stack.last_mut() {
            Some(frame) => {
                let v = frame.id;
                if frame.next < frame.successors.len() {
                    let w = frame.successors[frame.next];
                    frame.next += 1;
                    (v, Some(w))
                } else {
                    (v, None)
                }
            }
            None => break,
        };

        if let Some(w) = pending {
            if project.component(w).index == 0 {
                call_stack.push(visit(project, w, next_index, scc_stack));
            } else if project.component(w).on_stack {
                let w_lowlink = project.component(w).lowlink;
                let comp = project.component_mut(v);
                comp.lowlink = comp.lowlink.min(w_lowlink);
            }
            continue;
        }

        call_stack.pop();
        let v_lowlink = project.component(v).lowlink;
        if let Some(parent) = call_stack.last() {
            let comp = project.component_mut(parent.id);
            comp.lowlink = comp.lowlink.min(v_lowlink);
        }

        if v_lowlink == project.component(v).index {
            // v roots a completed SCC; everything popped down to v belongs to
            // it. Stamp the members first, then read membership off the stamp.
            let root_index = project.component(v).index;
            let mut members = Vec::new();
            while let Some(w) = scc_stack.pop() {
                let comp = project.component_mut(w);
                comp.on_stack = false;
                comp.lowlink = root_index;
                members.push(w);
                if w == v {
                    break;
                }
            }
            for &w in &members {
                for s in successors_of(project, w) {
                    if s != w && project.component(s).lowlink == root_index {
                        project.component_mut(w).circulars.insert(s);
                    }
                }
            }
        }
    }
}

fn visit(
    project: &mut Project,
    id: ComponentId,
    next_index: &mut usize,
    scc_stack: &mut Vec<ComponentId>,
) -> Frame {
    let successors = successors_of(project, id);
    let comp = project.component_mut(id);
    comp.index = *next_index;
    comp.lowlink = *next_index;
    comp.on_stack = true;
    *next_index += 1;
    scc_stack.push(id);
    Frame {
        id,
        successors,
        next: 0,
    }
}

fn successors_of(project: &Project, id: ComponentId) -> Vec<ComponentId> {
    project
        .component(id)
        .all_deps()
        .into_iter()
        .filter(|&dep| !project.component(dep).dead)
        .collect()
}

/// Removes a component from the graph entirely: every other component's
/// dependency and link sets forget it, its files lose their owner, and all
/// cached cycle data is invalidated project-wide (removing a node changes
/// which edges participate in cycles, and recomputing is cheaper than
/// incremental repair). Re-run [`find_circular_dependencies`] afterward for
/// fresh cycle data.
///
/// Returns `false` when no live component matches `target`.
pub fn kill_component(project: &mut Project, target: &str) -> bool {
    let Some(id) = project.component_id(target) else {
        return false;
    };
    for other in project.component_ids() {
        let comp = project.component_mut(other);
        comp.pub_deps.remove(&id);
        comp.priv_deps.remove(&id);
        comp.pub_links.remove(&id);
        comp.priv_links.remove(&id);
        comp.circulars.clear();
    }
    let files: Vec<_> = project.component(id).files.iter().copied().collect();
    for fid in files {
        project.file_mut(fid).component = None;
    }
    project.retire_component(id);
    true
}
