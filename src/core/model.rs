use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Handle into the project's file registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

/// Handle into the project's component registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(u32);

/// One source file, keyed by its slash-normalized path relative to the
/// analysis root (no `./` prefix).
#[derive(Debug, Clone)]
pub struct File {
    pub path: String,
    pub loc: usize,
    /// Raw include text mapped to its form (`true` for angle brackets).
    pub raw_includes: BTreeMap<String, bool>,
    /// Resolved targets of this file's includes.
    pub dependencies: BTreeSet<FileId>,
    /// Include-search-path fragments dependents need to find this file,
    /// relative to the owning component's root.
    pub include_paths: BTreeSet<String>,
    pub component: Option<ComponentId>,
    /// How many translation units transitively pull this file in. Filled by
    /// the include-size report only.
    pub include_count: usize,
    /// Included by a file of another component.
    pub has_external_include: bool,
    /// Included by anything at all (local quote matches excluded).
    pub has_include: bool,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            loc: 0,
            raw_includes: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            include_paths: BTreeSet::new(),
            component: None,
            include_count: 0,
            has_external_include: false,
            has_include: false,
        }
    }

    pub fn add_include_stmt(&mut self, angle: bool, text: impl Into<String>) {
        self.raw_includes.insert(text.into(), angle);
    }

    /// Directory part of the path, `""` for root-level files.
    pub fn dir(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentKind {
    Library,
    Executable,
    #[default]
    Unknown,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Library => "library",
            ComponentKind::Executable => "executable",
            ComponentKind::Unknown => "unknown",
        }
    }
}

/// A buildable unit: the directory holding a build file, owning every code
/// file beneath it not claimed by a deeper component.
#[derive(Debug, Clone)]
pub struct Component {
    /// Directory relative to the analysis root, `"."` for the root itself.
    pub root: String,
    /// Declared project name, empty when the build file declares none.
    pub name: String,
    pub kind: ComponentKind,
    pub files: BTreeSet<FileId>,
    pub pub_deps: BTreeSet<ComponentId>,
    pub priv_deps: BTreeSet<ComponentId>,
    pub pub_links: BTreeSet<ComponentId>,
    pub priv_links: BTreeSet<ComponentId>,
    /// Direct dependencies that close a cycle back to this component.
    pub circulars: BTreeSet<ComponentId>,
    /// Producer roots whose generated outputs this component includes.
    pub build_afters: BTreeSet<String>,
    /// Build file carries the regeneration tag and may be overwritten.
    pub recreate: bool,
    /// A CMakeAddon.txt sits next to the build file.
    pub has_addon: bool,
    // Tarjan bookkeeping; index 0 means unvisited.
    pub index: usize,
    pub lowlink: usize,
    pub on_stack: bool,
    /// Tombstone left by a drop; dead components keep their slot so handles
    /// stay valid, but every accessor skips them.
    pub dead: bool,
}

impl Component {
    fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            name: String::new(),
            kind: ComponentKind::Unknown,
            files: BTreeSet::new(),
            pub_deps: BTreeSet::new(),
            priv_deps: BTreeSet::new(),
            pub_links: BTreeSet::new(),
            priv_links: BTreeSet::new(),
            circulars: BTreeSet::new(),
            build_afters: BTreeSet::new(),
            recreate: false,
            has_addon: false,
            index: 0,
            lowlink: 0,
            on_stack: false,
            dead: false,
        }
    }

    /// Human-facing name: `ROOT` for the root component, otherwise the root
    /// path with dots for slashes.
    pub fn nice_name(&self) -> String {
        if self.root == "." {
            "ROOT".to_string()
        } else {
            self.root.replace('/', ".")
        }
    }

    /// The name the build system knows this component by: the declared
    /// project name, unless the build file is regenerated or declares none.
    pub fn cmake_name(&self) -> String {
        if self.name.is_empty() || self.recreate {
            self.nice_name()
        } else {
            self.name.clone()
        }
    }

    /// Union of public and private dependencies.
    pub fn all_deps(&self) -> BTreeSet<ComponentId> {
        self.pub_deps.union(&self.priv_deps).copied().collect()
    }
}

/// Outcome stored in the include lookup table for one path suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupEntry {
    /// Exactly one file carries this suffix.
    Unique(FileId),
    /// Multiple files carry it; candidates live in the collision map.
    Ambiguous,
    /// A declared build output; payload is the producer component's root.
    Generated(String),
}

/// The whole analyzed code base: file and component registries plus the
/// derived lookup tables. Registries are append-only arenas, so handles taken
/// at any point stay valid for the project's lifetime.
#[derive(Debug, Default)]
pub struct Project {
    files: Vec<File>,
    components: Vec<Component>,
    file_index: HashMap<String, FileId>,
    component_index: HashMap<String, ComponentId>,
    /// Lowercased path suffix to resolution outcome.
    pub include_lookup: HashMap<String, LookupEntry>,
    /// Suffix to every path contributing to its ambiguity.
    pub collisions: BTreeMap<String, BTreeSet<String>>,
    /// Ambiguous include text actually seen, to the files that used it.
    pub ambiguous: BTreeMap<String, Vec<String>>,
    /// Declared generated output path to its producer component's root.
    pub generated: BTreeMap<String, String>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file, returning the existing handle if the path is
    /// already known.
    pub fn add_file(&mut self, file: File) -> FileId {
        if let Some(&id) = self.file_index.get(&file.path) {
            return id;
        }
        let id = FileId(self.files.len() as u32);
        self.file_index.insert(file.path.clone(), id);
        self.files.push(file);
        id
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0 as usize]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut File {
        &mut self.files[id.0 as usize]
    }

    pub fn file_id(&self, path: &str) -> Option<FileId> {
        self.file_index.get(path).copied()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &File)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    pub fn file_ids(&self) -> Vec<FileId> {
        (0..self.files.len() as u32).map(FileId).collect()
    }

    /// Defines the component rooted at `root`, returning the existing handle
    /// when it is already defined.
    pub fn add_component_definition(&mut self, root: &str) -> ComponentId {
        if let Some(&id) = self.component_index.get(root) {
            return id;
        }
        let id = ComponentId(self.components.len() as u32);
        self.component_index.insert(root.to_string(), id);
        self.components.push(Component::new(root));
        id
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.0 as usize]
    }

    pub fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.0 as usize]
    }

    /// Live component rooted at `root`, if any.
    pub fn component_id(&self, root: &str) -> Option<ComponentId> {
        self.component_index
            .get(root)
            .copied()
            .filter(|&id| !self.component(id).dead)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.dead)
            .map(|(i, c)| (ComponentId(i as u32), c))
    }

    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components().map(|(id, _)| id).collect()
    }

    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    pub fn component_loc(&self, id: ComponentId) -> usize {
        self.component(id)
            .files
            .iter()
            .map(|&fid| self.file(fid).loc)
            .sum()
    }

    pub fn sorted_nice_names(&self, set: &BTreeSet<ComponentId>) -> Vec<String> {
        let mut names: Vec<String> = set
            .iter()
            .map(|&id| self.component(id).nice_name())
            .collect();
        names.sort();
        names
    }

    /// Components participating in at least one cycle.
    pub fn nodes_with_cycles(&self) -> usize {
        self.components()
            .filter(|(_, c)| !c.circulars.is_empty())
            .count()
    }

    /// Drops components that ended up owning no files. Build files often sit
    /// in folders holding only other folders; those define nothing useful.
    pub fn forget_empty_components(&mut self) {
        let empty: Vec<ComponentId> = self
            .components()
            .filter(|(_, c)| c.files.is_empty())
            .map(|(id, _)| id)
            .collect();
        for id in empty {
            self.retire_component(id);
        }
    }

    pub(crate) fn retire_component(&mut self, id: ComponentId) {
        let root = self.components[id.0 as usize].root.clone();
        self.component_index.remove(&root);
        self.components[id.0 as usize].dead = true;
    }
}

/// Maps a user-supplied target to a component root: `ROOT` means the analysis
/// root, dotted names mean nested folders.
pub fn target_from(arg: &str) -> String {
    let trimmed = arg.trim_end_matches('/');
    if trimmed == "ROOT" || trimmed == "." || trimmed.is_empty() {
        ".".to_string()
    } else {
        trimmed.replace('.', "/")
    }
}
