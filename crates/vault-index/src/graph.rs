//! Graph data for the force-directed note visualisations.
//!
//! [`LinkGraph`] tracks resolved wiki-link connections between notes (forward
//! links and backlinks, keyed by vault path). [`folder_graph`] needs no note
//! contents and connects notes to folder hubs instead.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::Serialize;
use wiki_links::parse_wiki_links;

use crate::note::NoteRef;
use crate::resolve::LinkResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Note,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Note path, or `folder:<path>` for folder hubs
    pub id: String,
    pub label: String,
    /// Top-level folder, used by the client for colouring
    pub group: String,
    pub kind: NodeKind,
    /// Number of links touching this node
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
}

/// Nodes and links in the shape force-graph libraries expect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build from a node set and undirected edges, filling in degrees.
    fn assemble(nodes: Vec<NodeSpec>, edges: &BTreeSet<(String, String)>) -> Self {
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for (a, b) in edges {
            *degree.entry(a.as_str()).or_default() += 1;
            *degree.entry(b.as_str()).or_default() += 1;
        }

        let nodes = nodes
            .into_iter()
            .map(|node| GraphNode {
                degree: degree.get(node.id.as_str()).copied().unwrap_or(0),
                id: node.id,
                label: node.label,
                group: node.group,
                kind: node.kind,
            })
            .collect();
        let links = edges
            .iter()
            .map(|(source, target)| GraphLink {
                source: source.clone(),
                target: target.clone(),
            })
            .collect();

        Self { nodes, links }
    }
}

/// A node before its degree is known.
struct NodeSpec {
    id: String,
    label: String,
    group: String,
    kind: NodeKind,
}

impl NodeSpec {
    fn note(note: &NoteRef) -> Self {
        Self {
            id: note.path.clone(),
            label: note.name.clone(),
            group: group_of(&note.folder),
            kind: NodeKind::Note,
        }
    }

    fn folder(folder: &str) -> Self {
        Self {
            id: folder_id(folder),
            label: folder.rsplit('/').next().unwrap_or(folder).to_string(),
            group: group_of(folder),
            kind: NodeKind::Folder,
        }
    }
}

fn group_of(folder: &str) -> String {
    folder.split('/').next().unwrap_or_default().to_string()
}

fn edge(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Tracks resolved links between notes in the vault.
///
/// Both directions are kept so neighbourhoods can be walked without
/// rescanning note contents:
/// - Forward links: which notes does a given note link TO
/// - Backlinks: which notes link TO a given note
#[derive(Debug, Default)]
pub struct LinkGraph {
    notes: BTreeMap<String, NoteRef>,
    forward_links: HashMap<String, HashSet<String>>,
    backlinks: HashMap<String, HashSet<String>>,
}

impl LinkGraph {
    /// Create a graph with every listed note as an unconnected node.
    pub fn new(notes: &[NoteRef]) -> Self {
        Self {
            notes: notes.iter().map(|n| (n.path.clone(), n.clone())).collect(),
            ..Default::default()
        }
    }

    /// Extract and resolve the wiki links in a note's content and record them.
    ///
    /// Embeds of non-note files (images, PDFs) are ignored.
    pub fn index_note(&mut self, path: &str, content: &str, resolver: &LinkResolver<'_>) {
        let targets: HashSet<String> = parse_wiki_links(content)
            .iter()
            .filter(|link| {
                !link.is_embed
                    || link
                        .extension
                        .as_deref()
                        .is_none_or(|ext| ext.eq_ignore_ascii_case("md"))
            })
            .filter_map(|link| resolver.resolve_link(link, Some(path)))
            .map(|resolution| resolution.note.path.clone())
            .collect();

        self.update_note(path, targets);
    }

    /// Replace a note's outgoing links.
    ///
    /// Links to unknown paths and to the note itself are dropped.
    pub fn update_note(&mut self, path: &str, targets: HashSet<String>) {
        if !self.notes.contains_key(path) {
            return;
        }

        // Remove old backlinks for this path
        if let Some(old_targets) = self.forward_links.remove(path) {
            for target in old_targets {
                if let Some(sources) = self.backlinks.get_mut(&target) {
                    sources.remove(path);
                }
            }
        }

        let targets: HashSet<String> = targets
            .into_iter()
            .filter(|t| t != path && self.notes.contains_key(t))
            .collect();

        for target in &targets {
            self.backlinks
                .entry(target.clone())
                .or_default()
                .insert(path.to_string());
        }
        self.forward_links.insert(path.to_string(), targets);
    }

    /// Paths this note links to
    pub fn forward_links(&self, path: &str) -> Option<&HashSet<String>> {
        self.forward_links.get(path)
    }

    /// Paths linking to this note
    pub fn backlinks(&self, path: &str) -> Option<&HashSet<String>> {
        self.backlinks.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.notes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total number of distinct connections between notes
    pub fn total_links(&self) -> usize {
        self.edges().len()
    }

    /// All connected paths for a note: its forward links and backlinks.
    pub fn neighborhood(&self, path: &str) -> HashSet<String> {
        let mut neighborhood = HashSet::new();
        if let Some(forward) = self.forward_links(path) {
            neighborhood.extend(forward.iter().cloned());
        }
        if let Some(back) = self.backlinks(path) {
            neighborhood.extend(back.iter().cloned());
        }
        neighborhood
    }

    fn edges(&self) -> BTreeSet<(String, String)> {
        self.forward_links
            .iter()
            .flat_map(|(source, targets)| targets.iter().map(move |t| edge(source, t)))
            .collect()
    }

    /// The whole vault as graph data.
    pub fn to_graph_data(&self) -> GraphData {
        let nodes = self.notes.values().map(NodeSpec::note).collect();
        GraphData::assemble(nodes, &self.edges())
    }

    /// The part of the graph within `depth` hops of `focus`.
    ///
    /// Returns an empty graph when `focus` is not a known note.
    pub fn local_graph(&self, focus: &str, depth: usize) -> GraphData {
        if !self.contains(focus) {
            return GraphData::default();
        }

        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut queue = VecDeque::from([(focus.to_string(), 0)]);
        visited.insert(focus.to_string());

        while let Some((path, distance)) = queue.pop_front() {
            if distance == depth {
                continue;
            }
            for next in self.neighborhood(&path) {
                if visited.insert(next.clone()) {
                    queue.push_back((next, distance + 1));
                }
            }
        }

        let edges: BTreeSet<(String, String)> = self
            .edges()
            .into_iter()
            .filter(|(a, b)| visited.contains(a) && visited.contains(b))
            .collect();
        let nodes = visited
            .iter()
            .filter_map(|path| self.notes.get(path))
            .map(NodeSpec::note)
            .collect();

        GraphData::assemble(nodes, &edges)
    }
}

/// Graph of notes hanging off their folders.
///
/// Each note links to its folder hub and each folder hub to its parent hub.
/// Root notes are unconnected.
pub fn folder_graph(notes: &[NoteRef]) -> GraphData {
    let mut folders: BTreeSet<String> = BTreeSet::new();
    let mut edges: BTreeSet<(String, String)> = BTreeSet::new();

    for note in notes {
        if note.folder.is_empty() {
            continue;
        }
        edges.insert(edge(&note.path, &folder_id(&note.folder)));

        // Register the folder and all its ancestors
        let mut folder = note.folder.as_str();
        loop {
            if !folders.insert(folder.to_string()) {
                break;
            }
            match folder.rsplit_once('/') {
                Some((parent, _)) => {
                    edges.insert(edge(&folder_id(folder), &folder_id(parent)));
                    folder = parent;
                }
                None => break,
            }
        }
    }

    let mut nodes: Vec<NodeSpec> = folders.iter().map(|f| NodeSpec::folder(f)).collect();
    nodes.extend(notes.iter().map(NodeSpec::note));

    GraphData::assemble(nodes, &edges)
}

fn folder_id(folder: &str) -> String {
    format!("folder:{}", folder)
}
