//! Reference model of the page's interaction state. The JavaScript embedded
//! in the view template implements the same transitions over the same data.

use crate::view_model::ViewModel;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Query typed into the search box.
    Search(String),
    ClickNode(String),
    ClickBackground,
    ClearSearch,
    ToggleSecondDegree,
    Recenter,
    CenterMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    None,
    Node(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub focus: Focus,
    pub second_degree: bool,
    pub query: String,
    pub results: Vec<String>,
    /// Bumped on every fit-to-screen request.
    pub fit_requests: u32,
}

/// Highlight tiers for the focused node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    pub focused: Option<String>,
    pub direct: Vec<String>,
    pub second: Vec<String>,
}

/// Contents of the statistics panel.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStats {
    pub id: String,
    pub label: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub direct: usize,
    pub second: usize,
}

impl ViewState {
    pub fn new(model: &ViewModel) -> Self {
        Self {
            focus: Focus::None,
            second_degree: model.second_degree,
            query: String::new(),
            results: Vec::new(),
            fit_requests: 0,
        }
    }

    pub fn apply(&mut self, model: &ViewModel, event: ViewEvent) {
        match event {
            ViewEvent::Search(query) => {
                self.results = search(model, &query)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                self.query = query;
                if self.query.trim().is_empty() {
                    self.focus = Focus::None;
                } else if let Some(first) = self.results.first() {
                    self.focus = Focus::Node(first.clone());
                }
            }
            ViewEvent::ClickNode(id) => {
                if model.node(&id).is_some() {
                    self.focus = Focus::Node(id);
                }
            }
            ViewEvent::ClickBackground | ViewEvent::ClearSearch => {
                self.clear_search();
                self.focus = Focus::None;
            }
            ViewEvent::ToggleSecondDegree => {
                self.second_degree = !self.second_degree;
            }
            ViewEvent::Recenter => {
                self.clear_search();
                self.focus = Focus::Node(model.start.clone());
            }
            ViewEvent::CenterMap => {
                self.fit_requests += 1;
            }
        }
    }

    fn clear_search(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    pub fn highlight(&self, model: &ViewModel) -> Highlight {
        let Focus::Node(id) = &self.focus else {
            return Highlight::default();
        };
        let Some(node) = model.node(id) else {
            return Highlight::default();
        };
        Highlight {
            focused: Some(node.id.clone()),
            direct: node.neighbors.clone(),
            second: if self.second_degree {
                node.second_neighbors.clone()
            } else {
                Vec::new()
            },
        }
    }

    pub fn stats(&self, model: &ViewModel) -> Option<NodeStats> {
        let Focus::Node(id) = &self.focus else {
            return None;
        };
        let node = model.node(id)?;
        Some(NodeStats {
            id: node.id.clone(),
            label: node.label.clone(),
            in_degree: node.in_degree,
            out_degree: node.out_degree,
            direct: node.neighbors.len(),
            second: node.second_neighbors.len(),
        })
    }
}

/// Case-insensitive substring match on id or label. Exact matches come
/// first, then the remaining hits in node order.
pub fn search<'m>(model: &'m ViewModel, query: &str) -> Vec<&'m str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut exact = Vec::new();
    let mut partial = Vec::new();
    for node in &model.nodes {
        let id = node.id.to_lowercase();
        let label = node.label.to_lowercase();
        if id == needle || label == needle {
            exact.push(node.id.as_str());
        } else if id.contains(&needle) || label.contains(&needle) {
            partial.push(node.id.as_str());
        }
    }
    exact.extend(partial);
    exact
}
