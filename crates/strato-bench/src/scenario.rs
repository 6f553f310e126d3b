//! Scenario registry: named, deterministic tree-construction recipes
//!
//! A scenario only describes how to build a tree through [`LayoutAdapter`];
//! it never holds engine state. Registration order is report order.

use crate::adapter::{Edge, FlexDirection, LayoutAdapter, NodeHandle};
use crate::bench_debug;
use crate::error::{AdapterResult, BenchError, ErrorContext, Result};
use crate::logging::LogCategory;

/// Viewport width used for every layout computation
pub const VIEWPORT_WIDTH: f32 = 800.0;
/// Viewport height used for every layout computation
pub const VIEWPORT_HEIGHT: f32 = 600.0;

/// Tree constructor. A plain function pointer, so it cannot capture state.
pub type BuildFn = fn(&mut dyn LayoutAdapter) -> AdapterResult<NodeHandle>;

/// A named recipe for building one tree
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub expected_node_count: usize,
    pub build: BuildFn,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_node_count: usize,
        build: BuildFn,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_node_count,
            build,
        }
    }

    /// Build a fresh, independently owned tree
    pub fn build(&self, adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
        (self.build)(adapter)
    }
}

/// Ordered, name-unique collection of scenarios
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    scenarios: Vec<Scenario>,
}

impl ScenarioRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The four reference scenarios, in reference order
    pub fn builtin() -> Self {
        let scenarios = vec![
            Scenario::new(
                "Simple",
                "Row of 10 growing children with fixed height and uniform margin",
                11,
                build_simple,
            ),
            Scenario::new(
                "Grid",
                "10 rows of 10 cells with margin and padding on every edge",
                111,
                build_grid,
            ),
            Scenario::new(
                "Deep",
                "Singly nested chain of 20 children with alternating padding",
                21,
                build_deep,
            ),
            Scenario::new(
                "Complex app",
                "Header (5 items), sidebar (10), content (15 sections of 3), footer (3): 84 nodes",
                84,
                build_complex_app,
            ),
        ];
        Self { scenarios }
    }

    /// Append a scenario. Names must be unique and node counts positive.
    pub fn register(&mut self, scenario: Scenario) -> Result<()> {
        if scenario.expected_node_count == 0 {
            return Err(BenchError::invalid_scenario_with_context(
                "expected node count must be positive",
                ErrorContext::new("register", "scenario").with_metadata("name", &scenario.name),
            ));
        }
        if self.get(&scenario.name).is_some() {
            return Err(BenchError::invalid_scenario_with_context(
                "duplicate scenario name",
                ErrorContext::new("register", "scenario").with_metadata("name", &scenario.name),
            ));
        }
        bench_debug!(
            LogCategory::Scenario,
            name = %scenario.name,
            nodes = scenario.expected_node_count,
            "scenario registered"
        );
        self.scenarios.push(scenario);
        Ok(())
    }

    /// Restrict to the named scenarios, keeping registry order.
    ///
    /// An empty `names` keeps everything; unknown names are rejected.
    pub fn filter(&self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = names.iter().find(|name| self.get(name).is_none()) {
            return Err(BenchError::invalid_scenario(format!(
                "unknown scenario '{}'",
                unknown
            )));
        }
        let scenarios: Vec<Scenario> = self
            .scenarios
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect();
        bench_debug!(
            LogCategory::Scenario,
            kept = scenarios.len(),
            of = self.scenarios.len(),
            "scenario filter applied"
        );
        Ok(Self { scenarios })
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScenarioRegistry {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenarios.iter()
    }
}

// =============================================================================
// Reference scenarios
// =============================================================================

fn viewport_root(
    adapter: &mut dyn LayoutAdapter,
    direction: FlexDirection,
) -> AdapterResult<NodeHandle> {
    let root = adapter.create_node()?;
    adapter.set_flex_direction(root, direction)?;
    adapter.set_width(root, VIEWPORT_WIDTH)?;
    adapter.set_height(root, VIEWPORT_HEIGHT)?;
    Ok(root)
}

fn build_simple(adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
    let root = viewport_root(adapter, FlexDirection::Row)?;

    for i in 0..10 {
        let child = adapter.create_node()?;
        adapter.set_flex_grow(child, 1.0)?;
        adapter.set_height(child, 50.0)?;
        adapter.set_margin(child, Edge::All, 5.0)?;
        adapter.insert_child(root, child, i)?;
    }

    Ok(root)
}

fn build_grid(adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
    let root = viewport_root(adapter, FlexDirection::Column)?;

    for row_index in 0..10 {
        let row = adapter.create_node()?;
        adapter.set_flex_direction(row, FlexDirection::Row)?;
        adapter.set_flex_grow(row, 1.0)?;

        for cell_index in 0..10 {
            let cell = adapter.create_node()?;
            adapter.set_flex_grow(cell, 1.0)?;
            adapter.set_margin(cell, Edge::All, 2.0)?;
            adapter.set_padding(cell, Edge::All, 4.0)?;
            adapter.insert_child(row, cell, cell_index)?;
        }

        adapter.insert_child(root, row, row_index)?;
    }

    Ok(root)
}

fn build_deep(adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
    let root = viewport_root(adapter, FlexDirection::Column)?;

    let mut parent = root;
    for i in 0..20 {
        let child = adapter.create_node()?;
        let padding = if i % 2 == 0 { 5.0 } else { 10.0 };
        adapter.set_padding(child, Edge::All, padding)?;
        adapter.set_margin(child, Edge::All, 2.0)?;
        adapter.insert_child(parent, child, 0)?;
        parent = child;
    }

    Ok(root)
}

fn build_complex_app(adapter: &mut dyn LayoutAdapter) -> AdapterResult<NodeHandle> {
    let root = viewport_root(adapter, FlexDirection::Column)?;

    let header = adapter.create_node()?;
    adapter.set_flex_direction(header, FlexDirection::Row)?;
    adapter.set_height(header, 60.0)?;
    adapter.set_padding(header, Edge::All, 10.0)?;
    for i in 0..5 {
        let item = adapter.create_node()?;
        adapter.set_width(item, 100.0)?;
        adapter.set_margin(item, Edge::Horizontal, 5.0)?;
        adapter.insert_child(header, item, i)?;
    }
    adapter.insert_child(root, header, 0)?;

    let main = adapter.create_node()?;
    adapter.set_flex_direction(main, FlexDirection::Row)?;
    adapter.set_flex_grow(main, 1.0)?;

    let sidebar = adapter.create_node()?;
    adapter.set_flex_direction(sidebar, FlexDirection::Column)?;
    adapter.set_width(sidebar, 200.0)?;
    adapter.set_padding(sidebar, Edge::All, 10.0)?;
    for i in 0..10 {
        let item = adapter.create_node()?;
        adapter.set_height(item, 40.0)?;
        adapter.set_margin(item, Edge::Bottom, 5.0)?;
        adapter.insert_child(sidebar, item, i)?;
    }
    adapter.insert_child(main, sidebar, 0)?;

    let content = adapter.create_node()?;
    adapter.set_flex_direction(content, FlexDirection::Column)?;
    adapter.set_flex_grow(content, 1.0)?;
    adapter.set_padding(content, Edge::All, 20.0)?;
    for section_index in 0..15 {
        let section = adapter.create_node()?;
        adapter.set_flex_direction(section, FlexDirection::Row)?;
        adapter.set_height(section, 100.0)?;
        adapter.set_margin(section, Edge::Bottom, 10.0)?;
        for item_index in 0..3 {
            let item = adapter.create_node()?;
            adapter.set_flex_grow(item, 1.0)?;
            adapter.set_margin(item, Edge::All, 5.0)?;
            adapter.insert_child(section, item, item_index)?;
        }
        adapter.insert_child(content, section, section_index)?;
    }
    adapter.insert_child(main, content, 1)?;
    adapter.insert_child(root, main, 1)?;

    let footer = adapter.create_node()?;
    adapter.set_flex_direction(footer, FlexDirection::Row)?;
    adapter.set_height(footer, 40.0)?;
    adapter.set_padding(footer, Edge::All, 10.0)?;
    for i in 0..3 {
        let item = adapter.create_node()?;
        adapter.set_flex_grow(item, 1.0)?;
        adapter.insert_child(footer, item, i)?;
    }
    adapter.insert_child(root, footer, 2)?;

    Ok(root)
}
