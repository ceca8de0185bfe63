//! The root resource: owns the tree, compiles it into a [`RouteTable`], and generates URLs.

mod table;

pub use table::{RouteEntry, RouteRef, RouteTable};

use crate::config::{self, RouterOptions};
use crate::error::{ConfigError, RouterError};
use crate::resource::{group_fn, nest, Group, Resource, Scope};
use crate::state::Phase;
use crate::tree::{NodeId, ResourceKind, RouteTree, Segment};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const ROOT_NAME: &str = "ROUTER";
const PLACEHOLDER: &str = r"\{([^{}/]+)\}";

/// Characters a parameter value may not carry into a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub struct Router {
    tree: RouteTree,
    options: RouterOptions,
    table: RouteTable,
    phase: Phase,
}

impl Router {
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    /// Options are taken as given; see [`Router::from_options`] for the checked form.
    pub fn with_options(options: RouterOptions) -> Self {
        Router {
            tree: RouteTree::new(ROOT_NAME),
            options,
            table: RouteTable::default(),
            phase: Phase::Assembling,
        }
    }

    pub fn from_options(options: RouterOptions) -> Result<Self, RouterError> {
        config::validate(&options)?;
        Ok(Self::with_options(options))
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run `build` against the root, then rebuild the table.
    pub fn add<F>(&mut self, build: F) -> Result<&RouteTable, RouterError>
    where
        F: FnOnce(&mut Router),
    {
        build(self);
        self.build()
    }

    /// Recompute the table from scratch. The previous table is discarded even if this fails.
    pub fn build(&mut self) -> Result<&RouteTable, RouterError> {
        self.table = RouteTable::default();
        self.phase = Phase::Assembling;
        if let Some(err) = self.tree.error() {
            return Err(err.clone());
        }

        let mut visited = Vec::new();
        self.tree
            .visit(self.tree.root(), "", self.options.root_path(), &mut visited);

        let mut table = RouteTable::default();
        for route in visited {
            tracing::debug!(name = %route.name, path = %route.path, "route");
            table.insert(route)?;
        }
        tracing::info!(routes = table.len(), base_path = %self.options.root_path(), "route table built");

        self.table = table;
        self.phase = Phase::Built;
        Ok(&self.table)
    }

    /// Table from the last successful [`Router::build`].
    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// Built route by canonical name.
    pub fn get(&self, name: &str) -> Option<RouteRef<'_>> {
        self.table
            .get(name)
            .and_then(|entry| RouteRef::new(&self.tree, entry))
    }

    pub fn iter(&self) -> impl Iterator<Item = RouteRef<'_>> {
        self.table
            .iter()
            .filter_map(|entry| RouteRef::new(&self.tree, entry))
    }

    /// URL of a built route with every `{param}` filled in. Values are percent-encoded as one path
    /// segment each. Extra params are ignored.
    pub fn href<I, K, V>(&self, name: &str, params: I) -> Result<String, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let entry = self
            .table
            .get(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        let params: HashMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        let re = placeholders()?;
        if let Some(missing) = re
            .captures_iter(&entry.path)
            .map(|caps| caps[1].to_string())
            .find(|param| !params.contains_key(param))
        {
            return Err(RouterError::MissingParam {
                route: name.to_string(),
                param: missing,
            });
        }
        let path = re.replace_all(&entry.path, |caps: &Captures| {
            utf8_percent_encode(&params[&caps[1]], SEGMENT).to_string()
        });

        Ok(match self.options.base_url.as_deref() {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path.into_owned(),
        })
    }
}

/// Matches `{param}` placeholders in a built path; group 1 is the parameter name. Compiled once.
pub(crate) fn placeholders() -> Result<&'static Regex, RouterError> {
    static PLACEHOLDERS: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PLACEHOLDERS.get() {
        return Ok(re);
    }
    let re = Regex::new(PLACEHOLDER).map_err(|e| ConfigError::Validation(e.to_string()))?;
    Ok(PLACEHOLDERS.get_or_init(|| re))
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope for Router {
    fn tree(&self) -> &RouteTree {
        &self.tree
    }

    fn tree_mut(&mut self) -> &mut RouteTree {
        self.phase = Phase::Assembling;
        &mut self.tree
    }

    fn id(&self) -> NodeId {
        self.tree.root()
    }
}

impl Resource for Router {}

impl Router {
    group_fn!(Group, ResourceKind::Group);
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("phase", &self.phase)
            .field("routes", &self.table.len())
            .finish()
    }
}
