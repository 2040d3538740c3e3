use crate::error::Error;
use mlir::project::split_list;
use mlir::ProjectionPolicy;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

/// Policy file. Lists may be YAML sequences or comma separated strings.
///
/// ```yaml
/// show_types: true
/// inline_attrs: fastmath, value
/// inline_type_attrs: [bufferLoc, sharding.dims]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    show_types: Option<bool>,
    inline_attrs: Option<List>,
    inline_type_attrs: Option<List>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum List {
    Items(Vec<String>),
    Text(String),
}

impl List {
    fn join(&self) -> String {
        match self {
            List::Items(items) => items.join(","),
            List::Text(text) => text.clone(),
        }
    }
}

impl Config {
    fn open(fname: &str) -> Result<Self, Error> {
        let file = File::open(fname).map_err(|e| Error::FileOpen(fname.to_string(), e))?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| Error::Config(fname.to_string(), e))
    }

    fn apply(&self, policy: &mut ProjectionPolicy) {
        if let Some(show) = self.show_types {
            policy.show_types = show;
        }
        if let Some(list) = &self.inline_attrs {
            policy.inline_attrs = split_list(&list.join());
        }
        if let Some(list) = &self.inline_type_attrs {
            policy.inline_type_attrs = split_list(&list.join());
        }
    }
}

/// Command line side of the policy
#[derive(Debug, Default)]
pub struct Overrides {
    pub config: Option<String>,
    pub sample: bool,
    pub no_types: bool,
    pub inline_attrs: Option<String>,
    pub inline_type_attrs: Option<String>,
}

impl Overrides {
    /// Sample filters, then the config file, then flags.
    pub fn policy(&self) -> Result<ProjectionPolicy, Error> {
        let mut policy = if self.sample {
            ProjectionPolicy::sample()
        } else {
            ProjectionPolicy::default()
        };
        if let Some(fname) = &self.config {
            Config::open(fname)?.apply(&mut policy);
        }
        if self.no_types {
            policy.show_types = false;
        }
        if let Some(list) = &self.inline_attrs {
            policy.inline_attrs = split_list(list);
        }
        if let Some(list) = &self.inline_type_attrs {
            policy.inline_type_attrs = split_list(list);
        }
        Ok(policy)
    }
}
