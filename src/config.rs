// MIT License
//
// Copyright (c) 2016 Alexander Thaller <alexander.thaller@trivago.com>
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Installer configuration.
//!
//! The configuration file is YAML. Every top level scalar is a setting, the
//! `deployment` key describes hosts, roles and cluster wide variables:
//!
//! ```yaml
//! variant: openshift-enterprise
//! variant_version: 3.2
//! ansible_ssh_user: root
//! ansible_inventory_path: /root/.config/openshift/hosts
//! deployment:
//!   hosts:
//!   - connect_to: master.example.com
//!     roles: [master, node]
//!   roles:
//!     master:
//!     node:
//!       variables:
//!         osm_default_node_selector: region=primary
//! ```

use crate::error::{Error, Result};
use crate::host::Host;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::env;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};

/// A scalar from the configuration file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Value {
    /// Null, empty strings and `false` are not worth writing out. Numbers
    /// always are, zero included.
    pub fn is_truthy(&self) -> bool {
        match *self {
            Value::Bool(b) => b,
            Value::Text(ref s) => !s.is_empty(),
            Value::Integer(_) | Value::Float(_) => true,
            Value::Null => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Bool(b) => write!(f, "{}", inventory_bool(b)),
            Value::Integer(i) => write!(f, "{}", i),
            // `3.0` must not turn into `3`, versions are compared as text.
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Text(ref s) => write!(f, "{}", s),
            Value::Null => Ok(()),
        }
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Value::Text(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

/// Booleans as the inventory parser spells them.
pub fn inventory_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

pub type Variables = IndexMap<String, Value>;

/// Global installer settings in file order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Settings(pub Variables);

impl Settings {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The rendered value of a setting, `None` when the key is absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.to_string())
    }

    pub fn required(&self, key: &str) -> Result<String> {
        self.text(key).ok_or_else(|| Error::MissingSetting(key.to_string()))
    }

    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn iter(&self) -> indexmap::map::Iter<String, Value> {
        self.0.iter()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RoleConfig {
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Deployment {
    /// Order decides the order of the inventory groups.
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: IndexMap<String, RoleConfig>,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
}

/// Roles without variables are usually written as `master:` which is null in
/// YAML.
fn deserialize_roles<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, RoleConfig>, D::Error>
    where D: Deserializer<'de>
{
    let roles: IndexMap<String, Option<RoleConfig>> = Deserialize::deserialize(deserializer)?;

    Ok(roles.into_iter()
        .map(|(name, role)| (name, role.unwrap_or_default()))
        .collect())
}

/// An empty `variables:` key is null in YAML and means no variables.
pub fn deserialize_variables<'de, D>(deserializer: D) -> std::result::Result<Variables, D::Error>
    where D: Deserializer<'de>
{
    let variables: Option<Variables> = Deserialize::deserialize(deserializer)?;
    Ok(variables.unwrap_or_default())
}

/// Version numbers are written unquoted, `3.10` has to stay `3.10`.
#[derive(Debug, Deserialize)]
struct VersionText {
    #[serde(default)]
    variant_version: Option<String>,
}

/// The `deployment` section as it appears in the file.
#[derive(Debug, Deserialize)]
struct DeploymentFile {
    #[serde(default)]
    hosts: Vec<Host>,
    #[serde(flatten)]
    deployment: Deployment,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    deployment: Option<DeploymentFile>,
    #[serde(flatten)]
    settings: Variables,
}

/// Snapshot of the process environment taken once per command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment(IndexMap<String, String>);

impl Environment {
    pub fn from_process() -> Environment {
        Environment(env::vars().collect())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|value| value.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

/// Everything one installer command works with.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub settings: Settings,
    pub deployment: Deployment,
    pub hosts: Vec<Host>,
    /// Checkout of openshift-ansible.
    pub playbook_directory: PathBuf,
    pub environment: Environment,
}

impl Context {
    pub fn from_file(path: &Path) -> Result<Context> {
        let mut data = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut data))
            .map_err(|source| {
                Error::ReadConfig {
                    path: path.to_path_buf(),
                    source: source,
                }
            })?;

        Context::from_str(&data).map_err(|source| {
            Error::ParseConfig {
                path: path.to_path_buf(),
                source: source,
            }
        })
    }

    /// Parses a configuration document. The environment snapshot is left
    /// empty.
    pub fn from_str(data: &str) -> std::result::Result<Context, serde_yaml::Error> {
        let file: ConfigFile = serde_yaml::from_str(data)?;
        let mut settings = Settings(file.settings);

        // The flattened settings only keep the parsed number, read the
        // version again as plain text.
        if let Ok(VersionText { variant_version: Some(version) }) = serde_yaml::from_str(data) {
            settings.insert("variant_version", version.as_str());
        }

        let (hosts, deployment) = match file.deployment {
            Some(deployment) => (deployment.hosts, deployment.deployment),
            None => (Vec::new(), Deployment::default()),
        };

        let playbook_directory = settings.text("ansible_playbook_directory")
            .map(PathBuf::from)
            .unwrap_or_default();

        debug!("settings: {:#?}", settings);
        debug!("roles: {:?}", deployment.roles.keys().collect::<Vec<_>>());
        debug!("hosts: {}", hosts.len());

        Ok(Context {
            settings: settings,
            deployment: deployment,
            hosts: hosts,
            playbook_directory: playbook_directory,
            environment: Environment::default(),
        })
    }

    pub fn with_environment(mut self, environment: Environment) -> Context {
        self.environment = environment;
        self
    }

    pub fn with_playbook_directory<P: Into<PathBuf>>(mut self, directory: P) -> Context {
        self.playbook_directory = directory.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
variant: openshift-enterprise
variant_version: 3.1
ansible_ssh_user: root
ansible_inventory_path: /tmp/hosts
ansible_playbook_directory: /usr/share/ansible/openshift-ansible
ansible_config:
proxy_http: http://proxy.example.com:3128
deployment:
  hosts:
  - connect_to: master.example.com
    ip: 10.0.0.1
    roles: [master, etcd]
  - connect_to: node.example.com
    roles: [node]
    new_host: true
  roles:
    master:
    etcd:
    node:
      variables:
        osm_default_node_selector: region=primary
  variables:
    master_routingconfig_subdomain: apps.example.com
"#;

    #[test]
    fn settings_keep_file_order_and_types() {
        let ctx = Context::from_str(CONFIG).unwrap();
        let keys: Vec<_> = ctx.settings.iter().map(|(key, _)| key.as_str()).collect();

        assert_eq!(keys,
                   vec!["variant",
                        "variant_version",
                        "ansible_ssh_user",
                        "ansible_inventory_path",
                        "ansible_playbook_directory",
                        "ansible_config",
                        "proxy_http"]);
        assert_eq!(ctx.settings.text("variant_version"), Some("3.1".to_string()));
        assert_eq!(ctx.settings.get("ansible_config"), Some(&Value::Null));
        assert!(!ctx.settings.contains("deployment"));
    }

    #[test]
    fn deployment_is_split_from_hosts() {
        let ctx = Context::from_str(CONFIG).unwrap();

        assert_eq!(ctx.hosts.len(), 2);
        assert!(ctx.hosts[1].new_host);
        assert_eq!(ctx.deployment.roles.keys().collect::<Vec<_>>(),
                   vec!["master", "etcd", "node"]);
        assert!(ctx.deployment.roles["master"].variables.is_empty());
        assert_eq!(ctx.deployment.roles["node"].variables["osm_default_node_selector"],
                   Value::from("region=primary"));
        assert_eq!(ctx.deployment.variables["master_routingconfig_subdomain"],
                   Value::from("apps.example.com"));
        assert_eq!(ctx.playbook_directory,
                   PathBuf::from("/usr/share/ansible/openshift-ansible"));
    }

    #[test]
    fn unquoted_versions_keep_their_text() {
        let ctx = Context::from_str("variant: openshift-enterprise\nvariant_version: 3.0\n").unwrap();
        assert_eq!(ctx.settings.text("variant_version"), Some("3.0".to_string()));

        let ctx = Context::from_str("variant: openshift-enterprise\nvariant_version: 3.10\n").unwrap();
        assert_eq!(ctx.settings.text("variant_version"), Some("3.10".to_string()));
    }

    #[test]
    fn empty_variable_maps() {
        let config = r#"
deployment:
  hosts:
  - connect_to: node1.example.com
    roles: [node]
    other_variables:
  roles:
    master:
      variables:
    node:
      variables: {}
  variables:
"#;
        let ctx = Context::from_str(config).unwrap();

        assert!(ctx.deployment.roles["master"].variables.is_empty());
        assert!(ctx.deployment.roles["node"].variables.is_empty());
        assert!(ctx.deployment.variables.is_empty());
        assert!(ctx.hosts[0].other_variables.is_empty());
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::from("no").is_truthy());
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::from(true).to_string(), "True");
        assert_eq!(Value::Float(3.1).to_string(), "3.1");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Integer(8443).to_string(), "8443");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn missing_required_setting() {
        let ctx = Context::from_str("variant: origin\n").unwrap();

        match ctx.settings.required("ansible_inventory_path") {
            Err(Error::MissingSetting(key)) => assert_eq!(key, "ansible_inventory_path"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
