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

//! Running openshift-ansible playbooks.

use crate::config::Context;
use crate::error::{Error, Result};
use crate::host::Host;
use crate::inventory::generate_inventory;
use crate::system::LocalSystem;
use glob::glob;
use std::collections::BTreeMap as Map;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const FACTS_PLAYBOOK: &str = "playbooks/byo/openshift_facts.yml";
pub const CONFIG_PLAYBOOK: &str = "playbooks/byo/openshift-cluster/config.yml";
pub const SCALEUP_PLAYBOOK: &str = "playbooks/byo/openshift-node/scaleup.yml";
pub const UNINSTALL_PLAYBOOK: &str = "playbooks/adhoc/uninstall.yml";
pub const UPGRADE_DIRECTORY: &str = "playbooks/byo/openshift-cluster/upgrades";

/// Exit status reported when the runner could not be started at all.
pub const SPAWN_FAILED: i32 = 127;

/// Facts per host as written by the openshift_facts callback plugin.
pub type CallbackFacts = Map<String, serde_yaml::Value>;

/// One playbook run.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub playbook: PathBuf,
    pub inventory: PathBuf,
    /// Added on top of the installer's own environment.
    pub env: Map<String, String>,
    pub verbose: bool,
    pub discard_output: bool,
}

impl Invocation {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![format!("--inventory-file={}", self.inventory.display())];

        if self.verbose {
            args.push("-v".to_string());
        }

        args.push(self.playbook.display().to_string());
        args
    }
}

pub trait Runner {
    /// Runs the playbook to completion and returns its exit status.
    fn run(&self, invocation: &Invocation) -> i32;
}

#[derive(Debug, Clone)]
pub struct AnsiblePlaybook {
    pub program: String,
}

impl Default for AnsiblePlaybook {
    fn default() -> AnsiblePlaybook {
        AnsiblePlaybook { program: "ansible-playbook".to_string() }
    }
}

impl Runner for AnsiblePlaybook {
    fn run(&self, invocation: &Invocation) -> i32 {
        let args = invocation.args();
        info!("running {} {}", self.program, args.join(" "));
        debug!("environment overlay: {:?}", invocation.env);

        let mut command = Command::new(&self.program);
        command.args(&args).envs(&invocation.env);

        if invocation.discard_output {
            command.stdout(Stdio::null());
        }

        match command.status() {
            Ok(status) => {
                debug!("{} exited with {}", self.program, status);
                status.code().unwrap_or(1)
            }
            Err(err) => {
                error!("can not run {}: {}", self.program, err);
                SPAWN_FAILED
            }
        }
    }
}

/// Drives openshift-ansible for one installer command.
pub struct Installer<'a> {
    ctx: &'a Context,
    runner: &'a dyn Runner,
    system: &'a dyn LocalSystem,
}

impl<'a> Installer<'a> {
    pub fn new(ctx: &'a Context, runner: &'a dyn Runner, system: &'a dyn LocalSystem) -> Installer<'a> {
        Installer {
            ctx: ctx,
            runner: runner,
            system: system,
        }
    }

    pub fn generate_inventory(&self, hosts: &[Host]) -> Result<PathBuf> {
        generate_inventory(self.ctx, hosts, self.system)
    }

    fn playbook(&self, playbook: &str) -> PathBuf {
        self.ctx.playbook_directory.join(playbook)
    }

    fn env(&self) -> Map<String, String> {
        let mut env = Map::new();

        let overlay = [("ANSIBLE_LOG_PATH", "ansible_log_path"), ("ANSIBLE_CONFIG", "ansible_config")];

        // An empty `ansible_config:` must not reach ansible as an empty path.
        for &(variable, setting) in &overlay {
            if let Some(value) = self.ctx.settings.get(setting).filter(|value| value.is_truthy()) {
                env.insert(variable.to_string(), value.to_string());
            }
        }

        env
    }

    fn run(&self, playbook: PathBuf, inventory: PathBuf, env: Map<String, String>, verbose: bool) -> i32 {
        let invocation = Invocation {
            playbook: playbook,
            inventory: inventory,
            env: env,
            verbose: verbose,
            discard_output: false,
        };

        let status = self.runner.run(&invocation);
        if status != 0 {
            warn!("{} failed with exit status {}",
                  invocation.playbook.display(),
                  status);
        }

        status
    }

    /// Gathers facts from `hosts`. A failed playbook yields no facts and
    /// status 1, the callback output is only read after a successful run.
    pub fn default_facts(&self, hosts: &[Host], verbose: bool) -> Result<(CallbackFacts, i32)> {
        let inventory = self.generate_inventory(hosts)?;
        let facts_path = self.ctx.settings.required("ansible_callback_facts_yaml")?;

        let mut env = self.env();
        env.insert("OO_INSTALL_CALLBACK_FACTS_YAML".to_string(),
                   facts_path.clone());
        env.insert("ANSIBLE_CALLBACK_PLUGINS".to_string(),
                   self.ctx.settings.required("ansible_plugins_directory")?);
        env.insert("OPENSHIFT_MASTER_CLUSTER_METHOD".to_string(),
                   "native".to_string());

        let invocation = Invocation {
            playbook: self.playbook(FACTS_PLAYBOOK),
            inventory: inventory,
            env: env,
            verbose: verbose,
            discard_output: true,
        };

        let status = self.runner.run(&invocation);
        if status != 0 {
            warn!("gathering facts failed with exit status {}", status);
            return Ok((CallbackFacts::new(), 1));
        }

        let facts = read_callback_facts(Path::new(&facts_path))?;
        debug!("facts for {} hosts", facts.len());

        Ok((facts, 0))
    }

    /// The hosts an install touches: everything, or only the new hosts and the
    /// masters when nodes are added to an existing cluster.
    pub fn hosts_to_run_on(hosts: &[Host]) -> Vec<Host> {
        if !hosts.iter().any(|host| host.is_new_node()) {
            return hosts.to_vec();
        }

        hosts.iter()
            .filter(|host| host.new_host || host.is_master())
            .cloned()
            .collect()
    }

    /// Configures the cluster. Running on fewer hosts than the cluster has
    /// is a scale-up.
    pub fn run_main_playbook(&self, inventory: &Path, hosts: &[Host], hosts_to_run_on: &[Host], verbose: bool) -> i32 {
        let playbook = if is_strict_subset(hosts_to_run_on, hosts) {
            info!("scaling up {} of {} hosts", hosts_to_run_on.len(), hosts.len());
            self.playbook(SCALEUP_PLAYBOOK)
        } else {
            self.playbook(CONFIG_PLAYBOOK)
        };

        self.run(playbook, inventory.to_path_buf(), self.env(), verbose)
    }

    pub fn run_uninstall_playbook(&self, verbose: bool) -> Result<i32> {
        let inventory = self.generate_inventory(&self.ctx.hosts)?;

        Ok(self.run(self.playbook(UNINSTALL_PLAYBOOK), inventory, self.env(), verbose))
    }

    /// Runs `<upgrade directory>/<playbook>`, e.g. `v3_1_to_v3_2/upgrade.yml`.
    pub fn run_upgrade_playbook(&self, playbook: &str, verbose: bool) -> Result<i32> {
        let playbook = self.playbook(UPGRADE_DIRECTORY).join(playbook);
        let inventory = self.generate_inventory(&self.ctx.hosts)?;

        Ok(self.run(playbook, inventory, self.env(), verbose))
    }

    /// Upgrade playbooks available in the playbook directory, relative to the
    /// upgrade directory.
    pub fn upgrade_playbooks(&self) -> Result<Vec<String>> {
        let directory = self.playbook(UPGRADE_DIRECTORY);
        let pattern = format!("{}/*/*.yml", directory.display());

        let mut playbooks = Vec::new();
        for entry in glob(pattern.as_str())? {
            match entry {
                Ok(path) => {
                    if let Ok(relative) = path.strip_prefix(&directory) {
                        playbooks.push(relative.display().to_string());
                    }
                }
                Err(err) => warn!("can not read path from glob: {}", err),
            }
        }

        playbooks.sort();
        Ok(playbooks)
    }
}

fn is_strict_subset(subset: &[Host], hosts: &[Host]) -> bool {
    subset.len() < hosts.len() &&
    subset.iter().all(|host| hosts.iter().any(|h| h.connect_to == host.connect_to))
}

/// Reads the document the callback plugin wrote. An empty document means no
/// facts.
pub fn read_callback_facts(path: &Path) -> Result<CallbackFacts> {
    let mut data = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut data))
        .map_err(|source| {
            Error::ReadCallbackFacts {
                path: path.to_path_buf(),
                source: source,
            }
        })?;

    let facts: Option<CallbackFacts> = serde_yaml::from_str(&data).map_err(|source| {
            Error::CallbackFacts {
                path: path.to_path_buf(),
                source: source,
            }
        })?;

    Ok(facts.unwrap_or_default())
}
