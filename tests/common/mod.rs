//! Fakes shared by the integration tests.

#![allow(dead_code)]

use ooinstall::ansible::{Invocation, Runner};
use ooinstall::system::LocalSystem;
use ooinstall::Context;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// An installer host that is not part of the cluster.
pub struct FakeSystem {
    pub hostname: String,
    pub root: bool,
    pub sudo: bool,
}

impl FakeSystem {
    pub fn remote() -> FakeSystem {
        FakeSystem {
            hostname: "installer.example.com".to_string(),
            root: true,
            sudo: true,
        }
    }
}

impl LocalSystem for FakeSystem {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }

    fn is_root(&self) -> bool {
        self.root
    }

    fn passwordless_sudo(&self) -> bool {
        self.sudo
    }
}

/// Records invocations instead of running ansible-playbook. When `facts` is
/// set it plays the callback plugin and writes them to the path from the
/// environment overlay.
pub struct RecordingRunner {
    pub status: i32,
    pub facts: Option<String>,
    pub invocations: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn exiting_with(status: i32) -> RecordingRunner {
        RecordingRunner {
            status: status,
            facts: None,
            invocations: RefCell::new(Vec::new()),
        }
    }

    pub fn last(&self) -> Invocation {
        self.invocations.borrow().last().cloned().expect("runner was not invoked")
    }
}

impl Runner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> i32 {
        self.invocations.borrow_mut().push(invocation.clone());

        if let Some(ref facts) = self.facts {
            let path = &invocation.env["OO_INSTALL_CALLBACK_FACTS_YAML"];
            fs::write(path, facts).unwrap();
        }

        self.status
    }
}

pub const CONFIG: &str = r#"
variant: openshift-enterprise
variant_version: 3.2
ansible_ssh_user: root
ansible_playbook_directory: /usr/share/ansible/openshift-ansible
deployment:
  hosts:
  - connect_to: master1.example.com
    roles: [master, etcd, node]
  - connect_to: node1.example.com
    roles: [node]
  roles:
    master:
    etcd:
    node:
"#;

/// Parses `config` and points every output file into `dir`.
pub fn context(config: &str, dir: &TempDir) -> Context {
    let mut ctx = Context::from_str(config).unwrap();
    let path = |name: &str| dir.path().join(name).display().to_string();

    ctx.settings.insert("ansible_inventory_path", path("hosts").as_str());
    ctx.settings.insert("ansible_callback_facts_yaml", path("callback_facts.yaml").as_str());
    ctx.settings.insert("ansible_plugins_directory", path("callback_plugins").as_str());
    ctx
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// Lines of the `[<name>]` section.
pub fn section(inventory: &str, name: &str) -> Vec<String> {
    let header = format!("[{}]", name);

    inventory.lines()
        .skip_while(|line| *line != header)
        .skip(1)
        .take_while(|line| !line.starts_with('['))
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}
