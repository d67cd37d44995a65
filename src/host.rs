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
// The above copyright notice and this permission notice shall be included in
// all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::config::{deserialize_variables, Variables};
use crate::roles;
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Host {
    pub connect_to: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub public_hostname: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub containerized: bool,
    /// Already part of the cluster and managed outside of the installer.
    #[serde(default)]
    pub preconfigured: bool,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub other_variables: Variables,
    #[serde(default)]
    pub node_labels: Option<String>,
    #[serde(default)]
    pub new_host: bool,
    #[serde(default)]
    pub schedulable: Option<bool>,
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.hostname {
            Some(ref hostname) => write!(f, "{} ({})", self.connect_to, hostname),
            None => write!(f, "{}", self.connect_to),
        }
    }
}

impl Host {
    pub fn new(connect_to: &str, roles: &[&str]) -> Host {
        Host {
            connect_to: connect_to.to_string(),
            roles: roles.iter().map(|role| role.to_string()).collect(),
            ..Host::default()
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_master(&self) -> bool {
        self.has_role(roles::MASTER)
    }

    pub fn is_node(&self) -> bool {
        self.has_role(roles::NODE)
    }

    pub fn is_etcd(&self) -> bool {
        self.has_role(roles::ETCD)
    }

    pub fn is_storage(&self) -> bool {
        self.has_role(roles::STORAGE)
    }

    pub fn is_master_lb(&self) -> bool {
        self.has_role(roles::MASTER_LB)
    }

    /// Scale-up candidate.
    pub fn is_new_node(&self) -> bool {
        self.is_node() && self.new_host
    }

    /// `None` leaves the decision to openshift-ansible.
    ///
    /// A master that also runs a node stays unschedulable unless every node
    /// in the cluster is a master, otherwise nothing could run on an
    /// all-in-one installation.
    pub fn schedulable_node(&self, all_hosts: &[Host]) -> Option<bool> {
        if !self.is_node() {
            return None;
        }

        if self.schedulable.is_some() {
            return self.schedulable;
        }

        if !self.is_master() {
            return None;
        }

        let masters = all_hosts.iter().filter(|host| host.is_master()).count();
        let nodes = all_hosts.iter().filter(|host| host.is_node()).count();

        Some(masters == nodes)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.connect_to == name || self.hostname.as_ref().map_or(false, |h| h == name) ||
        self.public_hostname.as_ref().map_or(false, |h| h == name)
    }
}

/// Finds the master load balancer and defaults its hostnames to the
/// connection address.
///
/// The roster is changed in place: anything rendered from `hosts` after this
/// call sees the defaulted names.
///
/// A load balancer with only `hostname` set keeps an empty public hostname
/// here; the inventory then uses `connect_to` for the public cluster name
/// rather than writing an empty value.
pub fn determine_lb_configuration(hosts: &mut [Host]) -> Option<&Host> {
    let lb = hosts.iter_mut().find(|host| host.is_master_lb())?;

    if lb.hostname.is_none() {
        debug!("defaulting load balancer hostnames to {}", lb.connect_to);
        lb.hostname = Some(lb.connect_to.clone());
        lb.public_hostname = Some(lb.connect_to.clone());
    }

    Some(&*lb)
}
