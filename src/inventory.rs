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

//! Ansible inventory generation.
//!
//! The inventory is an INI file with these sections, in order:
//!
//! * `[OSEv3:children]` listing every group
//! * `[OSEv3:vars]` with the cluster wide variables
//! * one `[<group>]` per deployment role with a line per host
//! * `[new_nodes]` when nodes are added to an existing cluster
//! * `[<group>:vars]` for roles that carry variables

use crate::config::{inventory_bool, Context, Value};
use crate::error::{Error, Result};
use crate::host::{determine_lb_configuration, Host};
use crate::roles;
use crate::system::LocalSystem;
use crate::variants;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;

const PROXY_SETTINGS: &[&str] = &["openshift_http_proxy", "openshift_https_proxy", "openshift_no_proxy"];

/// Variant version that needs a pinned image tag.
const PINNED_IMAGE_VERSION: &str = "3.1";
const PINNED_IMAGE_TAG: &str = "v3.1.1.6";

/// Writes the inventory for `hosts` to the `ansible_inventory_path` setting
/// and returns that path.
///
/// Nothing is written when rendering fails.
pub fn generate_inventory(ctx: &Context, hosts: &[Host], system: &dyn LocalSystem) -> Result<PathBuf> {
    let path = PathBuf::from(ctx.settings.required("ansible_inventory_path")?);
    let inventory = render_inventory(ctx, hosts, system)?;

    debug!("inventory: {}", inventory);

    File::create(&path)
        .and_then(|mut file| file.write_all(inventory.as_bytes()))
        .map_err(|source| {
            Error::WriteInventory {
                path: path.clone(),
                source: source,
            }
        })?;

    info!("wrote inventory for {} hosts to {}", hosts.len(), path.display());
    Ok(path)
}

pub fn render_inventory(ctx: &Context, hosts: &[Host], system: &dyn LocalSystem) -> Result<String> {
    let mut hosts = hosts.to_vec();

    let multiple_masters = hosts.iter().filter(|host| host.is_master()).count() > 1;
    let scaleup = hosts.iter().any(|host| host.is_new_node());

    // Host lines below rely on the defaulted load balancer names.
    let lb = determine_lb_configuration(&mut hosts).cloned();

    let mut out = String::new();

    write_children(&mut out, ctx, scaleup);
    write_vars(&mut out, ctx, multiple_masters, lb.as_ref())?;

    for role in ctx.deployment.roles.keys() {
        out.push_str(format!("\n[{}]\n", roles::group_for_role(role)).as_str());

        for host in hosts.iter().filter(|host| host.has_role(role)) {
            let schedulable = host.schedulable_node(&hosts);
            if let Some(line) = host_line(host, role, schedulable, system)? {
                out.push_str(format!("{}\n", line).as_str());
            }
        }
    }

    if scaleup {
        out.push_str(format!("\n[{}]\n", roles::NEW_NODES).as_str());
        for node in hosts.iter().filter(|host| host.is_new_node()) {
            if let Some(line) = host_line(node, roles::NEW_NODES, None, system)? {
                out.push_str(format!("{}\n", line).as_str());
            }
        }
    }

    write_role_vars(&mut out, ctx);

    Ok(out)
}

fn write_children(out: &mut String, ctx: &Context, scaleup: bool) {
    out.push_str("\n[OSEv3:children]\n");

    for role in ctx.deployment.roles.keys() {
        out.push_str(format!("{}\n", roles::group_for_role(role)).as_str());
    }

    if scaleup {
        out.push_str(format!("{}\n", roles::NEW_NODES).as_str());
    }
}

fn write_vars(out: &mut String, ctx: &Context, multiple_masters: bool, lb: Option<&Host>) -> Result<()> {
    out.push_str("\n[OSEv3:vars]\n");

    for (variable, value) in ctx.settings.iter() {
        if let Some(inventory_var) = roles::global_variable_name(variable) {
            write_variable(out, inventory_var, value);
        }
    }

    for (variable, value) in &ctx.deployment.variables {
        write_variable(out, roles::scoped_variable_name(variable), value);
    }

    if ctx.settings.required("ansible_ssh_user")? != "root" {
        out.push_str("ansible_become=yes\n");
    }

    if let Some(lb) = lb {
        if multiple_masters {
            out.push_str("openshift_master_cluster_method=native\n");
            out.push_str(format!("openshift_master_cluster_hostname={}\n",
                                 lb.hostname.as_ref().unwrap_or(&lb.connect_to))
                .as_str());
            // Unset public name: the address is reachable, an empty value is not.
            out.push_str(format!("openshift_master_cluster_public_hostname={}\n",
                                 lb.public_hostname.as_ref().unwrap_or(&lb.connect_to))
                .as_str());
        }
    }

    let variant_version = ctx.settings.text("variant_version").filter(|version| !version.is_empty());

    if variant_version.as_deref() == Some(PINNED_IMAGE_VERSION) {
        out.push_str(format!("openshift_image_tag={}\n", PINNED_IMAGE_TAG).as_str());
    }

    for setting in PROXY_SETTINGS {
        if let Some(value) = ctx.settings.get(setting) {
            out.push_str(format!("{}={}\n", setting, value).as_str());
        }
    }

    let deployment_type = variants::deployment_type(&ctx.settings.required("variant")?,
                                                    variant_version.as_deref())?;
    out.push_str(format!("deployment_type={}\n", deployment_type).as_str());

    if let Some(registries) = ctx.environment.get("OO_INSTALL_ADDITIONAL_REGISTRIES") {
        out.push_str(format!("openshift_docker_additional_registries={}\n", registries).as_str());
    }

    if let Some(registries) = ctx.environment.get("OO_INSTALL_INSECURE_REGISTRIES") {
        out.push_str(format!("openshift_docker_insecure_registries={}\n", registries).as_str());
    }

    if let Some(repo) = ctx.environment.get("OO_INSTALL_PUDDLE_REPO") {
        out.push_str(format!("openshift_additional_repos=[{{'id': 'ose-devel', 'name': 'ose-devel', \
                              'baseurl': '{}', 'enabled': 1, 'gpgcheck': 0}}]\n",
                             repo)
            .as_str());
    }

    Ok(())
}

fn write_role_vars(out: &mut String, ctx: &Context) {
    for (role, config) in &ctx.deployment.roles {
        if config.variables.is_empty() {
            continue;
        }

        out.push_str(format!("\n[{}:vars]\n", roles::group_for_role(role)).as_str());
        for (variable, value) in &config.variables {
            write_variable(out, roles::scoped_variable_name(variable), value);
        }
    }
}

fn write_variable(out: &mut String, name: &str, value: &Value) {
    if value.is_truthy() {
        out.push_str(format!("{}={}\n", name, value).as_str());
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    match *value {
        Some(ref value) if !value.is_empty() => Some(value.as_str()),
        _ => None,
    }
}

/// The inventory line for `host` in the group of `role`, `None` for
/// preconfigured hosts.
///
/// A host that turns out to be the installer host itself gets a local
/// connection. Without root that needs sudo without a password, and without
/// that the whole run is aborted.
pub fn host_line(host: &Host,
                 role: &str,
                 schedulable: Option<bool>,
                 system: &dyn LocalSystem)
                 -> Result<Option<String>> {
    if host.preconfigured {
        debug!("skipping preconfigured host {}", host);
        return Ok(None);
    }

    let mut facts: Vec<String> = Vec::new();

    let named = [("openshift_ip", &host.ip),
                 ("openshift_public_ip", &host.public_ip),
                 ("openshift_hostname", &host.hostname),
                 ("openshift_public_hostname", &host.public_hostname)];
    for &(fact, value) in &named {
        if let Some(value) = non_empty(value) {
            facts.push(format!("{}={}", fact, value));
        }
    }

    if host.containerized {
        facts.push(format!("containerized={}", inventory_bool(true)));
    }

    for (variable, value) in &host.other_variables {
        facts.push(format!("{}={}", variable, value));
    }

    if let Some(labels) = non_empty(&host.node_labels) {
        facts.push(format!("openshift_node_labels=\"{}\"", labels));
    }

    if role == roles::NODE {
        if let Some(schedulable) = schedulable {
            facts.push(format!("openshift_schedulable={}", inventory_bool(schedulable)));
        }
    }

    let installer_host = system.hostname();
    if !installer_host.is_empty() && host.is_named(&installer_host) {
        facts.push("ansible_connection=local".to_string());

        if !system.is_root() {
            if !system.passwordless_sudo() {
                error!("{} is the installer host but sudo needs a password", host);
                return Err(Error::SudoRequired);
            }
            facts.push("ansible_become=yes".to_string());
        }
    }

    let mut line = host.connect_to.clone();
    for fact in facts {
        line.push(' ');
        line.push_str(fact.as_str());
    }

    Ok(Some(line))
}
