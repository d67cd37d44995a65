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

//! Translation tables between installer names and inventory names.

pub const MASTER: &str = "master";
pub const NODE: &str = "node";
pub const ETCD: &str = "etcd";
pub const STORAGE: &str = "storage";
pub const MASTER_LB: &str = "master_lb";

/// Pseudo group holding the nodes of a scale-up run.
pub const NEW_NODES: &str = "new_nodes";

pub fn group_for_role(role: &str) -> &str {
    match role {
        MASTER => "masters",
        NODE => "nodes",
        ETCD => "etcd",
        STORAGE => "nfs",
        MASTER_LB => "lb",
        _ => role,
    }
}

fn mapped_variable(variable: &str) -> Option<&'static str> {
    match variable {
        "ansible_ssh_user" => Some("ansible_ssh_user"),
        "ansible_config" => Some("ansible_config"),
        "ansible_log_path" => Some("ansible_log_path"),
        "deployment_type" => Some("deployment_type"),
        "master_routingconfig_subdomain" => Some("openshift_master_default_subdomain"),
        "proxy_http" => Some("openshift_http_proxy"),
        "proxy_https" => Some("openshift_https_proxy"),
        "proxy_exclude_hosts" => Some("openshift_no_proxy"),
        _ => None,
    }
}

/// Lookup for installer settings. Settings without an inventory name are
/// installer-only and must not leak into the inventory.
pub fn global_variable_name(variable: &str) -> Option<&'static str> {
    mapped_variable(variable)
}

/// Lookup for deployment and role variables, which pass through unchanged
/// when there is no translation.
pub fn scoped_variable_name(variable: &str) -> &str {
    mapped_variable(variable).unwrap_or(variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_map_to_groups() {
        assert_eq!(group_for_role(MASTER), "masters");
        assert_eq!(group_for_role(NODE), "nodes");
        assert_eq!(group_for_role(ETCD), "etcd");
        assert_eq!(group_for_role(STORAGE), "nfs");
        assert_eq!(group_for_role(MASTER_LB), "lb");
    }

    #[test]
    fn unknown_role_is_its_own_group() {
        assert_eq!(group_for_role("glusterfs"), "glusterfs");
    }

    #[test]
    fn global_lookup_skips_unmapped() {
        assert_eq!(global_variable_name("proxy_http"), Some("openshift_http_proxy"));
        assert_eq!(global_variable_name("variant"), None);
        assert_eq!(global_variable_name("ansible_inventory_path"), None);
    }

    #[test]
    fn scoped_lookup_passes_unmapped_through() {
        assert_eq!(scoped_variable_name("master_routingconfig_subdomain"),
                   "openshift_master_default_subdomain");
        assert_eq!(scoped_variable_name("osm_default_node_selector"),
                   "osm_default_node_selector");
    }
}
