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

//! Products the installer can deploy.

use crate::error::{Error, Result};

#[derive(Debug, PartialEq)]
pub struct Version {
    pub name: &'static str,
    /// Value of the `deployment_type` inventory variable.
    pub ansible_key: &'static str,
}

#[derive(Debug, PartialEq)]
pub struct Variant {
    pub name: &'static str,
    pub description: &'static str,
    /// Newest first; the first entry is used when no version is configured.
    pub versions: &'static [Version],
}

pub const OSE: Variant = Variant {
    name: "openshift-enterprise",
    description: "OpenShift Enterprise",
    versions: &[Version {
                    name: "3.2",
                    ansible_key: "openshift-enterprise",
                },
                Version {
                    name: "3.1",
                    ansible_key: "openshift-enterprise",
                },
                Version {
                    name: "3.0",
                    ansible_key: "enterprise",
                }],
};

pub const AEP: Variant = Variant {
    name: "atomic-enterprise",
    description: "Atomic Enterprise Platform",
    versions: &[Version {
                    name: "3.2",
                    ansible_key: "atomic-enterprise",
                },
                Version {
                    name: "3.1",
                    ansible_key: "atomic-enterprise",
                }],
};

pub const ORIGIN: Variant = Variant {
    name: "origin",
    description: "OpenShift Origin",
    versions: &[Version {
                    name: "1.2",
                    ansible_key: "origin",
                },
                Version {
                    name: "1.1",
                    ansible_key: "origin",
                }],
};

/// First entry is the default offered to users.
pub const SUPPORTED: &[Variant] = &[OSE, AEP, ORIGIN];

pub fn find_variant(name: &str, version: Option<&str>) -> Option<(&'static Variant, &'static Version)> {
    let variant = SUPPORTED.iter().find(|variant| variant.name == name)?;

    let found = match version {
        None => variant.versions.first(),
        Some(version) => variant.versions.iter().find(|v| v.name == version),
    };

    found.map(|v| (variant, v))
}

/// Same as `find_variant` but an unknown pair is an error.
pub fn deployment_type(name: &str, version: Option<&str>) -> Result<&'static str> {
    match find_variant(name, version) {
        Some((_, version)) => Ok(version.ansible_key),
        None => {
            Err(Error::UnknownVariant {
                variant: name.to_string(),
                version: version.unwrap_or("latest").to_string(),
            })
        }
    }
}
