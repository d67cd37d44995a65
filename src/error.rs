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

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that aborts a command. Exit statuses of `ansible-playbook` are
/// not errors and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("can not read config file {}: {source}", .path.display())]
    ReadConfig { path: PathBuf, source: io::Error },

    #[error("can not parse config file {}: {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("missing required setting {0}")]
    MissingSetting(String),

    #[error("can not write inventory file {}: {source}", .path.display())]
    WriteInventory { path: PathBuf, source: io::Error },

    /// No deployment type exists for the configured variant and version.
    #[error("unknown variant {variant} (version {version})")]
    UnknownVariant { variant: String, version: String },

    /// A local connection was requested but sudo asks for a password.
    #[error("The atomic-openshift-installer requires sudo access without a password.")]
    SudoRequired,

    #[error("can not read callback facts {}: {source}", .path.display())]
    ReadCallbackFacts { path: PathBuf, source: io::Error },

    #[error("Error in {}: {source}\nTry deleting and rerunning the atomic-openshift-installer",
            .path.display())]
    CallbackFacts {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("can not search for upgrade playbooks: {0}")]
    UpgradePattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, Error>;
