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

//! Facts about the machine the installer runs on.

use std::process::{Command, Stdio};

pub trait LocalSystem {
    /// Network name of the installer host.
    fn hostname(&self) -> String;

    fn is_root(&self) -> bool;

    /// Whether sudo works without asking for a password.
    fn passwordless_sudo(&self) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Local;

impl LocalSystem for Local {
    fn hostname(&self) -> String {
        match hostname::get() {
            Ok(name) => name.to_string_lossy().to_string(),
            Err(err) => {
                warn!("can not get hostname: {}", err);
                String::new()
            }
        }
    }

    fn is_root(&self) -> bool {
        nix::unistd::geteuid().is_root()
    }

    fn passwordless_sudo(&self) -> bool {
        let status = Command::new("sudo")
            .args(&["-n", "echo", "openshift"])
            .stdout(Stdio::null())
            .status();

        match status {
            Ok(status) => {
                debug!("sudo check: {}", status);
                status.success()
            }
            Err(err) => {
                warn!("can not run sudo: {}", err);
                false
            }
        }
    }
}
