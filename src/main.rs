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

#[macro_use]
extern crate log;

#[macro_use]
extern crate clap;

use clap::{App, ArgMatches};
use log::Level;
use ooinstall::ansible::{AnsiblePlaybook, CallbackFacts, Installer};
use ooinstall::config::Environment;
use ooinstall::system::Local;
use ooinstall::{Context, Host, Result};
use std::env;
use std::path::PathBuf;
use std::process;

fn main() {
    let yaml = load_yaml!("cli.yml");
    let app = App::from_yaml(yaml)
        .version(crate_version!())
        .get_matches();

    let (command, submatches) = app.subcommand();
    let matches = match submatches {
        Some(matches) => matches,
        None => &app,
    };

    let loglevel: Level = value_of(&app, matches, "log_level")
        .unwrap_or("warn")
        .parse()
        .unwrap_or(Level::Warn);
    if let Err(err) = loggerv::init_with_level(loglevel) {
        eprintln!("can not initialize logging: {}", err);
    }

    debug!("starting");
    debug!("matches: {:#?}", matches);

    let homepath = match env::var_os("HOME") {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(""),
    };

    let configpath = match value_of(&app, matches, "config") {
        Some(path) => PathBuf::from(path),
        None => homepath.join(".config").join("openshift").join("installer.cfg.yml"),
    };
    debug!("config: {}", configpath.display());

    let mut ctx = match Context::from_file(&configpath) {
        Ok(ctx) => ctx.with_environment(Environment::from_process()),
        Err(err) => fatal(err),
    };

    if let Some(directory) = value_of(&app, matches, "playbook_directory") {
        ctx = ctx.with_playbook_directory(directory);
    }
    debug!("playbook directory: {}", ctx.playbook_directory.display());

    let verbose = matches.is_present("verbose") || app.is_present("verbose");

    let runner = AnsiblePlaybook::default();
    let system = Local;
    let installer = Installer::new(&ctx, &runner, &system);

    let status = match command {
        "inventory" => {
            installer.generate_inventory(&ctx.hosts).map(|path| {
                println!("{}", path.display());
                0
            })
        }
        "facts" => {
            let format = matches.value_of("output_format").unwrap_or("yaml");
            installer.default_facts(&ctx.hosts, verbose).map(|(facts, status)| {
                if status == 0 {
                    print_facts(&facts, format);
                }
                status
            })
        }
        "install" => install(&installer, &ctx.hosts, verbose),
        "uninstall" => installer.run_uninstall_playbook(verbose),
        "upgrade" => {
            if matches.is_present("list") {
                installer.upgrade_playbooks().map(|playbooks| {
                    for playbook in playbooks {
                        println!("{}", playbook);
                    }
                    0
                })
            } else {
                let playbook = matches.value_of("playbook").unwrap_or_default();
                installer.run_upgrade_playbook(playbook, verbose)
            }
        }
        _ => unreachable!(),
    };

    match status {
        Ok(status) => process::exit(status),
        Err(err) => fatal(err),
    }
}

/// Global arguments end up in the subcommand matches when given after the
/// subcommand.
fn value_of<'a>(app: &'a ArgMatches, matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.value_of(name).or_else(|| app.value_of(name))
}

fn fatal(err: ooinstall::Error) -> ! {
    debug!("fatal: {:?}", err);
    eprintln!("{}", err);
    process::exit(1)
}

fn install(installer: &Installer, hosts: &[Host], verbose: bool) -> Result<i32> {
    let inventory = installer.generate_inventory(hosts)?;
    let hosts_to_run_on = Installer::hosts_to_run_on(hosts);

    debug!("running on {} of {} hosts", hosts_to_run_on.len(), hosts.len());

    Ok(installer.run_main_playbook(&inventory, hosts, &hosts_to_run_on, verbose))
}

fn print_facts(facts: &CallbackFacts, format: &str) {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(facts).map_err(|err| err.to_string()),
        _ => serde_yaml::to_string(facts).map_err(|err| err.to_string()),
    };

    match rendered {
        Ok(rendered) => println!("{}", rendered),
        Err(err) => error!("can not render facts as {}: {}", format, err),
    }
}
