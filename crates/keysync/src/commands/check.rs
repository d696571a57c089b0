//! Check command: validate the config and list what each host references.
//! Never touches gpg or op.

use comfy_table::{Cell, Color, Table};
use libkeysync_core::{KeysyncError, ResolvedRef};
use serde::Serialize;

use crate::cli::Cli;
use crate::context::KeysyncContext;
use crate::output::output_success;

#[derive(Serialize)]
struct HostRefs {
    host: String,
    refs: Vec<ResolvedRef>,
}

#[derive(Serialize)]
struct CheckOutput {
    vault: String,
    keys: Vec<String>,
    hosts: Vec<HostRefs>,
}

pub fn run(cli: &Cli) -> Result<(), KeysyncError> {
    let ctx = KeysyncContext::resolve(cli)?;
    let config = &ctx.config;

    let mut hosts = Vec::with_capacity(config.hosts.len());
    for name in config.hosts.keys() {
        hosts.push(HostRefs {
            host: name.clone(),
            refs: config.resolve_host(name)?,
        });
    }

    if !cli.json && !cli.quiet {
        let mut table = Table::new();
        let _ = table.set_header(vec![
            Cell::new("Host").fg(Color::Blue),
            Cell::new("Reference").fg(Color::Blue),
            Cell::new("Item").fg(Color::Blue),
            Cell::new("Fingerprint").fg(Color::Blue),
        ]);
        for host in &hosts {
            for resolved in &host.refs {
                let _ = table.add_row(vec![
                    Cell::new(&host.host),
                    Cell::new(resolved.reference()),
                    Cell::new(&resolved.item_title),
                    Cell::new(&resolved.fingerprint),
                ]);
            }
        }
        println!("{table}");
        println!(
            "config ok: {} keys, {} hosts, vault {:?}",
            config.keys.len(),
            hosts.len(),
            config.vault
        );
    }

    output_success(
        cli,
        CheckOutput {
            vault: config.vault.clone(),
            keys: config.all_key_names(),
            hosts,
        },
    );
    Ok(())
}
