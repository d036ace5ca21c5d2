//! rouse-ctl — command-line interface for the roused daemon.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_PORT: u16 = 5000;

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HostItem {
    id: u64,
    ip: String,
    mac: String,
    name: String,
    owner: String,
    status: String,
}

#[derive(Deserialize)]
struct HostResponse {
    id: u64,
    ip: String,
    mac: String,
    message: Option<String>,
}

#[derive(Deserialize)]
struct DeleteResponse {
    success: bool,
}

#[derive(Deserialize)]
struct WakeResponse {
    message: String,
}

// ── HTTP helpers ──────────────────────────────────────────────────────────────

fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/api", port)
}

async fn parse_response<T: for<'de> Deserialize<'de>>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("daemon returned {}: {}", status, body);
    }
    resp.json::<T>().await.context("failed to parse response")
}

async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    let resp = reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to roused at {} — is it running?", url))?;
    parse_response(resp).await
}

async fn send_json<T: for<'de> Deserialize<'de>>(
    method: reqwest::Method,
    url: &str,
    body: serde_json::Value,
) -> Result<T> {
    let resp = reqwest::Client::new()
        .request(method, url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("failed to connect to roused at {} — is it running?", url))?;
    parse_response(resp).await
}

// ── Subcommand handlers ───────────────────────────────────────────────────────

async fn cmd_list(port: u16) -> Result<()> {
    let hosts: Vec<HostItem> = get_json(&format!("{}/hosts", base_url(port))).await?;

    if hosts.is_empty() {
        println!("No hosts registered.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Registered Hosts ({})", hosts.len());
    println!("═══════════════════════════════════════");

    for h in &hosts {
        let marker = match h.status.as_str() {
            "online" => "●",
            "error" => "!",
            _ => "○",
        };
        println!("  ┌─ [{}] {} {}", h.id, marker, h.name);
        println!("  │  ip     : {}", h.ip);
        println!(
            "  │  mac    : {}",
            if h.mac.is_empty() { "(unknown)" } else { &h.mac }
        );
        println!("  │  owner  : {}", h.owner);
        println!("  └─ status : {}", h.status);
    }

    Ok(())
}

async fn cmd_add(port: u16, ip: &str, mac: Option<&str>, opts: &FieldOpts) -> Result<()> {
    let body = json!({
        "ip": ip,
        "mac": mac,
        "name": opts.name,
        "owner": opts.owner,
    });
    let resp: HostResponse =
        send_json(reqwest::Method::POST, &format!("{}/hosts", base_url(port)), body).await?;

    println!("Added host {} ({}).", resp.id, resp.ip);
    if !resp.mac.is_empty() {
        println!("Hardware address: {}", resp.mac);
    }
    if let Some(msg) = resp.message {
        println!("Note: {}", msg);
    }
    Ok(())
}

async fn cmd_update(port: u16, id: u64, opts: &FieldOpts) -> Result<()> {
    let mut body = serde_json::Map::new();
    if let Some(ip) = &opts.ip {
        body.insert("ip".into(), json!(ip));
    }
    if let Some(mac) = &opts.mac {
        body.insert("mac".into(), json!(mac));
    }
    if let Some(name) = &opts.name {
        body.insert("name".into(), json!(name));
    }
    if let Some(owner) = &opts.owner {
        body.insert("owner".into(), json!(owner));
    }
    if body.is_empty() {
        anyhow::bail!("update requires at least one of --ip, --mac, --name, --owner");
    }

    let resp: HostResponse = send_json(
        reqwest::Method::PUT,
        &format!("{}/hosts/{}", base_url(port), id),
        serde_json::Value::Object(body),
    )
    .await?;

    println!("Updated host {}.", resp.id);
    if let Some(msg) = resp.message {
        println!("Note: {}", msg);
    }
    Ok(())
}

async fn cmd_delete(port: u16, id: u64) -> Result<()> {
    let resp: DeleteResponse = {
        let url = format!("{}/hosts/{}", base_url(port), id);
        let r = reqwest::Client::new()
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("failed to connect to roused at {} — is it running?", url))?;
        parse_response(r).await?
    };
    if resp.success {
        println!("Deleted host {}.", id);
    }
    Ok(())
}

async fn cmd_wake(port: u16, mac: &str) -> Result<()> {
    let resp: WakeResponse = send_json(
        reqwest::Method::POST,
        &format!("{}/wake", base_url(port)),
        json!({ "mac": mac }),
    )
    .await?;
    println!("{}", resp.message);
    Ok(())
}

fn print_usage() {
    println!("Usage: rouse-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  list                          List hosts with live status");
    println!("  add <ip> [mac] [options]      Register a host (MAC auto-resolved if omitted)");
    println!("  update <id> [options]         Change host fields (--mac '' re-resolves)");
    println!("  delete <id>                   Remove a host");
    println!("  wake <mac>                    Send a wake-on-LAN packet");
    println!();
    println!("Options:");
    println!("  --ip <addr>      Network address (update)");
    println!("  --mac <addr>     Hardware address");
    println!("  --name <name>    Display name");
    println!("  --owner <owner>  Owner label");
    println!("  --port <port>    API port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[derive(Default)]
struct FieldOpts {
    ip: Option<String>,
    mac: Option<String>,
    name: Option<String>,
    owner: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse options
    let mut port = DEFAULT_PORT;
    let mut opts = FieldOpts::default();
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let take = |args: &[String], i: usize, flag: &str| -> Result<String> {
            args.get(i)
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match args[i].as_str() {
            "--port" => {
                i += 1;
                port = take(&args, i, "--port")?
                    .parse()
                    .context("--port must be a number")?;
            }
            "--ip" => {
                i += 1;
                opts.ip = Some(take(&args, i, "--ip")?);
            }
            "--mac" => {
                i += 1;
                opts.mac = Some(take(&args, i, "--mac")?);
            }
            "--name" => {
                i += 1;
                opts.name = Some(take(&args, i, "--name")?);
            }
            "--owner" => {
                i += 1;
                opts.owner = Some(take(&args, i, "--owner")?);
            }
            _ => remaining.push(&args[i]),
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["list"] | [] => cmd_list(port).await,
        ["add", ip] => cmd_add(port, ip, None, &opts).await,
        ["add", ip, mac] => cmd_add(port, ip, Some(mac), &opts).await,
        ["update", id] => {
            let id = id.parse().context("id must be a number")?;
            cmd_update(port, id, &opts).await
        }
        ["delete", id] => {
            let id = id.parse().context("id must be a number")?;
            cmd_delete(port, id).await
        }
        ["wake", mac] => cmd_wake(port, mac).await,
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
