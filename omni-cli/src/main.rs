//! omni-cli — command-line frontend for the OmniStudio generation API
//!
//! Talks to a running omni-server over HTTP.
//!
//! # Subcommands
//! - `status`                             — show server health
//! - `session new [--user-agent <ua>]`    — create a session
//! - `session show <id>`                  — fetch a session
//! - `generate <module> <prompt>`         — submit a generation request
//! - `history <session-id> [-n <limit>]`  — list a session's generations
//! - `stats`                              — platform-wide counters

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8780";
const DEFAULT_LIMIT: usize = 50;

/// The generation categories the server exposes under /api/ai/.
const MODULES: [&str; 7] = [
    "website", "game", "content", "image", "code", "data", "creative",
];

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "omni-cli",
    version,
    about = "OmniStudio generation platform — command-line frontend"
)]
struct Cli {
    /// OmniStudio HTTP server URL (overrides OMNI_HTTP_URL env var)
    #[arg(long, env = "OMNI_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show OmniStudio server status
    Status,

    /// Session management
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Submit a generation request
    Generate {
        /// Module type: website, game, content, image, code, data, creative
        module: String,

        /// The prompt (description, idea, topic — the module's primary text)
        prompt: String,

        /// Module-specific parameter, repeatable: --param style=minimal
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Session id to account the generation against
        #[arg(long)]
        session: Option<String>,

        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a session's generation history
    History {
        /// Session id
        session_id: String,

        /// Maximum number of records to return
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show platform-wide stats
    Stats,
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    /// Create a new session
    New {
        /// User agent string stored in the session metadata
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Fetch a session by id
    Show {
        /// Session id
        id: String,
    },
}

// ============================================================================
// Request body assembly (pure, testable)
// ============================================================================

/// The JSON field each module expects its prompt under.
pub fn prompt_field(module: &str) -> Option<&'static str> {
    match module {
        "website" => Some("description"),
        "game" => Some("game_idea"),
        "content" => Some("topic"),
        "image" => Some("prompt"),
        "code" => Some("request"),
        "data" => Some("data_input"),
        "creative" => Some("prompt"),
        _ => None,
    }
}

/// Split a `key=value` parameter argument.
pub fn parse_param(arg: &str) -> anyhow::Result<(String, String)> {
    match arg.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => anyhow::bail!("invalid --param '{}', expected key=value", arg),
    }
}

/// Assemble the request body for POST /api/ai/{module}.
pub fn generation_body(
    module: &str,
    prompt: &str,
    params: &[(String, String)],
    session: Option<&str>,
) -> anyhow::Result<Value> {
    let field = prompt_field(module).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown module '{}', expected one of: {}",
            module,
            MODULES.join(", ")
        )
    })?;

    let mut body = json!({ field: prompt });
    let obj = body.as_object_mut().expect("body is an object");
    for (k, v) in params {
        obj.insert(k.clone(), Value::String(v.clone()));
    }
    if let Some(session) = session {
        obj.insert("session_id".to_string(), Value::String(session.to_string()));
    }

    Ok(body)
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn client() -> anyhow::Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

fn get_json(server: &str, path: &str) -> anyhow::Result<Value> {
    let url = format!("{}{}", server, path);
    let resp = match client()?.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("omni-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    };
    check_response(resp, &url)
}

fn post_json(server: &str, path: &str, body: &Value) -> anyhow::Result<Value> {
    let url = format!("{}{}", server, path);
    let resp = match client()?.post(&url).json(body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("omni-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    };
    check_response(resp, &url)
}

fn check_response(resp: reqwest::blocking::Response, url: &str) -> anyhow::Result<Value> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("omni-cli: server returned {} for {}: {}", status, url, body);
        std::process::exit(1);
    }
    Ok(resp.json()?)
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let body = get_json(server, "/api/health")?;
    println!(
        "OmniStudio server: {}",
        body["status"].as_str().unwrap_or("unknown")
    );
    println!("Version:           {}", body["version"].as_str().unwrap_or("?"));
    println!(
        "Database:          {}",
        body["database"].as_str().unwrap_or("?")
    );
    Ok(())
}

fn do_session_new(server: &str, user_agent: Option<String>) -> anyhow::Result<()> {
    let body = post_json(server, "/api/sessions", &json!({ "user_agent": user_agent }))?;
    println!("Session id:    {}", body["id"].as_str().unwrap_or("?"));
    println!(
        "Session token: {}",
        body["session_token"].as_str().unwrap_or("?")
    );
    Ok(())
}

fn do_session_show(server: &str, id: &str) -> anyhow::Result<()> {
    let body = get_json(server, &format!("/api/sessions/{}", id))?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn do_generate(
    server: &str,
    module: &str,
    prompt: &str,
    raw_params: &[String],
    session: Option<&str>,
    json_output: bool,
) -> anyhow::Result<()> {
    let params = raw_params
        .iter()
        .map(|p| parse_param(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let body = generation_body(module, prompt, &params, session)?;

    let record = post_json(server, &format!("/api/ai/{}", module), &body)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Generation: {}", record["id"].as_str().unwrap_or("?"));
    println!("Status:     {}", record["status"].as_str().unwrap_or("?"));
    match record["status"].as_str() {
        Some("failed") => println!(
            "Error:      {}",
            record["error_message"].as_str().unwrap_or("?")
        ),
        _ => println!(
            "Result:\n{}",
            serde_json::to_string_pretty(&record["result"])?
        ),
    }
    Ok(())
}

fn do_history(server: &str, session_id: &str, limit: usize, json_output: bool) -> anyhow::Result<()> {
    let body = get_json(
        server,
        &format!("/api/history/{}?limit={}", session_id, limit),
    )?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let empty = Vec::new();
    let generations = body["generations"].as_array().unwrap_or(&empty);
    if generations.is_empty() {
        eprintln!("No generations found for session {}", session_id);
        return Ok(());
    }
    for g in generations {
        println!(
            "{}  {:<8}  {:<9}  {}",
            g["created_at"].as_str().unwrap_or("?"),
            g["module_type"].as_str().unwrap_or("?"),
            g["status"].as_str().unwrap_or("?"),
            g["prompt"].as_str().unwrap_or("")
        );
    }
    Ok(())
}

fn do_stats(server: &str) -> anyhow::Result<()> {
    let body = get_json(server, "/api/stats/platform")?;
    println!(
        "Sessions:    {}",
        body["total_sessions"].as_i64().unwrap_or(0)
    );
    println!(
        "Generations: {}",
        body["total_generations"].as_i64().unwrap_or(0)
    );
    if let Some(modules) = body["module_stats"].as_object() {
        for (module, count) in modules {
            println!("  {:<9} {}", module, count.as_i64().unwrap_or(0));
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Status => do_status(&server),
        Commands::Session { command } => match command {
            SessionCommands::New { user_agent } => do_session_new(&server, user_agent),
            SessionCommands::Show { id } => do_session_show(&server, &id),
        },
        Commands::Generate {
            module,
            prompt,
            params,
            session,
            json,
        } => do_generate(&server, &module, &prompt, &params, session.as_deref(), json),
        Commands::History {
            session_id,
            limit,
            json,
        } => do_history(&server, &session_id, limit, json),
        Commands::Stats => do_stats(&server),
    };

    if let Err(e) = result {
        eprintln!("omni-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // TEST 1: every advertised module has a prompt field
    // ========================================================================
    #[test]
    fn test_prompt_field_covers_all_modules() {
        for m in MODULES {
            assert!(prompt_field(m).is_some(), "module {} must map", m);
        }
        assert!(prompt_field("video").is_none());
    }

    // ========================================================================
    // TEST 2: parse_param splits on the first '='
    // ========================================================================
    #[test]
    fn test_parse_param_basic() {
        let (k, v) = parse_param("style=minimal").unwrap();
        assert_eq!(k, "style");
        assert_eq!(v, "minimal");

        let (k, v) = parse_param("size=1024x1024=wide").unwrap();
        assert_eq!(k, "size");
        assert_eq!(v, "1024x1024=wide");
    }

    // ========================================================================
    // TEST 3: parse_param rejects malformed arguments
    // ========================================================================
    #[test]
    fn test_parse_param_rejects_malformed() {
        assert!(parse_param("no-equals").is_err());
        assert!(parse_param("=value").is_err());
    }

    // ========================================================================
    // TEST 4: generation_body puts the prompt under the module's field
    // ========================================================================
    #[test]
    fn test_generation_body_prompt_field() {
        let body = generation_body("website", "a bakery site", &[], None).unwrap();
        assert_eq!(body["description"], "a bakery site");

        let body = generation_body("code", "sort a vec", &[], None).unwrap();
        assert_eq!(body["request"], "sort a vec");
    }

    // ========================================================================
    // TEST 5: generation_body merges params and session id
    // ========================================================================
    #[test]
    fn test_generation_body_params_and_session() {
        let params = vec![("style".to_string(), "minimal".to_string())];
        let body = generation_body("image", "a lighthouse", &params, Some("s-123")).unwrap();
        assert_eq!(body["prompt"], "a lighthouse");
        assert_eq!(body["style"], "minimal");
        assert_eq!(body["session_id"], "s-123");
    }

    // ========================================================================
    // TEST 6: generation_body rejects unknown modules
    // ========================================================================
    #[test]
    fn test_generation_body_unknown_module() {
        assert!(generation_body("video", "x", &[], None).is_err());
    }
}
