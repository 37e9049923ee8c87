//! Taskboard CLI: list and inspect tasks and projects against a running backend.
//!
//! Usage:
//!   taskboard-cli tasks [--page N] [--size N] [--status S] [--project ID]
//!   taskboard-cli task <id>
//!   taskboard-cli projects [--page N] [--size N]
//!   taskboard-cli project <id>
//!   taskboard-cli login <email> <password>
//!   taskboard-cli verify [<token>]

use anyhow::{anyhow, bail, Context};
use serde::Serialize;
use taskboard_client::types::Credentials;
use taskboard_client::{PageRequest, TaskStatus, TaskboardClient, TaskboardClientBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let mut builder = TaskboardClientBuilder::new();
    if let Ok(token) = std::env::var("TASKBOARD_TOKEN") {
        builder = builder.token(token);
    }
    let client = builder.build().context("failed to build client")?;

    match args[1].as_str() {
        "tasks" => cmd_tasks(&client, &args[2..]).await,
        "task" => cmd_task(&client, &args[2..]).await,
        "projects" => cmd_projects(&client, &args[2..]).await,
        "project" => cmd_project(&client, &args[2..]).await,
        "login" => cmd_login(&client, &args[2..]).await,
        "verify" => cmd_verify(&client, &args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("taskboard-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"taskboard-cli: Taskboard API command line

USAGE:
    taskboard-cli <COMMAND> [OPTIONS]

COMMANDS:
    tasks [--page N] [--size N] [--status S] [--project ID]
                                List tasks, optionally filtered
    task <id>                   Show one task
    projects [--page N] [--size N]
                                List projects
    project <id>                Show one project
    login <email> <password>    Sign in and print the issued token
    verify [<token>]            Check a token (defaults to TASKBOARD_TOKEN)
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    TASKBOARD_API_URL           API root (default http://localhost:8080/api)
    TASKBOARD_TOKEN             Bearer token sent with every request
    RUST_LOG                    Log filter, e.g. taskboard_client=debug"#
    );
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], name: &str) -> anyhow::Result<Option<T>> {
    flag_value(args, name)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| anyhow!("invalid value for {name}: {v}"))
        })
        .transpose()
}

fn page_request(args: &[String]) -> anyhow::Result<PageRequest> {
    let default = PageRequest::default();
    Ok(PageRequest::new(
        parse_flag(args, "--page")?.unwrap_or(default.page),
        parse_flag(args, "--size")?.unwrap_or(default.size),
    ))
}

fn id_arg(args: &[String]) -> anyhow::Result<i64> {
    let raw = args.first().ok_or_else(|| anyhow!("missing <id>"))?;
    raw.parse().with_context(|| format!("invalid id: {raw}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_tasks(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let page = page_request(args)?;
    let tasks = client.tasks();
    let status = flag_value(args, "--status")
        .map(|s| s.parse::<TaskStatus>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let project: Option<i64> = parse_flag(args, "--project")?;

    let result = match (status, project) {
        (Some(_), Some(_)) => bail!("--status and --project cannot be combined"),
        (Some(status), None) => tasks.list_by_status(status, page).await?,
        (None, Some(project_id)) => tasks.list_by_project(project_id, page).await?,
        (None, None) => tasks.list(page).await?,
    };

    for task in &result.items {
        println!(
            "#{:<6} {:<12} {:<7} {}",
            task.id, task.status, task.priority, task.title
        );
    }
    println!(
        "page {}/{} ({} total)",
        result.info.current_page + 1,
        result.info.total_pages,
        result.info.total_elements
    );
    Ok(())
}

async fn cmd_task(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let task = client.tasks().get(id_arg(args)?).await?;
    print_json(&task)
}

async fn cmd_projects(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let result = client.projects().list(page_request(args)?).await?;
    for project in &result.items {
        println!("#{:<6} {}", project.id, project.name);
    }
    println!(
        "page {}/{} ({} total)",
        result.info.current_page + 1,
        result.info.total_pages,
        result.info.total_elements
    );
    Ok(())
}

async fn cmd_project(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let project = client.projects().get(id_arg(args)?).await?;
    print_json(&project)
}

async fn cmd_login(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let [email, password] = args else {
        bail!("usage: taskboard-cli login <email> <password>");
    };
    let resp = client
        .auth()
        .login(&Credentials::new(email.as_str(), password.as_str()))
        .await?;
    println!("signed in as {} <{}>", resp.username, resp.email);
    match resp.token {
        Some(token) => println!("{token}"),
        None => eprintln!("warning: backend did not issue a token"),
    }
    Ok(())
}

async fn cmd_verify(client: &TaskboardClient, args: &[String]) -> anyhow::Result<()> {
    let token = args
        .first()
        .cloned()
        .or_else(|| client.session().token())
        .ok_or_else(|| anyhow!("no token given and TASKBOARD_TOKEN is unset"))?;
    if client.auth().verify_token(&token).await {
        println!("token is valid");
        Ok(())
    } else {
        bail!("token rejected")
    }
}
