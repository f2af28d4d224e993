use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kube_deploy::configuration;
use kube_deploy::namespace::ClusterNamespace;

/// Lists the pods of one deployment and rolls its container image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// YAML settings file. Without it settings are read from the environment.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// dotenv file loaded into the environment when present
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// `ls` or `deploy <tag>`; anything else lists
    args: Vec<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Ls,
    Deploy(String),
}

impl Command {
    fn from_args(args: &[String]) -> Command {
        match args {
            [command, tag] if command == "deploy" => Command::Deploy(tag.clone()),
            _ => Command::Ls,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.env_file.exists() {
        dotenvy::from_path(&cli.env_file)?;
    } else {
        tracing::debug!(path = %cli.env_file.display(), "no env file");
    }

    let settings = match &cli.config {
        Some(path) => configuration::load_from_yaml(path)?,
        None => configuration::Settings::from_env(|key| std::env::var(key).ok())?,
    };
    let cluster = settings.into_cluster_namespace()?;

    match Command::from_args(&cli.args) {
        Command::Ls => print_status(&cluster, "").await,
        Command::Deploy(tag) => {
            if let Err(err) = cluster.deploy(&tag).await {
                println!("Unable to deploy {tag:?} due to {err}");
                return Ok(());
            }
            print_status(&cluster, &tag).await;
        }
    }

    Ok(())
}

/// Prints one line per pod of the deployment, checked against `desired_image_tag` when set.
async fn print_status(cluster: &ClusterNamespace, desired_image_tag: &str) {
    match cluster.deployment_pods().await {
        Ok(pod_list) => println!(
            "{}",
            cluster.summary(&pod_list, chrono::Utc::now(), desired_image_tag)
        ),
        Err(err) => println!("Unable to retrieve pod list due to {err}"),
    }
}
