//! # Launcher
//!
//! Runs every project of an [`AppModel`] under the sidecar CLI:
//!
//! ```text
//! dapr run --app-id api --app-port 5000 --dapr-http-port 3500 -- /srv/bin/order-api
//! ```
//!
//! The host stops when the shutdown future resolves (Ctrl-C in `main`) or as soon
//! as any child exits. Each CLI runs in its own process group, so stopping reaches
//! the sidecar and the service it started. Every group gets `SIGTERM`, then
//! [`STOP_GRACE_PERIOD`] to exit, then `SIGKILL`.

use crate::resources::{AppModel, ProjectResource};
use std::future::Future;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::task::JoinSet;
use tracing::{info, warn};

pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to start {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{name} exited with {status}")]
    Exited { name: String, status: ExitStatus },
    #[error("failed to wait for {name}: {source}")]
    Wait {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

type Supervised = JoinSet<(String, std::io::Result<ExitStatus>)>;

/// Arguments passed to the sidecar CLI for one project.
pub fn dapr_run_args(project: &ProjectResource) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--app-id".to_string(),
        project.name.clone(),
    ];
    if let Some(port) = project.app_port {
        args.push("--app-port".to_string());
        args.push(port.to_string());
    }
    if let Some(sidecar) = &project.sidecar {
        args.push("--dapr-http-port".to_string());
        args.push(sidecar.http_port.to_string());
    }
    args.push("--".to_string());
    args.push(project.binary.display().to_string());
    args
}

fn spawn(model: &AppModel, project: &ProjectResource) -> Result<Child, HostError> {
    let args = dapr_run_args(project);
    info!(
        project = %project.name,
        cli = %model.dapr_cli_path.display(),
        args = %args.join(" "),
        "Launching"
    );
    let mut command = Command::new(&model.dapr_cli_path);
    command
        .args(&args)
        .envs(project.launch_environment())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);
    command.spawn().map_err(|source| HostError::Spawn {
        name: project.name.clone(),
        source,
    })
}

/// Sends `signal` to every process in the group led by `pgid`.
#[cfg(unix)]
async fn signal_group(pgid: u32, signal: &str) {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg("--")
        .arg(format!("-{pgid}"))
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await;
    match status {
        Ok(status) if status.success() => {
            tracing::debug!(pgid, signal, "Signalled process group")
        }
        // The group is already empty.
        Ok(_) => {}
        Err(e) => warn!(pgid, signal, error = %e, "Could not signal process group"),
    }
}

#[cfg(not(unix))]
async fn signal_group(_pgid: u32, _signal: &str) {}

/// Terminates every group, waits up to `grace` for the CLIs to exit, then kills
/// whatever is left in the groups.
async fn stop_all(groups: &[u32], children: &mut Supervised, grace: Duration) {
    for &pgid in groups {
        signal_group(pgid, "TERM").await;
    }
    let drained = tokio::time::timeout(grace, async {
        while children.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!(grace_secs = grace.as_secs(), "Projects still running after grace period, killing");
    }
    for &pgid in groups {
        signal_group(pgid, "KILL").await;
    }
    // Dropping the wait tasks drops each Child, and kill_on_drop stops the CLI.
    children.shutdown().await;
}

/// Resolves on Ctrl-C. A host that cannot install the handler keeps running.
pub async fn shutdown_signal() {
    settle_signal(tokio::signal::ctrl_c().await).await
}

async fn settle_signal(registered: std::io::Result<()>) {
    if let Err(e) = registered {
        warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Starts every project and supervises them until `shutdown` resolves or one exits.
pub async fn launch<F>(model: &AppModel, shutdown: F) -> Result<(), HostError>
where
    F: Future<Output = ()>,
{
    launch_with_grace(model, shutdown, STOP_GRACE_PERIOD).await
}

/// [`launch`] with an explicit time between `SIGTERM` and `SIGKILL`.
pub async fn launch_with_grace<F>(
    model: &AppModel,
    shutdown: F,
    grace: Duration,
) -> Result<(), HostError>
where
    F: Future<Output = ()>,
{
    let mut children: Supervised = JoinSet::new();
    let mut groups = Vec::with_capacity(model.projects.len());
    for project in &model.projects {
        let mut child = match spawn(model, project) {
            Ok(child) => child,
            Err(e) => {
                stop_all(&groups, &mut children, grace).await;
                return Err(e);
            }
        };
        groups.extend(child.id());
        let name = project.name.clone();
        children.spawn(async move {
            let status = child.wait().await;
            (name, status)
        });
    }

    tokio::pin!(shutdown);
    let result = tokio::select! {
        _ = &mut shutdown => {
            info!("Stopping all projects");
            Ok(())
        }
        Some(joined) = children.join_next() => match joined {
            Ok((name, Ok(status))) if status.success() => {
                info!(project = %name, "Project exited, stopping the rest");
                Ok(())
            }
            Ok((name, Ok(status))) => Err(HostError::Exited { name, status }),
            Ok((name, Err(source))) => Err(HostError::Wait { name, source }),
            Err(e) => {
                warn!(error = %e, "Supervisor task failed");
                Ok(())
            }
        },
    };

    stop_all(&groups, &mut children, grace).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::DaprSidecar;

    #[test]
    fn run_args_name_ports_and_binary() {
        let project = ProjectResource::new("api", "/srv/bin/order-api")
            .with_app_port(5000)
            .with_dapr_sidecar(DaprSidecar::new(3500));
        assert_eq!(
            dapr_run_args(&project),
            [
                "run",
                "--app-id",
                "api",
                "--app-port",
                "5000",
                "--dapr-http-port",
                "3500",
                "--",
                "/srv/bin/order-api"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_signal_handler_keeps_the_host_running() {
        let failed = settle_signal(Err(std::io::Error::other("no signal driver")));
        assert!(tokio::time::timeout(Duration::from_secs(3600), failed)
            .await
            .is_err());

        settle_signal(Ok(())).await;
    }

    #[tokio::test]
    async fn missing_cli_is_a_spawn_error() {
        let mut model = AppModel::new("/nonexistent/dapr-cli");
        model.add_project(ProjectResource::new("api", "order-api"));

        let err = launch(&model, std::future::pending()).await.unwrap_err();
        assert!(matches!(err, HostError::Spawn { ref name, .. } if name == "api"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_child_stops_the_host() {
        // `false` ignores its arguments and exits 1.
        let mut model = AppModel::new("false");
        model.add_project(ProjectResource::new("api", "order-api").with_app_port(5000));

        let err = launch(&model, std::future::pending()).await.unwrap_err();
        assert!(matches!(err, HostError::Exited { ref name, .. } if name == "api"));
    }

    #[cfg(target_os = "linux")]
    fn is_alive(pid: u32) -> bool {
        // A zombie keeps its /proc entry until someone reaps it.
        match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .is_some_and(|rest| !rest.trim_start().starts_with('Z')),
            Err(_) => false,
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn stopping_reaches_processes_started_by_the_cli() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in CLI: `api` starts a long-lived child and waits on it, `web` fails.
        let dir = tempfile::tempdir().unwrap();
        let cli = dir.path().join("fake-dapr");
        std::fs::write(
            &cli,
            "#!/bin/sh\n\
             if [ \"$3\" = web ]; then sleep 1; exit 1; fi\n\
             sleep 300 &\n\
             echo $! > \"$PID_FILE\"\n\
             wait\n",
        )
        .unwrap();
        std::fs::set_permissions(&cli, std::fs::Permissions::from_mode(0o755)).unwrap();
        let pid_file = dir.path().join("api.pid");

        let mut model = AppModel::new(&cli);
        model
            .add_project(
                ProjectResource::new("api", "order-api")
                    .with_environment("PID_FILE", pid_file.display().to_string()),
            )
            .add_project(ProjectResource::new("web", "web-frontend"));

        let err = launch_with_grace(&model, std::future::pending(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Exited { ref name, .. } if name == "web"));

        let pid: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while is_alive(pid) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!is_alive(pid), "process {pid} outlived the host");
    }
}
