//! Binary entry point for the ruslan CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use uuid::Uuid;

use ruslan::{
    CbsConfig, CbsError, CbsGateway, CONTROLLER_CAPABILITIES, ControllerError, CreateVolumeRequest,
    VolumeCapability, VolumeController,
    params::{CHARGE_TYPE_KEY, DISK_TYPE_KEY, ENCRYPT_ENABLED, ENCRYPT_KEY, PREPAID_PERIOD_KEY,
        RENEW_POLICY_KEY},
    volume::gib_to_bytes,
};

mod cli;

use cli::{AttachCommand, Cli, CreateCommand, DeleteCommand, DetachCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("gateway error: {0}")]
    Gateway(String),
    #[error("volume operation failed ({}): {}", .0.code(), .0)]
    Controller(#[from] ControllerError<CbsError>),
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli {
        Cli::Create(command) => create_volume(command).await,
        Cli::Delete(command) => delete_volume(command).await,
        Cli::Attach(command) => attach_volume(command).await,
        Cli::Detach(command) => detach_volume(command).await,
        Cli::Caps => Ok(print_capabilities()),
    }
}

fn build_controller() -> Result<VolumeController<CbsGateway>, CliError> {
    let config =
        CbsConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let zone = config.zone.clone();
    let gateway = CbsGateway::new(config).map_err(|err| CliError::Gateway(err.to_string()))?;
    Ok(VolumeController::new(gateway, zone))
}

fn build_create_request(name: String, args: &CreateCommand) -> CreateVolumeRequest {
    let mut builder = CreateVolumeRequest::builder()
        .name(name)
        .capacity_bytes(gib_to_bytes(args.size_gib))
        .capability(VolumeCapability::single_writer_mount());
    if let Some(value) = &args.disk_type {
        builder = builder.parameter(DISK_TYPE_KEY, value);
    }
    if let Some(value) = &args.charge_type {
        builder = builder.parameter(CHARGE_TYPE_KEY, value);
    }
    if let Some(value) = &args.prepaid_period {
        builder = builder.parameter(PREPAID_PERIOD_KEY, value);
    }
    if let Some(value) = &args.renew_policy {
        builder = builder.parameter(RENEW_POLICY_KEY, value);
    }
    if args.encrypt {
        builder = builder.parameter(ENCRYPT_KEY, ENCRYPT_ENABLED);
    }
    builder.build()
}

async fn create_volume(args: CreateCommand) -> Result<i32, CliError> {
    let controller = build_controller()?;
    let name = args
        .name
        .clone()
        .unwrap_or_else(|| format!("ruslan-{}", Uuid::new_v4().simple()));
    let request = build_create_request(name, &args);
    let volume = controller.create_volume(&request).await?;
    writeln!(io::stdout(), "{} {}", volume.id, volume.capacity_bytes).ok();
    Ok(0)
}

async fn delete_volume(args: DeleteCommand) -> Result<i32, CliError> {
    let controller = build_controller()?;
    controller.delete_volume(&args.volume_id).await?;
    writeln!(io::stdout(), "deleted {}", args.volume_id).ok();
    Ok(0)
}

async fn attach_volume(args: AttachCommand) -> Result<i32, CliError> {
    let controller = build_controller()?;
    let capability = VolumeCapability::single_writer_mount();
    controller
        .publish_volume(&args.volume_id, &args.instance_id, Some(&capability))
        .await?;
    writeln!(
        io::stdout(),
        "attached {} to {}",
        args.volume_id,
        args.instance_id
    )
    .ok();
    Ok(0)
}

async fn detach_volume(args: DetachCommand) -> Result<i32, CliError> {
    let controller = build_controller()?;
    controller
        .unpublish_volume(&args.volume_id, &args.instance_id)
        .await?;
    writeln!(
        io::stdout(),
        "detached {} from {}",
        args.volume_id,
        args.instance_id
    )
    .ok();
    Ok(0)
}

fn print_capabilities() -> i32 {
    let mut stdout = io::stdout();
    for capability in CONTROLLER_CAPABILITIES {
        writeln!(stdout, "{}", capability.as_str()).ok();
    }
    0
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
