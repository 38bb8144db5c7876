//! Command-line interface definitions for the `ruslan` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `ruslan` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ruslan",
    about = "Provision and attach CBS disks through the cloud disk API",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Provision a disk and wait for it to settle.
    #[command(name = "create", about = "Provision a disk and wait for it to settle")]
    Create(CreateCommand),
    /// Destroy a disk.
    #[command(name = "delete", about = "Destroy a disk")]
    Delete(DeleteCommand),
    /// Attach a disk to an instance.
    #[command(name = "attach", about = "Attach a disk to an instance")]
    Attach(AttachCommand),
    /// Detach a disk from its instance.
    #[command(name = "detach", about = "Detach a disk from its instance")]
    Detach(DetachCommand),
    /// Print the operations this controller supports.
    #[command(name = "caps", about = "Print the operations this controller supports")]
    Caps,
}

/// Arguments for the `ruslan create` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CreateCommand {
    /// Name for the new volume, doubling as the provider-side idempotency
    /// token. Repeating a create with the same name yields the same disk.
    ///
    /// A unique name is generated when the flag is omitted.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
    /// Requested size in whole gibibytes.
    #[arg(long, value_name = "GIB")]
    pub(crate) size_gib: u64,
    /// Storage media class (for example `CLOUD_PREMIUM` or `CLOUD_SSD`).
    ///
    /// The controller rejects classes the provider does not offer.
    #[arg(long, value_name = "TYPE")]
    pub(crate) disk_type: Option<String>,
    /// Billing model (`POSTPAID_BY_HOUR` or `PREPAID`).
    #[arg(long, value_name = "MODEL")]
    pub(crate) charge_type: Option<String>,
    /// Prepaid term in months. Only meaningful with `--charge-type PREPAID`.
    #[arg(long, value_name = "MONTHS")]
    pub(crate) prepaid_period: Option<String>,
    /// Renewal policy applied when a prepaid term runs out.
    #[arg(long, value_name = "POLICY")]
    pub(crate) renew_policy: Option<String>,
    /// Request an encrypted disk.
    #[arg(long)]
    pub(crate) encrypt: bool,
}

/// Arguments for the `ruslan delete` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DeleteCommand {
    /// Identifier of the disk to destroy.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
}

/// Arguments for the `ruslan attach` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct AttachCommand {
    /// Identifier of the disk to attach.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
    /// Instance to attach the disk to.
    #[arg(value_name = "INSTANCE_ID")]
    pub(crate) instance_id: String,
}

/// Arguments for the `ruslan detach` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct DetachCommand {
    /// Identifier of the disk to detach.
    #[arg(value_name = "VOLUME_ID")]
    pub(crate) volume_id: String,
    /// Instance the caller believes the disk is attached to.
    #[arg(value_name = "INSTANCE_ID")]
    pub(crate) instance_id: String,
}
