//! Validation and defaulting of provisioning parameters.
//!
//! Provisioning requests carry a free-form string map chosen by the storage
//! class author. This module checks that map against the provider's accepted
//! vocabulary and produces a fully-defaulted [`DiskParams`] for the gateway,
//! or a [`ParamError`] naming the first rule the request broke.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::volume::{AccessMode, AccessType, CreateVolumeRequest};

/// Parameter key selecting the disk class.
pub const DISK_TYPE_KEY: &str = "diskType";

/// Parameter key selecting the billing model.
pub const CHARGE_TYPE_KEY: &str = "diskChargeType";

/// Parameter key giving the prepaid billing period in months.
pub const PREPAID_PERIOD_KEY: &str = "diskChargeTypePrepaidPeriod";

/// Parameter key selecting the prepaid renewal policy.
pub const RENEW_POLICY_KEY: &str = "diskChargePrepaidRenewFlag";

/// Parameter key requesting an encrypted disk.
pub const ENCRYPT_KEY: &str = "encrypt";

/// The only value accepted under [`ENCRYPT_KEY`].
pub const ENCRYPT_ENABLED: &str = "ENCRYPT";

/// Prepaid billing period assumed when the parameter is absent.
pub const DEFAULT_PREPAID_PERIOD: u32 = 1;

const DISK_CLASS_BASIC: &str = "CLOUD_BASIC";
const DISK_CLASS_PREMIUM: &str = "CLOUD_PREMIUM";
const DISK_CLASS_SSD: &str = "CLOUD_SSD";

const CHARGE_TYPE_PREPAID: &str = "PREPAID";
const CHARGE_TYPE_POSTPAID_BY_HOUR: &str = "POSTPAID_BY_HOUR";

const RENEW_AUTO_WITH_NOTICE: &str = "NOTIFY_AND_AUTO_RENEW";
const RENEW_MANUAL_WITH_NOTICE: &str = "NOTIFY_AND_MANUAL_RENEW";
const RENEW_MANUAL_WITHOUT_NOTICE: &str = "DISABLE_NOTIFY_AND_MANUAL_RENEW";

/// Storage media class of a disk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DiskClass {
    /// Spinning-disk backed storage.
    #[default]
    Basic,
    /// Mixed-media storage.
    Premium,
    /// SSD backed storage.
    Ssd,
}

impl DiskClass {
    /// Returns the provider's wire token for this class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => DISK_CLASS_BASIC,
            Self::Premium => DISK_CLASS_PREMIUM,
            Self::Ssd => DISK_CLASS_SSD,
        }
    }

    /// Parses a provider wire token, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            DISK_CLASS_BASIC => Some(Self::Basic),
            DISK_CLASS_PREMIUM => Some(Self::Premium),
            DISK_CLASS_SSD => Some(Self::Ssd),
            _ => None,
        }
    }
}

impl fmt::Display for DiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing model of a disk.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChargeType {
    /// Metered hourly billing.
    #[default]
    PostpaidByHour,
    /// Billing for a fixed period paid up front.
    Prepaid,
}

impl ChargeType {
    /// Returns the provider's wire token for this billing model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostpaidByHour => CHARGE_TYPE_POSTPAID_BY_HOUR,
            Self::Prepaid => CHARGE_TYPE_PREPAID,
        }
    }

    /// Parses a provider wire token, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            CHARGE_TYPE_POSTPAID_BY_HOUR => Some(Self::PostpaidByHour),
            CHARGE_TYPE_PREPAID => Some(Self::Prepaid),
            _ => None,
        }
    }
}

impl fmt::Display for ChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens when a prepaid billing period runs out.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RenewPolicy {
    /// Notify the account owner and renew automatically.
    AutoWithNotice,
    /// Notify the account owner and wait for a manual renewal.
    #[default]
    ManualWithNotice,
    /// Expire silently unless renewed manually.
    ManualWithoutNotice,
}

impl RenewPolicy {
    /// Returns the provider's wire token for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoWithNotice => RENEW_AUTO_WITH_NOTICE,
            Self::ManualWithNotice => RENEW_MANUAL_WITH_NOTICE,
            Self::ManualWithoutNotice => RENEW_MANUAL_WITHOUT_NOTICE,
        }
    }

    /// Parses a provider wire token, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            RENEW_AUTO_WITH_NOTICE => Some(Self::AutoWithNotice),
            RENEW_MANUAL_WITH_NOTICE => Some(Self::ManualWithNotice),
            RENEW_MANUAL_WITHOUT_NOTICE => Some(Self::ManualWithoutNotice),
            _ => None,
        }
    }
}

impl fmt::Display for RenewPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-resolved billing terms for a disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Billing {
    /// Metered hourly billing.
    PostpaidByHour,
    /// A fixed prepaid term.
    Prepaid {
        /// Length of the term in months.
        period_months: u32,
        /// What happens when the term ends.
        renew: RenewPolicy,
    },
}

impl Billing {
    /// Returns the charge type this billing resolves to.
    #[must_use]
    pub const fn charge_type(&self) -> ChargeType {
        match self {
            Self::PostpaidByHour => ChargeType::PostpaidByHour,
            Self::Prepaid { .. } => ChargeType::Prepaid,
        }
    }
}

/// The prepaid billing periods the provider accepts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParamTable {
    valid_prepaid_periods: &'static [u32],
}

impl ParamTable {
    /// Table matching the provider's published billing periods.
    #[must_use]
    pub const fn provider_default() -> Self {
        Self {
            valid_prepaid_periods: &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 24, 36],
        }
    }

    /// Builds a table accepting the given periods, primarily used by tests.
    #[must_use]
    pub const fn new(valid_prepaid_periods: &'static [u32]) -> Self {
        Self {
            valid_prepaid_periods,
        }
    }

    fn allows_period(&self, period: u32) -> bool {
        self.valid_prepaid_periods.contains(&period)
    }
}

impl Default for ParamTable {
    fn default() -> Self {
        Self::provider_default()
    }
}

/// Normalized disk parameters ready to hand to the gateway.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DiskParams {
    /// Storage media class.
    pub class: DiskClass,
    /// Resolved billing terms.
    pub billing: Billing,
    /// Whether the disk is encrypted at rest.
    pub encrypted: bool,
}

/// Reasons a provisioning request fails validation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParamError {
    /// Raised when the request name is empty.
    #[error("volume name is empty")]
    MissingName,
    /// Raised when the request carries no capabilities.
    #[error("volume has no capabilities")]
    MissingCapabilities,
    /// Raised when a capability asks for a raw block device.
    #[error("block volumes are not supported")]
    BlockAccessUnsupported,
    /// Raised when a capability asks for anything other than single-node
    /// writer access.
    #[error("access mode {mode:?} is not supported; only single-node writer volumes can be provisioned")]
    AccessModeUnsupported {
        /// The rejected access mode.
        mode: AccessMode,
    },
    /// Raised when the disk type parameter names an unknown class.
    #[error("unsupported disk type {value:?}")]
    InvalidDiskType {
        /// The rejected parameter value.
        value: String,
    },
    /// Raised when the charge type parameter names an unknown billing model.
    #[error("unsupported charge type {value:?}")]
    InvalidChargeType {
        /// The rejected parameter value.
        value: String,
    },
    /// Raised when the prepaid period is not one of the provider's accepted
    /// month counts.
    #[error("prepaid period {value:?} is not a valid number of months")]
    InvalidPrepaidPeriod {
        /// The rejected parameter value.
        value: String,
    },
    /// Raised when the renewal policy parameter names an unknown policy.
    #[error("unsupported renew policy {value:?}")]
    InvalidRenewPolicy {
        /// The rejected parameter value.
        value: String,
    },
    /// Raised when the encryption parameter carries anything other than the
    /// recognized enabling token.
    #[error("unsupported encryption setting {value:?}")]
    InvalidEncrypt {
        /// The rejected parameter value.
        value: String,
    },
}

/// Validates a provisioning request against the accepted vocabulary.
///
/// Rules are evaluated in a fixed order and the first broken one is
/// returned, so a request with several problems reports the same error on
/// every retry. Absent parameters fall back to provider defaults; prepaid
/// billing options are only examined when the charge type is prepaid.
///
/// # Errors
///
/// Returns the first [`ParamError`] the request triggers.
pub fn validate_request(
    table: &ParamTable,
    request: &CreateVolumeRequest,
) -> Result<DiskParams, ParamError> {
    if request.name.is_empty() {
        return Err(ParamError::MissingName);
    }
    if request.capabilities.is_empty() {
        return Err(ParamError::MissingCapabilities);
    }
    for capability in &request.capabilities {
        if capability.access_type == AccessType::Block {
            return Err(ParamError::BlockAccessUnsupported);
        }
        if capability.access_mode != AccessMode::SingleNodeWriter {
            return Err(ParamError::AccessModeUnsupported {
                mode: capability.access_mode,
            });
        }
    }
    let class = parse_disk_class(&request.parameters)?;
    let billing = parse_billing(table, &request.parameters)?;
    let encrypted = parse_encrypt(&request.parameters)?;
    Ok(DiskParams {
        class,
        billing,
        encrypted,
    })
}

fn parse_disk_class(parameters: &HashMap<String, String>) -> Result<DiskClass, ParamError> {
    let Some(value) = parameters.get(DISK_TYPE_KEY) else {
        return Ok(DiskClass::default());
    };
    DiskClass::parse(value).ok_or_else(|| ParamError::InvalidDiskType {
        value: value.clone(),
    })
}

fn parse_billing(
    table: &ParamTable,
    parameters: &HashMap<String, String>,
) -> Result<Billing, ParamError> {
    match parse_charge_type(parameters)? {
        ChargeType::PostpaidByHour => Ok(Billing::PostpaidByHour),
        ChargeType::Prepaid => {
            let period_months = parse_prepaid_period(table, parameters)?;
            let renew = parse_renew_policy(parameters)?;
            Ok(Billing::Prepaid {
                period_months,
                renew,
            })
        }
    }
}

fn parse_charge_type(parameters: &HashMap<String, String>) -> Result<ChargeType, ParamError> {
    let Some(value) = parameters.get(CHARGE_TYPE_KEY) else {
        return Ok(ChargeType::default());
    };
    ChargeType::parse(value).ok_or_else(|| ParamError::InvalidChargeType {
        value: value.clone(),
    })
}

fn parse_prepaid_period(
    table: &ParamTable,
    parameters: &HashMap<String, String>,
) -> Result<u32, ParamError> {
    let Some(value) = parameters.get(PREPAID_PERIOD_KEY) else {
        return Ok(DEFAULT_PREPAID_PERIOD);
    };
    let period = value
        .parse::<u32>()
        .map_err(|_| ParamError::InvalidPrepaidPeriod {
            value: value.clone(),
        })?;
    if !table.allows_period(period) {
        return Err(ParamError::InvalidPrepaidPeriod {
            value: value.clone(),
        });
    }
    Ok(period)
}

fn parse_renew_policy(parameters: &HashMap<String, String>) -> Result<RenewPolicy, ParamError> {
    let Some(value) = parameters.get(RENEW_POLICY_KEY) else {
        return Ok(RenewPolicy::default());
    };
    RenewPolicy::parse(value).ok_or_else(|| ParamError::InvalidRenewPolicy {
        value: value.clone(),
    })
}

fn parse_encrypt(parameters: &HashMap<String, String>) -> Result<bool, ParamError> {
    let Some(value) = parameters.get(ENCRYPT_KEY) else {
        return Ok(false);
    };
    if value.is_empty() {
        return Ok(false);
    }
    if value == ENCRYPT_ENABLED {
        return Ok(true);
    }
    Err(ParamError::InvalidEncrypt {
        value: value.clone(),
    })
}
