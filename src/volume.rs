//! Volume request and response data model for the controller.

use std::collections::HashMap;

/// Number of bits to shift a byte count right to obtain whole gibibytes.
pub const GIB_SHIFT: u32 = 30;

/// Byte count for a single gibibyte.
pub const GIB: u64 = 1 << GIB_SHIFT;

/// Rounds a byte count down to whole gibibytes.
///
/// The provider only provisions whole gibibytes and the controller never
/// rounds up, so a caller asking for `5 GiB + 1` byte receives 5 GiB.
#[must_use]
pub const fn whole_gib(bytes: u64) -> u64 {
    bytes >> GIB_SHIFT
}

/// Converts a whole-gibibyte count into bytes.
#[must_use]
pub const fn gib_to_bytes(gib: u64) -> u64 {
    gib << GIB_SHIFT
}

/// How a volume may be shared between nodes once published.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessMode {
    /// Published to a single node for read/write use.
    SingleNodeWriter,
    /// Published to a single node for read-only use.
    SingleNodeReaderOnly,
    /// Published to many nodes for read-only use.
    MultiNodeReaderOnly,
    /// Published to many nodes, exactly one of which may write.
    MultiNodeSingleWriter,
    /// Published to many nodes, all of which may write.
    MultiNodeMultiWriter,
}

/// Whether a volume is consumed through a filesystem or as a raw device.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessType {
    /// Mounted with a filesystem.
    Mount,
    /// Exposed as a raw block device.
    Block,
}

/// A single capability requested for a volume.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VolumeCapability {
    /// Requested sharing mode.
    pub access_mode: AccessMode,
    /// Requested consumption style.
    pub access_type: AccessType,
}

impl VolumeCapability {
    /// Capability for a filesystem volume writable from a single node.
    ///
    /// This is the only capability the controller accepts for provisioning.
    #[must_use]
    pub const fn single_writer_mount() -> Self {
        Self {
            access_mode: AccessMode::SingleNodeWriter,
            access_type: AccessType::Mount,
        }
    }
}

/// Parameters for creating a volume.
///
/// The name doubles as the provider-side idempotency token: retrying an
/// identical request after a success yields the original volume rather than
/// a second one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateVolumeRequest {
    /// Request name and idempotency key. Must be non-empty.
    pub name: String,
    /// Requested capacity in bytes, rounded down to whole gibibytes.
    pub capacity_bytes: u64,
    /// Capabilities the caller intends to use the volume with.
    pub capabilities: Vec<VolumeCapability>,
    /// Free-form provider parameters (disk class, billing, encryption).
    pub parameters: HashMap<String, String>,
}

impl CreateVolumeRequest {
    /// Starts a builder for a [`CreateVolumeRequest`].
    #[must_use]
    pub fn builder() -> CreateVolumeRequestBuilder {
        CreateVolumeRequestBuilder::new()
    }
}

/// Builder for [`CreateVolumeRequest`] that trims the name on construction.
///
/// Validation happens in the controller's create path, not here, so a
/// request built from wire input surfaces its problems together with the
/// rest of the parameter checks.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateVolumeRequestBuilder {
    name: String,
    capacity_bytes: u64,
    capabilities: Vec<VolumeCapability>,
    parameters: HashMap<String, String>,
}

impl CreateVolumeRequestBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request name.
    #[must_use]
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = value.into();
        self
    }

    /// Sets the requested capacity in bytes.
    #[must_use]
    pub const fn capacity_bytes(mut self, value: u64) -> Self {
        self.capacity_bytes = value;
        self
    }

    /// Adds a requested capability.
    #[must_use]
    pub fn capability(mut self, value: VolumeCapability) -> Self {
        self.capabilities.push(value);
        self
    }

    /// Adds a provider parameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Builds the request, trimming the name.
    #[must_use]
    pub fn build(self) -> CreateVolumeRequest {
        CreateVolumeRequest {
            name: self.name.trim().to_owned(),
            capacity_bytes: self.capacity_bytes,
            capabilities: self.capabilities,
            parameters: self.parameters,
        }
    }
}

/// A provisioned volume as reported back to the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Volume {
    /// Provider-assigned identifier, fixed at creation.
    pub id: String,
    /// Provisioned capacity in bytes. Always a whole number of gibibytes and
    /// never larger than the requested capacity.
    pub capacity_bytes: u64,
}
