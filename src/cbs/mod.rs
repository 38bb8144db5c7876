//! CBS backend implementation of the disk control plane.

mod error;
mod payload;

use std::sync::LazyLock;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CbsConfig;
use crate::gateway::{DiskGateway, DiskSnapshot, DiskSpec, GatewayFuture};
use payload::{
    AttachDisksRequest, CreateDisksRequest, CreateDisksResponse, DescribeDisksRequest,
    DescribeDisksResponse, DetachDisksRequest, DiskRecord, TerminateDisksRequest,
};

pub use error::CbsError;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Gateway that manages disks through the provider's CBS HTTP API.
#[derive(Clone)]
pub struct CbsGateway {
    config: CbsConfig,
}

impl CbsGateway {
    /// Constructs a new gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CbsError::Config`] when the provided configuration fails
    /// validation.
    pub fn new(config: CbsConfig) -> Result<Self, CbsError> {
        config.validate()?;
        Ok(Self { config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Posts a request and returns the raw body of a successful reply.
    async fn dispatch<Req>(&self, path: &str, request: &Req) -> Result<Vec<u8>, CbsError>
    where
        Req: Serialize,
    {
        let response = HTTP_CLIENT
            .post(self.endpoint(path))
            .header("X-Auth-Token", &self.config.secret_key)
            .header("X-Region", &self.config.region)
            .json(request)
            .timeout(HTTP_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(path, status = status.as_u16(), "provider call returned");
        if !status.is_success() {
            return Err(CbsError::Api {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).trim().to_owned(),
            });
        }
        Ok(body.to_vec())
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, CbsError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let body = self.dispatch(path, request).await?;
        serde_json::from_slice(&body).map_err(|err| CbsError::Decode {
            message: err.to_string(),
        })
    }

    /// Posts a request whose reply carries nothing the caller needs.
    async fn call_action<Req>(&self, path: &str, request: &Req) -> Result<(), CbsError>
    where
        Req: Serialize,
    {
        self.dispatch(path, request).await?;
        Ok(())
    }
}

impl DiskGateway for CbsGateway {
    type Error = CbsError;

    fn create_disk<'a>(
        &'a self,
        spec: &'a DiskSpec,
    ) -> GatewayFuture<'a, Vec<String>, Self::Error> {
        Box::pin(async move {
            let request = CreateDisksRequest::from_spec(spec);
            let response: CreateDisksResponse = self.call("disks", &request).await?;
            Ok(response.disk_id_set)
        })
    }

    fn describe_disk<'a>(
        &'a self,
        disk_id: &'a str,
    ) -> GatewayFuture<'a, Option<DiskSnapshot>, Self::Error> {
        Box::pin(async move {
            let request = DescribeDisksRequest::for_disk(disk_id);
            let response: DescribeDisksResponse = self.call("disks/describe", &request).await?;
            Ok(response
                .disk_set
                .into_iter()
                .find(|disk| disk.disk_id == disk_id)
                .map(DiskRecord::into_snapshot))
        })
    }

    fn attach_disk<'a>(
        &'a self,
        disk_id: &'a str,
        instance_id: &'a str,
    ) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let request = AttachDisksRequest::for_disk(disk_id, instance_id);
            self.call_action("disks/attach", &request).await
        })
    }

    fn detach_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let request = DetachDisksRequest::for_disk(disk_id);
            self.call_action("disks/detach", &request).await
        })
    }

    fn terminate_disk<'a>(&'a self, disk_id: &'a str) -> GatewayFuture<'a, (), Self::Error> {
        Box::pin(async move {
            let request = TerminateDisksRequest::for_disk(disk_id);
            self.call_action("disks/terminate", &request).await
        })
    }
}
