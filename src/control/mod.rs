pub mod night_mode;
pub mod provision;
pub mod timer;

use tracing::{debug, info, warn};
use crate::util::address::DeviceAddress;
use crate::util::api_request::{DeviceRequest, RequestFailure, Transport};

/// outcome of sending one request to every device
#[derive(Debug, Default)]
pub struct Report {
    pub succeeded: Vec<DeviceAddress>,
    pub failed: Vec<(DeviceAddress, RequestFailure)>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// send requests one after another, in order.
/// a failing device is logged and does not stop the remaining ones.
pub async fn send_all<T: Transport + ?Sized>(transport: &T, requests: Vec<DeviceRequest>) -> Report {
    let mut report = Report::default();
    for request in requests {
        info!("{}", request.redacted_url());
        match transport.send(&request).await {
            Ok(answer) => {
                debug!("{} answered {answer}", request.address());
                report.succeeded.push(request.address().clone());
            }
            Err(err) => {
                warn!("request to {} failed: {err}", request.address());
                report.failed.push((request.address().clone(), err));
            }
        }
    }
    report
}
