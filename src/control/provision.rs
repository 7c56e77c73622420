use tracing::info;
use crate::constants::{device::STATION_ENDPOINT, net::{IP_SEPARATOR, MAX_HOST_ID}};
use crate::control::{send_all, Report};
use crate::util::address::{network_id, DeviceAddress, NetworkClass};
use crate::util::api_request::{DeviceRequest, Transport};
use crate::util::config::{NetworkConfig, ProvisionSettings, StaticIpv4, ValidationError};

/// new address for a device that is currently reachable at `current`.
/// `new` is `None` if the device switches to dhcp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub current: DeviceAddress,
    pub new: Option<DeviceAddress>,
}

/// one assignment per device, in config order
pub type ProvisioningPlan = Vec<Assignment>;

/// hand out host-ids from `host_id_start` upwards, skipping the exceptions.
/// the counter moves on after every device.
pub fn allocate(
    devices: &[DeviceAddress],
    static_ipv4: &StaticIpv4,
    class: NetworkClass,
) -> Result<ProvisioningPlan, ValidationError> {
    let network_id = network_id(&static_ipv4.gateway, class);
    let mut host_id = static_ipv4.host_id_start;
    let mut plan = Vec::with_capacity(devices.len());

    for device in devices {
        while static_ipv4.host_id_exceptions.binary_search(&host_id).is_ok() {
            host_id += 1;
        }
        if host_id > MAX_HOST_ID {
            return Err(ValidationError::InvalidValue {
                field: "provision.new_network_information.static_ipv4.host_id_start".into(),
                reason: format!("{network_id}{IP_SEPARATOR}0/24 runs out of host ids before all {} devices got one", devices.len()),
            });
        }

        let new = format!("{network_id}{IP_SEPARATOR}{host_id}");
        let new = DeviceAddress::parse(&new).map_err(|source| ValidationError::InvalidAddress {
            field: "provision.new_network_information.static_ipv4.gateway".into(),
            source,
        })?;
        plan.push(Assignment { current: device.clone(), new: Some(new) });

        host_id += 1;
    }

    Ok(plan)
}

/// query parameters for the station settings endpoint, in the order the device documents them
pub fn station_parameters(network: &NetworkConfig, new_ip: Option<&DeviceAddress>) -> Vec<(&'static str, String)> {
    let mut parameters = vec![];

    if let Some(wifi) = &network.wifi {
        parameters.push(("ssid", wifi.ssid.clone()));
        parameters.push(("key", wifi.password.clone()));
    }

    match &network.static_ipv4 {
        Some(static_ipv4) => {
            parameters.push(("ipv4_method", "static".to_owned()));
            parameters.push(("gw", static_ipv4.gateway.to_string()));
            parameters.push(("netmask", static_ipv4.netmask.to_string()));
            if let Some(dns) = &static_ipv4.dns {
                parameters.push(("dns", dns.to_string()));
            }
        }
        None => parameters.push(("ipv4_method", "dhcp".to_owned())),
    }

    if let Some(new_ip) = new_ip {
        parameters.push(("ip", new_ip.to_string()));
    }

    parameters
}

/// moves devices to a new network. runs once.
pub struct AddressProvisioner<T> {
    settings: ProvisionSettings,
    transport: T,
    class: NetworkClass,
}

impl<T: Transport> AddressProvisioner<T> {
    pub fn new(settings: ProvisionSettings, transport: T) -> Self {
        Self { settings, transport, class: NetworkClass::default() }
    }

    pub fn plan(&self) -> Result<ProvisioningPlan, ValidationError> {
        match &self.settings.network.static_ipv4 {
            Some(static_ipv4) => allocate(&self.settings.devices, static_ipv4, self.class),
            None => Ok(self.settings.devices.iter()
                .map(|device| Assignment { current: device.clone(), new: None })
                .collect()),
        }
    }

    /// requests go to the current address of each device
    pub fn requests(&self, plan: &ProvisioningPlan) -> Vec<DeviceRequest> {
        plan.iter()
            .map(|assignment| {
                DeviceRequest::new(assignment.current.clone(), STATION_ENDPOINT)
                    .credentials(self.settings.credentials.clone())
                    .parameters(station_parameters(&self.settings.network, assignment.new.as_ref()))
            })
            .collect()
    }

    /// fails before sending anything if the plan can't be made
    pub async fn run(&self) -> Result<Report, ValidationError> {
        let plan = self.plan()?;
        let report = send_all(&self.transport, self.requests(&plan)).await;
        info!(
            "wifi details updated on {} of {} devices",
            report.succeeded.len(),
            report.total(),
        );
        Ok(report)
    }
}
