use itertools::Itertools;
use crate::constants::net::{IP_SEPARATOR, OCTET_COUNT};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{value}` is not an ip address made of four dot-separated numbers from 0 to 255")]
pub struct AddressFormatError {
    pub value: String,
}

/// dotted-quad ipv4 address of a device.
/// keeps the string it was parsed from, so it is sent to devices exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    text: String,
    octets: [u8; OCTET_COUNT],
}

impl DeviceAddress {
    pub fn parse(value: &str) -> Result<Self, AddressFormatError> {
        let error = || AddressFormatError { value: value.to_owned() };

        let parts = value.split(IP_SEPARATOR).collect_vec();
        if parts.len() != OCTET_COUNT {
            return Err(error());
        }

        let mut octets = [0u8; OCTET_COUNT];
        for (octet, part) in octets.iter_mut().zip(parts) {
            *octet = parse_octet(part).ok_or_else(error)?;
        }

        Ok(Self { text: value.to_owned(), octets })
    }

    pub fn as_str(&self) -> &str { &self.text }
    pub const fn octets(&self) -> &[u8; OCTET_COUNT] { &self.octets }
}

/// 1 to 3 digits, no sign or padding, no leading zero (url parsers read those as octal)
fn parse_octet(part: &str) -> Option<u8> {
    let digits_only = (1..=3).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (part.len() > 1 && part.starts_with('0')) {
        return None;
    }
    // u8 parsing rejects anything above 255
    part.parse().ok()
}

impl std::fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// how many leading octets of an address identify the network.
/// only class C (/24) is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkClass {
    #[default]
    C,
}

impl NetworkClass {
    pub const fn network_octets(self) -> usize {
        match self {
            Self::C => 3,
        }
    }
}

/// network part of `gateway`, e.g. `192.168.1` for `192.168.1.1` in class C
pub fn network_id(gateway: &DeviceAddress, class: NetworkClass) -> String {
    gateway.octets()[..class.network_octets()]
        .iter()
        .join(&IP_SEPARATOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_address_is_kept_unchanged() {
        for value in ["192.168.1.1", "0.0.0.0", "255.255.255.255", "10.0.0.5"] {
            let address = DeviceAddress::parse(value).unwrap();
            assert_eq!(address.as_str(), value);
            assert_eq!(address.to_string(), value);
        }
    }

    #[test]
    fn octets_are_parsed() {
        let address = DeviceAddress::parse("10.20.30.40").unwrap();
        assert_eq!(*address.octets(), [10, 20, 30, 40]);
    }

    #[test]
    fn wrong_octet_count() {
        for value in ["192.168.1", "192.168.1.1.1", "", "192"] {
            assert_eq!(
                DeviceAddress::parse(value),
                Err(AddressFormatError { value: value.to_owned() })
            );
        }
    }

    #[test]
    fn octet_out_of_range() {
        assert!(DeviceAddress::parse("192.168.1.256").is_err());
        assert!(DeviceAddress::parse("300.1.1.1").is_err());
        assert!(DeviceAddress::parse("1.-1.1.1").is_err());
    }

    #[test]
    fn non_numeric_octet() {
        assert!(DeviceAddress::parse("192.168.one.1").is_err());
        assert!(DeviceAddress::parse("192.168..1").is_err());
    }

    #[test]
    fn octet_must_be_plain_digits() {
        for value in [" 10.0.0.5", "10.0.0.5 ", "+10.0.0.5", "010.0.0.5", "10.0.0.05", "10.0.00.5", "0010.0.0.5"] {
            assert!(DeviceAddress::parse(value).is_err(), "{value} should be rejected");
        }
        assert!(DeviceAddress::parse("10.0.0.0").is_ok());
    }

    #[test]
    fn every_octet_is_checked() {
        // a bad last octet must fail as well, not only the first one
        assert!(DeviceAddress::parse("1.2.3.x").is_err());
    }

    #[test]
    fn class_c_network_id() {
        let gateway = DeviceAddress::parse("192.168.1.1").unwrap();
        assert_eq!(network_id(&gateway, NetworkClass::C), "192.168.1");
    }
}
