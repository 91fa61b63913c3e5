//! BLE server transport.
//!
//! The wireless stack is not looked up globally: the caller hands a
//! [`BleDevice`] to [`BleServerTransport::new`], which makes the transport
//! testable against a fake stack.
//!
//! Setup runs three stages, any of which may fail with a stack error code:
//!
//! ```text
//! device init ──► service begin ──► advertise ──► ready
//! ```
//!
//! The service becomes reachable only after all stages succeed, so a
//! failed `begin` leaves `send` and `receive` reporting "not open".

use std::fmt;

use log::{info, warn};

use super::{EndpointId, Transport, TransportError, TransportResult, DEFAULT_ENDPOINT};

/// Error code reported by a BLE stack.
pub type BleCode = i32;

/// Role flags passed to the stack at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleRole {
    /// Enable the GATT server role.
    pub server: bool,
    /// Number of central (client) connections to reserve.
    pub max_clients: u8,
}

impl BleRole {
    /// Peripheral acting as server only.
    pub const SERVER: Self = Self {
        server: true,
        max_clients: 0,
    };
}

impl Default for BleRole {
    fn default() -> Self {
        Self::SERVER
    }
}

/// Configuration for [`BleServerTransport::begin`].
#[derive(Debug, Clone, Copy)]
pub struct BleServerConfig<'a> {
    /// Advertised device name.
    pub device_name: &'a str,
    /// Link role flags.
    pub role: BleRole,
}

impl<'a> BleServerConfig<'a> {
    /// Server configuration advertising `device_name`.
    pub fn new(device_name: &'a str) -> Self {
        Self {
            device_name,
            role: BleRole::SERVER,
        }
    }
}

/// Handle to the device-level BLE stack.
pub trait BleDevice {
    /// GATT service carrying NDN packets.
    type Service: BleService;

    /// Initialize the radio and host stack.
    fn init(&mut self, device_name: &str, role: BleRole) -> Result<(), BleCode>;

    /// Create an unstarted service.
    fn create_service(&mut self) -> Self::Service;

    /// Start advertising `service`.
    fn advertise_service(&mut self, service: &mut Self::Service) -> Result<(), BleCode>;

    /// Device address, for diagnostics.
    fn address(&self) -> impl fmt::Display;
}

/// GATT service moving whole packets.
pub trait BleService {
    /// Register characteristics with the stack.
    fn begin(&mut self) -> Result<(), BleCode>;

    /// Notify the connected peer with one packet.
    fn send(&mut self, packet: &[u8]) -> Result<(), BleCode>;

    /// Copy one received packet into `buf`, returning 0 when none is queued.
    fn receive(&mut self, buf: &mut [u8]) -> usize;
}

/// Transport over a BLE GATT server.
pub struct BleServerTransport<D: BleDevice> {
    device: D,
    service: Option<D::Service>,
}

impl<D: BleDevice> fmt::Debug for BleServerTransport<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BleServerTransport")
            .field("open", &self.service.is_some())
            .finish_non_exhaustive()
    }
}

impl<D: BleDevice> BleServerTransport<D> {
    /// Create an unopened transport on `device`.
    pub fn new(device: D) -> Self {
        Self {
            device,
            service: None,
        }
    }

    /// Initialize the device, start the service and advertise it.
    pub fn begin(&mut self, config: &BleServerConfig<'_>) -> TransportResult<()> {
        self.service = None;

        self.device
            .init(config.device_name, config.role)
            .map_err(|code| setup_failed("device init", code))?;

        let mut service = self.device.create_service();
        service
            .begin()
            .map_err(|code| setup_failed("service begin", code))?;

        self.device
            .advertise_service(&mut service)
            .map_err(|code| setup_failed("advertise", code))?;

        info!("BLE server ready at {}", self.device.address());
        self.service = Some(service);
        Ok(())
    }

    /// Underlying device handle.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable device handle.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

fn setup_failed(stage: &'static str, code: BleCode) -> TransportError {
    warn!("BLE server {stage} error {code}");
    TransportError::Link { stage, code }
}

impl<D: BleDevice> Transport for BleServerTransport<D> {
    fn is_open(&self) -> bool {
        self.service.is_some()
    }

    fn send(&mut self, packet: &[u8], _endpoint: EndpointId) -> TransportResult<()> {
        let service = self.service.as_mut().ok_or(TransportError::NotOpen)?;
        service.send(packet).map_err(TransportError::Send)
    }

    // TODO: map the connected central to an endpoint id once the service
    // reports which peer wrote the characteristic.
    fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)> {
        let service = self.service.as_mut()?;
        match service.receive(buf) {
            0 => None,
            len if len > buf.len() => {
                warn!("BLE service reported {len} bytes into a {} byte buffer, dropping", buf.len());
                None
            }
            len => Some((len, DEFAULT_ENDPOINT)),
        }
    }
}
