//! Node (managed device) and its interface/service children

use super::enums::{
    CollectType, ManagedType, NodeLabelSource, NodeType, PrimaryType, ServiceStatus, SnmpStatus,
};
use super::parent::ParentRef;
use crate::error::OnmsError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Surveillance category attached to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u64,
    pub name: Option<String>,
}

/// Service type descriptor embedded in a monitored service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceType {
    pub id: u64,
    pub name: Option<String>,
}

/// Hardware (MAC) address of an SNMP interface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysAddr(Vec<u8>);

impl PhysAddr {
    pub fn octets(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for PhysAddr {
    type Err = OnmsError;

    /// Accepts `001122aabbcc`, `00:11:22:aa:bb:cc`, `00-11-22-AA-BB-CC` and `0011.22aa.bbcc`
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        let malformed = || OnmsError::MalformedResponse(format!("invalid physical address: {raw:?}"));

        if digits.is_empty() || digits.len() % 2 != 0 || !digits.is_ascii() {
            return Err(malformed());
        }
        let octets = (0..digits.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&digits[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| malformed())?;
        Ok(PhysAddr(octets))
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|b| format!("{b:02x}")).collect();
        f.write_str(&rendered.join(":"))
    }
}

impl Serialize for PhysAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Managed device
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    id: u64,
    pub label: Option<String>,
    pub location: Option<String>,
    pub foreign_source: Option<String>,
    pub foreign_id: Option<String>,
    pub sys_contact: Option<String>,
    pub sys_description: Option<String>,
    pub sys_location: Option<String>,
    pub sys_name: Option<String>,
    pub sys_object_id: Option<String>,
    pub label_source: Option<NodeLabelSource>,
    pub create_time: Option<DateTime<Utc>>,
    pub last_capsd_poll: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub node_type: Option<NodeType>,
    pub categories: Vec<Category>,
    pub assets: BTreeMap<String, String>,
    pub snmp_interfaces: Vec<SnmpInterface>,
    pub ip_interfaces: Vec<Arc<IpInterface>>,
}

impl Node {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            label: None,
            location: None,
            foreign_source: None,
            foreign_id: None,
            sys_contact: None,
            sys_description: None,
            sys_location: None,
            sys_name: None,
            sys_object_id: None,
            label_source: None,
            create_time: None,
            last_capsd_poll: None,
            node_type: None,
            categories: Vec::new(),
            assets: BTreeMap::new(),
            snmp_interfaces: Vec::new(),
            ip_interfaces: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// IP interface with the given address, if loaded
    pub fn ip_interface(&self, address: IpAddr) -> Option<&Arc<IpInterface>> {
        self.ip_interfaces.iter().find(|i| i.ip_address == address)
    }
}

/// SNMP (hardware) interface of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnmpInterface {
    id: u64,
    pub if_index: Option<i32>,
    pub if_descr: Option<String>,
    pub if_type: Option<u32>,
    pub if_name: Option<String>,
    pub if_speed: Option<u64>,
    pub if_admin_status: Option<SnmpStatus>,
    pub if_oper_status: Option<SnmpStatus>,
    pub if_alias: Option<String>,
    pub last_capsd_poll: Option<DateTime<Utc>>,
    pub collect: Option<CollectType>,
    pub poll: Option<String>,
    pub last_snmp_poll: Option<DateTime<Utc>>,
    pub phys_addr: Option<PhysAddr>,
    #[serde(skip)]
    pub node: ParentRef<Node>,
}

impl SnmpInterface {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            if_index: None,
            if_descr: None,
            if_type: None,
            if_name: None,
            if_speed: None,
            if_admin_status: None,
            if_oper_status: None,
            if_alias: None,
            last_capsd_poll: None,
            collect: None,
            poll: None,
            last_snmp_poll: None,
            phys_addr: None,
            node: ParentRef::NotLoaded,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// IP-layer interface of a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpInterface {
    id: u64,
    pub hostname: Option<String>,
    pub ip_address: IpAddr,
    pub is_managed: Option<ManagedType>,
    pub last_capsd_poll: Option<DateTime<Utc>>,
    pub snmp_primary: Option<PrimaryType>,
    pub snmp_interface_id: Option<u64>,
    pub services: Vec<MonitoredService>,
    #[serde(skip)]
    pub node: ParentRef<Node>,
}

impl IpInterface {
    pub fn new(id: u64, ip_address: IpAddr) -> Self {
        Self {
            id,
            hostname: None,
            ip_address,
            is_managed: None,
            last_capsd_poll: None,
            snmp_primary: None,
            snmp_interface_id: None,
            services: Vec::new(),
            node: ParentRef::NotLoaded,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Service monitored on an IP interface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredService {
    id: u64,
    pub last_fail: Option<DateTime<Utc>>,
    pub last_good: Option<DateTime<Utc>>,
    pub service_type: Option<ServiceType>,
    pub status: Option<ServiceStatus>,
    #[serde(skip)]
    pub node: ParentRef<Node>,
    #[serde(skip)]
    pub ip_interface: ParentRef<IpInterface>,
}

impl MonitoredService {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            last_fail: None,
            last_good: None,
            service_type: None,
            status: None,
            node: ParentRef::NotLoaded,
            ip_interface: ParentRef::NotLoaded,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}
