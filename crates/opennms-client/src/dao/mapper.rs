//! Raw record → entity mappers
//!
//! One pure function per entity kind. Each reads its record through
//! [`Record`], so a mapper either returns a complete entity or an error; no
//! half-populated entity escapes.

use super::record::Record;
use crate::error::OnmsError;
use crate::models::*;
use serde_json::Value;
use std::net::IpAddr;

pub fn node(value: &Value) -> Result<Node, OnmsError> {
    let record = Record::new("node", value)?;

    let mut node = Node::new(record.id()?);
    node.label = record.string("label")?;
    node.location = record.string("location")?;
    node.foreign_source = record.non_empty_string("foreignSource")?;
    node.foreign_id = record.non_empty_string("foreignId")?;
    node.sys_contact = record.string("sysContact")?;
    node.sys_description = record.string("sysDescription")?;
    node.sys_location = record.string("sysLocation")?;
    node.sys_name = record.string("sysName")?;
    node.sys_object_id = record.string("sysObjectId")?;
    node.label_source = record.code("labelSource")?;
    node.create_time = record.timestamp("createTime")?;
    node.last_capsd_poll = record.timestamp("lastCapsdPoll")?;
    node.node_type = record.code("type")?;
    node.categories = record
        .array("categories")?
        .iter()
        .map(category)
        .collect::<Result<_, _>>()?;
    if let Some(assets) = record.nested("assetRecord", "assetRecord")? {
        node.assets = assets.scalar_entries().collect();
    }

    Ok(node)
}

pub fn category(value: &Value) -> Result<Category, OnmsError> {
    let record = Record::new("category", value)?;
    Ok(Category {
        id: record.id()?,
        name: record.string("name")?,
    })
}

pub fn ip_interface(value: &Value) -> Result<IpInterface, OnmsError> {
    let record = Record::new("ipInterface", value)?;

    let id = record.id()?;
    let raw_address = record.string("ipAddress")?.ok_or_else(|| {
        OnmsError::MalformedResponse(format!("ipInterface {id} has no ipAddress"))
    })?;
    let ip_address: IpAddr = raw_address.trim().parse().map_err(|_| {
        OnmsError::MalformedResponse(format!("ipInterface {id}: invalid ipAddress {raw_address:?}"))
    })?;

    let mut iface = IpInterface::new(id, ip_address);
    iface.hostname = record.first_string(&["hostName", "hostname"])?;
    iface.is_managed = record.code("isManaged")?;
    iface.last_capsd_poll = record.timestamp("lastCapsdPoll")?;
    iface.snmp_primary = record.code("snmpPrimary")?;
    if let Some(snmp) = record.nested("snmpInterface", "snmpInterface")? {
        iface.snmp_interface_id = snmp.number("id")?;
    }

    Ok(iface)
}

pub fn snmp_interface(value: &Value) -> Result<SnmpInterface, OnmsError> {
    let record = Record::new("snmpInterface", value)?;

    let mut iface = SnmpInterface::new(record.id()?);
    iface.if_index = record.number("ifIndex")?;
    iface.if_descr = record.string("ifDescr")?;
    iface.if_type = record.number("ifType")?;
    iface.if_name = record.string("ifName")?;
    iface.if_speed = record.number("ifSpeed")?;
    iface.if_admin_status = record.code("ifAdminStatus")?;
    iface.if_oper_status = record.code("ifOperStatus")?;
    iface.if_alias = record.string("ifAlias")?;
    iface.last_capsd_poll = record.timestamp("lastCapsdPoll")?;
    iface.collect = record.code("collectFlag")?;
    iface.poll = record.string("poll")?;
    iface.last_snmp_poll = record.timestamp("lastSnmpPoll")?;
    iface.phys_addr = record
        .non_empty_string("physAddr")?
        .map(|raw| raw.parse::<PhysAddr>())
        .transpose()?;

    Ok(iface)
}

pub fn monitored_service(value: &Value) -> Result<MonitoredService, OnmsError> {
    let record = Record::new("service", value)?;

    let mut service = MonitoredService::new(record.id()?);
    service.last_fail = record.timestamp("lastFail")?;
    service.last_good = record.timestamp("lastGood")?;
    service.status = record.code("status")?;
    if let Some(service_type) = record.nested("serviceType", "serviceType")? {
        service.service_type = Some(ServiceType {
            id: service_type.id()?,
            name: service_type.string("name")?,
        });
    }

    Ok(service)
}

pub fn situation_feedback(value: &Value) -> Result<SituationFeedback, OnmsError> {
    let record = Record::new("feedback", value)?;

    Ok(SituationFeedback {
        alarm_key: record.string("alarmKey")?,
        fingerprint: record.string("fingerprint")?,
        feedback_type: record.code("feedbackType")?,
        reason: record.string("reason")?,
        user: record.string("user")?,
        timestamp: record.timestamp("timestamp")?,
        root_cause: record.boolean("rootCause")?,
        tags: record.string_list("tags")?,
    })
}

pub fn server_metadata(value: &Value) -> Result<ServerMetadata, OnmsError> {
    let record = Record::new("info", value)?;

    Ok(ServerMetadata {
        version: record
            .string("version")?
            .ok_or_else(|| OnmsError::MalformedResponse("info has no version".to_string()))?,
        display_version: record.string("displayVersion")?,
        package_name: record.string("packageName")?,
        package_description: record.string("packageDescription")?,
    })
}
